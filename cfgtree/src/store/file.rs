//! Whole-file loading and persisting of store trees.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::tree::{Node, ParseError};

/// Loads the tree stored at `path`.
///
/// An absent or empty file yields [`Node::empty_document`]; an empty store is
/// a valid initial state.
///
/// # Errors
///
/// - [`Error::Io`] if the file exists but cannot be read
/// - [`Error::Parse`] if the contents are not valid YAML
/// - [`Error::Malformed`] if the document root is not a mapping
///
/// # Examples
///
/// ```
/// use cfgtree::store::load_tree;
///
/// let doc = load_tree(std::path::Path::new("/nonexistent/config.yaml")).unwrap();
/// assert!(doc.root_mapping().unwrap().is_empty());
/// ```
pub fn load_tree(path: &Path) -> Result<Node> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, starting from an empty tree", path.display());
            return Ok(Node::empty_document());
        }
        Err(e) => return Err(Error::io("read", path, e)),
    };

    let doc = Node::parse(&text).map_err(|e| match e {
        ParseError::Syntax(source) => Error::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseError::Structure(details) => Error::Malformed {
            details: format!("{}: {details}", path.display()),
        },
    })?;

    // Every store is rooted at a mapping
    doc.root_mapping().map_err(|e| match e {
        Error::Malformed { details } => Error::Malformed {
            details: format!("{}: {details}", path.display()),
        },
        other => other,
    })?;

    Ok(doc)
}

/// Serializes `node` and overwrites the file at `path` with it.
///
/// The parent directory is created (mode 0755) if missing and the file is
/// written with mode 0644.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or file cannot be written, or
/// [`Error::Yaml`] if serialization fails.
pub fn persist_tree(path: &Path, node: &Node) -> Result<()> {
    let data = node.to_yaml_string()?;
    ensure_parent_dir(path)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options
        .open(path)
        .map_err(|e| Error::io("open for writing", path, e))?;
    file.write_all(data.as_bytes())
        .map_err(|e| Error::io("write", path, e))?;

    debug!("persisted {} ({} bytes)", path.display(), data.len());
    Ok(())
}

/// Creates the parent directory of `path` if it does not exist.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(parent)
        .map_err(|e| Error::io("create directory", parent, e))
}
