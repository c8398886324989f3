//! Per-store locking.
//!
//! Every store is guarded by an advisory file lock on a marker file beside the
//! store, which serializes separate processes, plus an in-process mutex taken
//! right before the file lock so callers within one process queue up instead
//! of all polling the file lock. Locks are not reentrant.
//!
//! Locks are held through [`LockGuard`]s and released when the guard is
//! dropped, on every exit path. Operations that need both config stores go
//! through [`LockManager::acquire_config`], which always takes the v2 lock
//! before the legacy lock.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use log::{debug, warn};
use parking_lot::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::store::{ensure_parent_dir, Store, StoreConfig};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The lock of a single store.
#[derive(Debug)]
pub struct StoreLock {
    store: Store,
    path: PathBuf,
    timeout: Duration,
    mutex: Mutex<()>,
}

impl StoreLock {
    /// Creates a lock for `store` using the marker file at `path`.
    #[must_use]
    pub fn new(store: Store, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            store,
            path: path.into(),
            timeout,
            mutex: Mutex::new(()),
        }
    }

    /// Returns the lock marker path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the store this lock guards.
    #[must_use]
    pub const fn store(&self) -> Store {
        self.store
    }

    /// Acquires the lock, waiting up to the configured timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::LockTimeout`] if either the in-process mutex or the file
    ///   lock is not obtained within the timeout
    /// - [`Error::Io`] if the marker file cannot be created or locked
    pub fn acquire(&self) -> Result<LockGuard<'_>> {
        // No deadline when the timeout is too large to represent
        let deadline = Instant::now().checked_add(self.timeout);

        let Some(held) = self.mutex.try_lock_for(self.timeout) else {
            return Err(self.timed_out());
        };

        ensure_parent_dir(&self.path)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| Error::io("open lock file", &self.path, e))?;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => break,
                Err(e) if is_contended(&e) => {
                    let pause = match deadline {
                        Some(deadline) => {
                            let now = Instant::now();
                            if now >= deadline {
                                return Err(self.timed_out());
                            }
                            POLL_INTERVAL.min(deadline - now)
                        }
                        None => POLL_INTERVAL,
                    };
                    thread::sleep(pause);
                }
                Err(e) => return Err(Error::io("lock", &self.path, e)),
            }
        }

        debug!("acquired {} lock {}", self.store, self.path.display());
        Ok(LockGuard {
            file,
            store: self.store,
            path: &self.path,
            _held: held,
        })
    }

    fn timed_out(&self) -> Error {
        Error::LockTimeout {
            path: self.path.clone(),
            timeout: self.timeout,
        }
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// A held store lock, released on drop.
///
/// The file lock is released first, then the in-process mutex.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LockGuard<'a> {
    file: File,
    store: Store,
    path: &'a Path,
    _held: MutexGuard<'a, ()>,
}

impl LockGuard<'_> {
    /// Returns the store this guard holds.
    #[must_use]
    pub const fn store(&self) -> Store {
        self.store
    }

    /// Releases the lock now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("failed to unlock {}: {e}", self.path.display());
        }
        debug!("released {} lock {}", self.store, self.path.display());
    }
}

/// The config-store locks held for one read-modify-write cycle.
///
/// Field order makes drop release legacy before v2, the reverse of
/// acquisition.
#[must_use = "the locks are released as soon as this value is dropped"]
#[derive(Debug)]
pub struct ConfigLocks<'a> {
    legacy: Option<LockGuard<'a>>,
    v2: LockGuard<'a>,
}

impl ConfigLocks<'_> {
    /// Returns true if the legacy store lock is held as well.
    #[must_use]
    pub const fn holds_legacy(&self) -> bool {
        self.legacy.is_some()
    }

    /// Returns the stores held, in acquisition order.
    #[must_use]
    pub fn stores(&self) -> Vec<Store> {
        let mut stores = vec![self.v2.store()];
        stores.extend(self.legacy.as_ref().map(LockGuard::store));
        stores
    }
}

/// The locks of the legacy, v2 and metadata stores.
#[derive(Debug)]
pub struct LockManager {
    legacy: StoreLock,
    v2: StoreLock,
    metadata: StoreLock,
}

impl LockManager {
    /// Creates the store locks described by `config`.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let lock = |store: Store| StoreLock::new(store, config.lock_path(store), config.lock_timeout);
        Self {
            legacy: lock(Store::Legacy),
            v2: lock(Store::V2),
            metadata: lock(Store::Metadata),
        }
    }

    /// Returns the lock of `store`.
    #[must_use]
    pub const fn lock(&self, store: Store) -> &StoreLock {
        match store {
            Store::Legacy => &self.legacy,
            Store::V2 => &self.v2,
            Store::Metadata => &self.metadata,
        }
    }

    /// Acquires the lock of a single store.
    ///
    /// # Errors
    ///
    /// See [`StoreLock::acquire`].
    pub fn acquire(&self, store: Store) -> Result<LockGuard<'_>> {
        self.lock(store).acquire()
    }

    /// Acquires the config-store locks: v2 first, then legacy unless only the
    /// v2 store is in use.
    ///
    /// # Errors
    ///
    /// See [`StoreLock::acquire`]. A v2 lock taken before a failed legacy
    /// acquisition is released before returning.
    pub fn acquire_config(&self, v2_only: bool) -> Result<ConfigLocks<'_>> {
        let v2 = self.v2.acquire()?;
        let legacy = if v2_only {
            None
        } else {
            Some(self.legacy.acquire()?)
        };
        Ok(ConfigLocks { legacy, v2 })
    }
}
