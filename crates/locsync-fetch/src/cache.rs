//! Short-lived cache for the raw location feed.
//!
//! The client only sees [`FetchCache`]; [`FileCache`] is what the binary
//! uses, [`MemoryCache`] backs tests and embedders that have no writable
//! disk.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// How long a cached feed may be reused.
pub const FRESHNESS_THRESHOLD: Duration = Duration::from_secs(10 * 60);

/// Storage for the last successful raw fetch.
pub trait FetchCache: Send + Sync {
    /// Returns the cached bytes if a fresh artifact exists. Any read problem
    /// is a miss.
    fn load(&self) -> Option<Vec<u8>>;

    /// Replaces the cached artifact with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error; callers treat it as non-fatal.
    fn store(&self, bytes: &[u8]) -> io::Result<()>;
}

/// `true` while an artifact stored at `stored_at` is younger than `max_age`.
/// Timestamps in the future count as fresh.
#[must_use]
pub fn is_fresh(stored_at: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    match now.duration_since(stored_at) {
        Ok(age) => age < max_age,
        Err(_) => true,
    }
}

/// Cache file whose modification time marks when it was fetched.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
    max_age: Duration,
}

impl FileCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_max_age(path, FRESHNESS_THRESHOLD)
    }

    #[must_use]
    pub fn with_max_age(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FetchCache for FileCache {
    fn load(&self) -> Option<Vec<u8>> {
        let modified = std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        if !is_fresh(modified, SystemTime::now(), self.max_age) {
            tracing::debug!(path = %self.path.display(), "location cache expired");
            return None;
        }

        match std::fs::read(&self.path) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "location cache unreadable");
                None
            }
        }
    }

    fn store(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Write-then-rename so readers never see a half-written feed.
        let tmp = self.temp_path();
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)
    }
}

/// In-process cache with the same freshness rule as [`FileCache`].
#[derive(Debug)]
pub struct MemoryCache {
    max_age: Duration,
    entry: Mutex<Option<(SystemTime, Vec<u8>)>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(FRESHNESS_THRESHOLD)
    }
}

impl MemoryCache {
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            entry: Mutex::new(None),
        }
    }

    /// Seeds the cache with bytes stored at an explicit time.
    #[must_use]
    pub fn seeded(max_age: Duration, stored_at: SystemTime, bytes: Vec<u8>) -> Self {
        Self {
            max_age,
            entry: Mutex::new(Some((stored_at, bytes))),
        }
    }
}

impl FetchCache for MemoryCache {
    fn load(&self) -> Option<Vec<u8>> {
        let guard = self.entry.lock().ok()?;
        let (stored_at, bytes) = guard.as_ref()?;
        is_fresh(*stored_at, SystemTime::now(), self.max_age).then(|| bytes.clone())
    }

    fn store(&self, bytes: &[u8]) -> io::Result<()> {
        let mut guard = self
            .entry
            .lock()
            .map_err(|_| io::Error::other("memory cache lock poisoned"))?;
        *guard = Some((SystemTime::now(), bytes.to_vec()));
        Ok(())
    }
}
