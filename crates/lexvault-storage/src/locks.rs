//! Per-directory mutual exclusion for name-then-write sequences.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async locks keyed by directory path.
///
/// Two operations that pick a versioned name in the same directory are
/// serialized, so they never choose the same name. Only covers this process.
/// An entry lives only while some task holds or awaits its lock.
#[derive(Debug, Default)]
pub struct DirectoryLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

/// Exclusive access to one directory; released on drop.
#[derive(Debug)]
pub struct DirectoryGuard<'a> {
    locks: &'a DashMap<PathBuf, Arc<Mutex<()>>>,
    dir: PathBuf,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DirectoryGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Entry cloning happens under the shard lock, so a count of one
        // here means nobody else is waiting.
        self.locks
            .remove_if(&self.dir, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl DirectoryLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `dir`.
    pub async fn lock(&self, dir: &Path) -> DirectoryGuard<'_> {
        let mutex = self
            .locks
            .entry(dir.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        DirectoryGuard {
            locks: &self.locks,
            dir: dir.to_path_buf(),
            guard: Some(guard),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_directory_is_exclusive() {
        let locks = Arc::new(DirectoryLocks::new());
        let guard = locks.lock(Path::new("/storage/a/Evidence")).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(Path::new("/storage/a/Evidence")).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_directories_do_not_block() {
        let locks = DirectoryLocks::new();
        let _a = locks.lock(Path::new("/storage/a/Evidence")).await;
        let _b = locks.lock(Path::new("/storage/a/Pleadings")).await;
        assert_eq!(locks.locks.len(), 2);
    }

    #[tokio::test]
    async fn test_released_directories_are_forgotten() {
        let locks = Arc::new(DirectoryLocks::new());
        let dir = Path::new("/storage/a/Evidence");

        let guard = locks.lock(dir).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(Path::new("/storage/a/Evidence")).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.locks.len(), 1, "entry kept while a task waits");

        waiter.await.unwrap();
        assert!(locks.locks.is_empty());
    }
}
