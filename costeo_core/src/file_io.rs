//! # File I/O Module
//!
//! Handles business file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Businesses are saved as `.cst` (Costeo) files containing JSON.
//! Lock files use `.cst.lock` extension with metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use costeo_core::file_io::{save_business, load_business, FileLock};
//! use costeo_core::business::Business;
//! use std::path::Path;
//!
//! let business = Business::new("Velas Aurora", "Maria Lopez");
//! let path = Path::new("velas_aurora.cst");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "maria@example.com").unwrap();
//!
//! // Save with atomic write
//! save_business(&business, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::business::{Business, SCHEMA_VERSION};
use crate::errors::{CostError, CostResult};

// ============================================================================
// SAVE / LOAD
// ============================================================================

/// Save a business to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize the business to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp to .cst (atomic on most filesystems)
///
/// An interrupted save leaves the previous file intact.
///
/// # Example
///
/// ```rust,no_run
/// use costeo_core::file_io::save_business;
/// use costeo_core::business::Business;
/// use std::path::Path;
///
/// let business = Business::new("Velas Aurora", "Maria Lopez");
/// save_business(&business, Path::new("velas_aurora.cst"))?;
/// # Ok::<(), costeo_core::errors::CostError>(())
/// ```
pub fn save_business(business: &Business, path: &Path) -> CostResult<()> {
    let json =
        serde_json::to_string_pretty(business).map_err(|e| CostError::SerializationError {
            reason: e.to_string(),
        })?;

    let tmp_path = path.with_extension("cst.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CostError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CostError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CostError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // leave no stray .tmp behind on failure
        let _ = fs::remove_file(&tmp_path);
        CostError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a business from a file.
///
/// # Returns
///
/// * `Ok(Business)` - Successfully loaded business
/// * `Err(CostError::VersionMismatch)` - File version is incompatible
/// * `Err(CostError::SerializationError)` - Invalid JSON
/// * `Err(CostError::FileError)` - I/O error
///
/// # Example
///
/// ```rust,no_run
/// use costeo_core::file_io::load_business;
/// use std::path::Path;
///
/// let business = load_business(Path::new("velas_aurora.cst"))?;
/// println!("Loaded business: {}", business.meta.name);
/// # Ok::<(), costeo_core::errors::CostError>(())
/// ```
pub fn load_business(path: &Path) -> CostResult<Business> {
    let mut file = File::open(path)
        .map_err(|e| CostError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CostError::file_error("read", path.display().to_string(), e.to_string()))?;

    let business: Business =
        serde_json::from_str(&contents).map_err(|e| CostError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&business.meta.version)?;

    Ok(business)
}

/// Load a business, also reporting whether another user holds its lock.
///
/// # Returns
///
/// * `Ok((Business, None))` - Loaded successfully, no lock
/// * `Ok((Business, Some(LockInfo)))` - Loaded, but someone holds the lock
/// * `Err(_)` - Failed to load
pub fn load_business_with_lock_check(path: &Path) -> CostResult<(Business, Option<LockInfo>)> {
    let business = load_business(path)?;
    let lock_info = FileLock::check(path);
    Ok((business, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CostResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(CostError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(CostError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, a newer minor means a file we cannot read yet
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(CostError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}

// ============================================================================
// FILE LOCKING
// ============================================================================

/// Lock file metadata stored in .cst.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the main business file
    business_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps the OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a business file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .cst business file
    /// * `user_id` - Identifier for the user acquiring the lock
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(CostError::FileLocked)` - Another process holds the lock
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use costeo_core::file_io::FileLock;
    /// use std::path::Path;
    ///
    /// let lock = FileLock::acquire(Path::new("shop.cst"), "maria@example.com")?;
    /// // ... do work ...
    /// drop(lock); // releases lock
    /// # Ok::<(), costeo_core::errors::CostError>(())
    /// ```
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CostResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        // A readable, non-stale sidecar means someone is editing
        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(CostError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                // stale lock, take it over
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                CostError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Non-blocking exclusive OS lock on the sidecar
        lock_file.try_lock_exclusive().map_err(|_| {
            CostError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| CostError::SerializationError {
                reason: e.to_string(),
            })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            CostError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            CostError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            business_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the business file
    pub fn business_path(&self) -> &Path {
        &self.business_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Remove the lock file; the OS lock goes with the handle
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Get the lock file path for a business file
fn lock_path_for(business_path: &Path) -> PathBuf {
    let mut lock_path = business_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Read lock info from a lock file
fn read_lock_info(lock_path: &Path) -> CostResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        CostError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CostError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| CostError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check if a lock is stale (its process is gone, or it is over a day old)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            // Same machine, so the pid is checkable
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    // Locks older than a day are abandoned sessions
    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_business_path(name: &str) -> PathBuf {
        temp_dir().join(format!("costeo_test_{}.cst", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let business_path = Path::new("/path/to/shop.cst");
        let lock_path = lock_path_for(business_path);
        assert_eq!(lock_path, Path::new("/path/to/shop.cst.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("maria@example.com");
        assert_eq!(info.user_id, "maria@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_business_path("roundtrip");

        let mut business = Business::new("Velas Aurora", "Maria Lopez");
        business.add_estimate_from_input(Default::default());
        save_business(&business, &path).unwrap();

        let loaded = load_business(&path).unwrap();
        assert_eq!(loaded.meta.name, "Velas Aurora");
        assert_eq!(loaded.meta.owner, "Maria Lopez");
        assert_eq!(loaded.estimate_count(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_business_path("atomic");
        let tmp_path = path.with_extension("cst.tmp");

        let business = Business::new("Shop", "Owner");
        save_business(&business, &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_business_path("lock_test");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "maria@example.com").unwrap();
        assert_eq!(lock.info.user_id, "maria@example.com");
        assert_eq!(lock.business_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let path = temp_business_path("contention");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "first@example.com").unwrap();

        let second = FileLock::acquire(&path, "second@example.com");
        let err = second
            .err()
            .expect("second acquire should fail while the lock is held");
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.is_recoverable());

        drop(lock);
        let third = FileLock::acquire(&path, "second@example.com").unwrap();
        drop(third);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_day_old_lock_is_stale() {
        let info = LockInfo {
            user_id: "gone@example.com".to_string(),
            machine: "some-other-machine".to_string(),
            pid: 1,
            locked_at: Utc::now() - chrono::Duration::hours(25),
        };
        assert!(is_lock_stale(&info));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // different major
        assert!(validate_version("1.0.0").is_err());
        // newer minor in 0.x
        assert!(validate_version("0.2.0").is_err());
        // unparseable
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_rejects_newer_file() {
        let path = temp_business_path("newer_version");

        let mut business = Business::new("Shop", "Owner");
        business.meta.version = "0.99.0".to_string();
        save_business(&business, &path).unwrap();

        let err = load_business(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_business_path("lock_check");

        let business = Business::new("Shop", "Owner");
        save_business(&business, &path).unwrap();

        let (loaded, lock_info) = load_business_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.name, "Shop");
        assert!(lock_info.is_none());

        // While a lock is held, the sidecar's metadata comes back with the load
        let lock = FileLock::acquire(&path, "maria@example.com").unwrap();
        let (_, lock_info) = load_business_with_lock_check(&path).unwrap();
        let held = lock_info.expect("lock metadata should surface while the lock is held");
        assert_eq!(held.user_id, "maria@example.com");

        drop(lock);
        let (_, lock_info) = load_business_with_lock_check(&path).unwrap();
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }
}
