//! Advisory checks for the local `.env` secrets file.

use std::fs;
use std::io;
use std::path::Path;

/// Name of the local secrets file.
pub const ENV_FILE_NAME: &str = ".env";

/// Permission bits a secrets file should have (owner read/write only).
pub const SECURE_ENV_FILE_MODE: u32 = 0o600;

/// Whether `.env` is mentioned in the repository's `.gitignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreStatus {
    Listed,
    NotListed,
    /// There is no `.gitignore` next to the secrets file.
    Missing,
}

/// Result of [`check_env_file_security`]. Purely advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileReport {
    pub exists: bool,
    /// Permission bits (`mode & 0o777`); `None` when the file is absent or the
    /// platform has no Unix permissions.
    pub mode: Option<u32>,
    pub gitignore: GitignoreStatus,
}

impl EnvFileReport {
    /// `Some(true)` when the mode is exactly `0o600`.
    pub fn permissions_ok(&self) -> Option<bool> {
        self.mode.map(|mode| mode == SECURE_ENV_FILE_MODE)
    }
}

/// Inspect `dir/.env` permissions and whether `dir/.gitignore` mentions it.
///
/// The ignore check is a plain substring search for `.env`, so entries like
/// `.env.local` also count as listed.
pub fn check_env_file_security(dir: &Path) -> io::Result<EnvFileReport> {
    let env_path = dir.join(ENV_FILE_NAME);
    let (exists, mode) = match fs::metadata(&env_path) {
        Ok(metadata) => (true, permission_bits(&metadata)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => (false, None),
        Err(error) => return Err(error),
    };

    let gitignore = match fs::read_to_string(dir.join(".gitignore")) {
        Ok(content) if content.contains(ENV_FILE_NAME) => GitignoreStatus::Listed,
        Ok(_) => GitignoreStatus::NotListed,
        Err(error) if error.kind() == io::ErrorKind::NotFound => GitignoreStatus::Missing,
        Err(error) => return Err(error),
    };

    Ok(EnvFileReport { exists, mode, gitignore })
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> Option<u32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_files_are_reported() {
        let dir = tempdir().expect("tempdir");
        let report = check_env_file_security(dir.path()).expect("check");

        assert!(!report.exists);
        assert_eq!(report.mode, None);
        assert_eq!(report.gitignore, GitignoreStatus::Missing);
    }

    #[test]
    fn gitignore_listing_is_detected() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join(".env"), "N8N_API_KEY=abc\n").expect("write env");
        fs::write(dir.path().join(".gitignore"), "target/\n.env\n").expect("write gitignore");

        let report = check_env_file_security(dir.path()).expect("check");

        assert!(report.exists);
        assert_eq!(report.gitignore, GitignoreStatus::Listed);
    }

    #[test]
    fn gitignore_without_env_entry_is_flagged() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join(".gitignore"), "target/\n").expect("write gitignore");

        let report = check_env_file_security(dir.path()).expect("check");

        assert_eq!(report.gitignore, GitignoreStatus::NotListed);
    }

    #[cfg(unix)]
    #[test]
    fn permission_bits_are_compared_with_owner_only_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let env_path = dir.path().join(".env");
        fs::write(&env_path, "N8N_API_KEY=abc\n").expect("write env");

        fs::set_permissions(&env_path, fs::Permissions::from_mode(0o644)).expect("chmod 644");
        let loose = check_env_file_security(dir.path()).expect("check");
        assert_eq!(loose.mode, Some(0o644));
        assert_eq!(loose.permissions_ok(), Some(false));

        fs::set_permissions(&env_path, fs::Permissions::from_mode(0o600)).expect("chmod 600");
        let strict = check_env_file_security(dir.path()).expect("check");
        assert_eq!(strict.permissions_ok(), Some(true));
    }
}
