use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::SessionUser;

/// File name of the persisted session inside the data directory.
pub const SESSION_FILE: &str = "current_user.json";

/// The currently authenticated user, optionally persisted to a JSON file so
/// it survives restarts.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    current: Option<SessionUser>,
}

impl SessionStore {
    /// Rehydrate from `path`. A missing, unreadable or corrupt file means
    /// logged out.
    pub fn open(path: &Path) -> Result<Self> {
        let current = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<SessionUser>(&contents) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                None
            }
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            current,
        })
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: None,
        }
    }

    pub fn set_user(&mut self, user: impl Into<SessionUser>) -> Result<()> {
        let user = user.into();
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&user)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write session file: {}", path.display()))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                    .context("Failed to set session file permissions")?;
            }
        }
        tracing::debug!(username = %user.username, "session started");
        self.current = Some(user);
        Ok(())
    }

    pub fn clear_user(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to remove session file: {}", path.display())
                    });
                }
            }
        }
        self.current = None;
        Ok(())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn alice() -> SessionUser {
        SessionUser {
            id: "u1".into(),
            username: "alice".into(),
        }
    }

    #[test]
    fn test_in_memory_lifecycle() {
        let mut session = SessionStore::in_memory();
        assert!(!session.is_authenticated());
        session.set_user(alice()).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.current_user().unwrap().username, "alice");
        session.clear_user().unwrap();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_persists_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);

        let mut session = SessionStore::open(&path).unwrap();
        assert!(!session.is_authenticated());
        session.set_user(alice()).unwrap();
        drop(session);

        let reloaded = SessionStore::open(&path).unwrap();
        assert_eq!(reloaded.current_user(), Some(&alice()));
    }

    #[test]
    fn test_clear_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);

        let mut session = SessionStore::open(&path).unwrap();
        session.set_user(alice()).unwrap();
        session.clear_user().unwrap();
        assert!(!path.exists());

        let reloaded = SessionStore::open(&path).unwrap();
        assert!(!reloaded.is_authenticated());

        // Clearing twice is fine
        let mut again = reloaded;
        again.clear_user().unwrap();
    }

    #[test]
    fn test_password_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);

        let mut session = SessionStore::open(&path).unwrap();
        session
            .set_user(User {
                id: "u1".into(),
                username: "alice".into(),
                password: "hunter2".into(),
            })
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("hunter2"));
        assert!(!contents.contains("password"));
    }

    #[test]
    fn test_legacy_file_with_password_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, r#"{"id":"u1","username":"alice","password":"old"}"#).unwrap();

        let session = SessionStore::open(&path).unwrap();
        assert_eq!(session.current_user(), Some(&alice()));
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, "not json").unwrap();

        let session = SessionStore::open(&path).unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_non_utf8_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let mut session = SessionStore::open(&path).unwrap();
        assert!(!session.is_authenticated());

        // Logging out still clears the broken file
        session.clear_user().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_unreadable_path_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        // Reading a directory fails with an error other than NotFound
        let path = dir.path().join(SESSION_FILE);
        std::fs::create_dir(&path).unwrap();

        let session = SessionStore::open(&path).unwrap();
        assert!(!session.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        let mut session = SessionStore::open(&path).unwrap();
        session.set_user(alice()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
