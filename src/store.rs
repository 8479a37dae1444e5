//! Persisted session storage: credential token + user profile.
//!
//! One JSON file under the state directory (`~/.crmkit/session.json` by
//! default), written atomically with 0o600 permissions. The directory is
//! injectable so tests and parallel sessions get isolated storage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::User;

const SESSION_FILE: &str = "session.json";

/// On-disk session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub auth_token: String,
    /// Profile snapshot from the last successful login or hydration.
    #[serde(default)]
    pub user: Option<User>,
}

/// File-backed session store rooted at a state directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at the default state directory (`~/.crmkit`).
    pub fn new() -> Self {
        Self {
            dir: dirs::home_dir().unwrap_or_default().join(".crmkit"),
        }
    }

    /// Store rooted at an explicit directory (tests, multi-profile tools).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Read the persisted session, if any. A malformed file is treated as
    /// absent and removed, matching startup-hydration behavior.
    pub fn load(&self) -> Option<PersistedSession> {
        let path = self.session_path();
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Discarding malformed session file: {}", e);
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    /// The persisted token alone, for request-time header attachment.
    pub fn token(&self) -> Option<String> {
        self.load().map(|s| s.auth_token)
    }

    /// Persist a session atomically.
    pub fn save(&self, session: &PersistedSession) -> Result<(), ApiError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|e| ApiError::Transport(format!("create state dir: {}", e)))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(
                    &self.dir,
                    std::fs::Permissions::from_mode(0o700),
                );
            }
        }

        let path = self.session_path();
        let content = serde_json::to_string_pretty(session)?;
        atomic_write(&path, &content)
            .map_err(|e| ApiError::Transport(format!("write session: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    /// Remove all persisted session state. Idempotent.
    pub fn clear(&self) {
        let path = self.session_path();
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to clear session file: {}", e);
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Write via a sibling temp file + rename so readers never see a torn write.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "admin".into(),
            email: "admin@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Admin".into(),
            role: Some("admin".into()),
            is_active: true,
            ..User::default()
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());

        assert!(store.load().is_none());
        assert!(store.token().is_none());

        store
            .save(&PersistedSession {
                auth_token: "abc123".into(),
                user: Some(sample_user()),
            })
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.auth_token, "abc123");
        assert_eq!(loaded.user.unwrap().email, "admin@example.com");
        assert_eq!(store.token().as_deref(), Some("abc123"));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());

        store
            .save(&PersistedSession {
                auth_token: "t".into(),
                user: None,
            })
            .unwrap();
        store.clear();
        assert!(store.load().is_none());
        // Second clear on an empty store is a no-op, not an error.
        store.clear();
    }

    #[test]
    fn malformed_file_treated_as_absent_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());

        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert!(store.load().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn independent_stores_do_not_collide() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let store_a = SessionStore::with_dir(a.path());
        let store_b = SessionStore::with_dir(b.path());

        store_a
            .save(&PersistedSession {
                auth_token: "token-a".into(),
                user: None,
            })
            .unwrap();

        assert_eq!(store_a.token().as_deref(), Some("token-a"));
        assert!(store_b.token().is_none());
    }
}
