use lodge_core::shell::Preferences;
use lodge_core::{LocalStore, StoreError};
use lodge_shared::Session;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const SESSION_FILE: &str = "session.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// [`LocalStore`] backed by two JSON files in a data directory.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    /// Written to a temporary sibling, then renamed into place. The session
    /// file holds bearer tokens, so files are readable by the owner only.
    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let path = self.dir.join(name);
        let tmp = path.with_extension("json.tmp");
        write_owner_only(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }
}

fn write_owner_only(path: &Path, bytes: &[u8]) -> io::Result<()> {
    // Left behind by an interrupted write.
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl LocalStore for FileLocalStore {
    fn load_session(&self) -> Result<Option<Session>, StoreError> {
        self.read(SESSION_FILE)
    }

    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.write(SESSION_FILE, session)
    }

    fn clear_session(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.dir.join(SESSION_FILE)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn load_preferences(&self) -> Result<Preferences, StoreError> {
        Ok(self.read(PREFERENCES_FILE)?.unwrap_or_default())
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<(), StoreError> {
        self.write(PREFERENCES_FILE, preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodge_core::shell::Theme;
    use lodge_shared::{AuthUser, Masked};
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            access_token: Masked::from("access"),
            refresh_token: Some(Masked::from("refresh")),
            expires_at: Some(1_900_000_000),
            user: AuthUser { id: Uuid::new_v4(), email: Some("owner@example.com".into()), created_at: None },
        }
    }

    #[test]
    fn test_session_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path().join("nested"));
        assert_eq!(store.load_session().unwrap(), None);

        let session = session();
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);
        // Clearing twice is fine.
        store.clear_session().unwrap();
    }

    #[test]
    fn test_session_file_holds_real_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path());
        store.save_session(&session()).unwrap();

        let raw = fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        assert!(raw.contains("\"access\""));
        assert!(!raw.contains("********"));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path());
        fs::write(dir.path().join("session.json.tmp"), b"stale").unwrap();
        store.save_session(&session()).unwrap();
        store.save_session(&session()).unwrap();

        let mode = fs::metadata(dir.path().join(SESSION_FILE)).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_preferences_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path());
        assert_eq!(store.load_preferences().unwrap(), Preferences::default());

        let prefs = Preferences { theme: Theme::Light, sidebar_collapsed: true, notifications: false };
        store.save_preferences(&prefs).unwrap();
        assert_eq!(store.load_preferences().unwrap(), prefs);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), b"{not json").unwrap();
        let store = FileLocalStore::new(dir.path());
        assert!(matches!(store.load_session(), Err(StoreError::Corrupt(_))));
    }
}
