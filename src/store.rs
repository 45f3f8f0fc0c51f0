//! Durable credential storage and the remember policy
//!
//! Credentials live in a small JSON file under the user config directory,
//! mode 0600 on unix. The store is injected as a trait so the policy
//! functions and the CLI can be exercised against a store in a temp dir.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::models::{LoginForm, StoredCredentials};

/// Injected credential store interface
///
/// Each operation is one whole-file edit: it either fully applies or not at
/// all. Fields an operation does not name keep their stored values.
pub trait CredentialStore {
    fn read(&self) -> Result<StoredCredentials>;

    /// Persist the whole record
    fn save_credentials(&self, account: &str, password: &str, remember: bool) -> Result<()>;

    /// Flip only the remember flag; stored account/password stay put
    fn set_remember(&self, remember: bool) -> Result<()>;

    /// Reset account/password to empty and remember to false
    fn clear(&self) -> Result<()>;
}

/// JSON-file-backed store
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at `<config dir>/campusnet/credentials.json`
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("could not determine config directory")?
            .join("campusnet");
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join("credentials.json"),
        })
    }

    /// Store at an explicit path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn write(&self, creds: &StoredCredentials) -> Result<()> {
        let content = serde_json::to_string_pretty(creds)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn read(&self) -> Result<StoredCredentials> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let creds = serde_json::from_str(&content)
            .with_context(|| format!("malformed credential file {}", self.path.display()))?;
        Ok(creds)
    }

    fn save_credentials(&self, account: &str, password: &str, remember: bool) -> Result<()> {
        self.write(&StoredCredentials {
            account: account.to_string(),
            password: password.to_string(),
            remember,
        })
    }

    fn set_remember(&self, remember: bool) -> Result<()> {
        let mut creds = self.read()?;
        creds.remember = remember;
        self.write(&creds)
    }

    fn clear(&self) -> Result<()> {
        self.write(&StoredCredentials::default())
    }
}

/// Apply the post-login persistence policy
///
/// Success with remember keeps the submitted credentials; success without
/// remember clears them; failure leaves the store untouched.
pub fn persist_outcome(
    store: &dyn CredentialStore,
    succeeded: bool,
    form: &LoginForm,
) -> Result<()> {
    if !succeeded {
        return Ok(());
    }
    if form.remember {
        store.save_credentials(&form.account, &form.password, true)
    } else {
        store.clear()
    }
}

/// Apply an explicit remember toggle, independent of any login attempt
///
/// Turning the flag on persists the current form credentials right away;
/// turning it off touches nothing but the flag.
pub fn apply_remember_toggle(
    store: &dyn CredentialStore,
    form: &LoginForm,
    remember: bool,
) -> Result<()> {
    if remember {
        store.save_credentials(&form.account, &form.password, true)
    } else {
        store.set_remember(false)
    }
}

/// Merge stored credentials into the transient form
///
/// A stored value wins when the form field is blank or the stored record
/// says remember; the resulting remember flag always mirrors the store.
pub fn reconcile(form: LoginForm, stored: &StoredCredentials) -> LoginForm {
    LoginForm {
        account: if form.account.trim().is_empty() || stored.remember {
            stored.account.clone()
        } else {
            form.account
        },
        password: if form.password.trim().is_empty() || stored.remember {
            stored.password.clone()
        } else {
            form.password
        },
        remember: stored.remember,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().join("credentials.json"));
        (dir, store)
    }

    fn form(account: &str, password: &str, remember: bool) -> LoginForm {
        LoginForm {
            account: account.to_string(),
            password: password.to_string(),
            remember,
        }
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.read().unwrap(), StoredCredentials::default());
    }

    #[test]
    fn test_save_and_read_round_trip() {
        let (_dir, store) = temp_store();
        store.save_credentials("2021001234", "pw", true).unwrap();

        let creds = store.read().unwrap();
        assert_eq!(creds.account, "2021001234");
        assert_eq!(creds.password, "pw");
        assert!(creds.remember);
    }

    #[test]
    fn test_set_remember_false_keeps_credentials() {
        let (_dir, store) = temp_store();
        store.save_credentials("2021001234", "pw", true).unwrap();
        store.set_remember(false).unwrap();

        let creds = store.read().unwrap();
        assert_eq!(creds.account, "2021001234");
        assert_eq!(creds.password, "pw");
        assert!(!creds.remember);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (_dir, store) = temp_store();
        store.save_credentials("2021001234", "pw", true).unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), StoredCredentials::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_credential_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = temp_store();
        store.save_credentials("u", "p", true).unwrap();

        let mode = std::fs::metadata(dir.path().join("credentials.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_persist_success_with_remember() {
        let (_dir, store) = temp_store();
        persist_outcome(&store, true, &form("2021001234", "pw", true)).unwrap();

        let creds = store.read().unwrap();
        assert_eq!(creds.account, "2021001234");
        assert_eq!(creds.password, "pw");
        assert!(creds.remember);
    }

    #[test]
    fn test_persist_success_without_remember_clears() {
        let (_dir, store) = temp_store();
        store.save_credentials("old", "oldpw", true).unwrap();

        persist_outcome(&store, true, &form("2021001234", "pw", false)).unwrap();

        let creds = store.read().unwrap();
        assert!(creds.account.is_empty());
        assert!(creds.password.is_empty());
        assert!(!creds.remember);
    }

    #[test]
    fn test_persist_failure_touches_nothing() {
        let (_dir, store) = temp_store();
        store.save_credentials("old", "oldpw", true).unwrap();

        persist_outcome(&store, false, &form("new", "newpw", false)).unwrap();

        let creds = store.read().unwrap();
        assert_eq!(creds.account, "old");
        assert_eq!(creds.password, "oldpw");
        assert!(creds.remember);
    }

    #[test]
    fn test_toggle_on_persists_form() {
        let (_dir, store) = temp_store();
        apply_remember_toggle(&store, &form("2021001234", "pw", false), true).unwrap();

        let creds = store.read().unwrap();
        assert_eq!(creds.account, "2021001234");
        assert_eq!(creds.password, "pw");
        assert!(creds.remember);
    }

    #[test]
    fn test_toggle_off_only_flips_flag() {
        let (_dir, store) = temp_store();
        store.save_credentials("2021001234", "pw", true).unwrap();

        apply_remember_toggle(&store, &form("", "", false), false).unwrap();

        let creds = store.read().unwrap();
        assert_eq!(creds.account, "2021001234");
        assert_eq!(creds.password, "pw");
        assert!(!creds.remember);
    }

    #[test]
    fn test_reconcile_fills_blank_fields() {
        let stored = StoredCredentials {
            account: "2021001234".into(),
            password: "pw".into(),
            remember: false,
        };
        let merged = reconcile(form("", "", false), &stored);
        assert_eq!(merged.account, "2021001234");
        assert_eq!(merged.password, "pw");
        assert!(!merged.remember);
    }

    #[test]
    fn test_reconcile_keeps_typed_fields_when_not_remembering() {
        let stored = StoredCredentials {
            account: "stored".into(),
            password: "storedpw".into(),
            remember: false,
        };
        let merged = reconcile(form("typed", "typedpw", false), &stored);
        assert_eq!(merged.account, "typed");
        assert_eq!(merged.password, "typedpw");
    }

    #[test]
    fn test_reconcile_stored_wins_when_remembering() {
        let stored = StoredCredentials {
            account: "stored".into(),
            password: "storedpw".into(),
            remember: true,
        };
        let merged = reconcile(form("typed", "typedpw", false), &stored);
        assert_eq!(merged.account, "stored");
        assert_eq!(merged.password, "storedpw");
        assert!(merged.remember);
    }
}
