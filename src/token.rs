//! Bearer token persistence between CLI invocations.

use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::Error;

const TOKEN_FILE_NAME: &str = ".xpends_token";

#[cfg(unix)]
const OWNER_ONLY_MODE: u32 = 0o600;

/// A bearer token issued by `/auth/login`.
///
/// The token is never printed by `Debug` or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken({})", str::repeat("*", 8))
    }
}

/// Where the token lives unless configured otherwise: `$HOME/.xpends_token`,
/// or the working directory when `HOME` is not set.
pub fn default_token_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(TOKEN_FILE_NAME),
        None => PathBuf::from(TOKEN_FILE_NAME),
    }
}

/// Stores the token of the signed-in user in a file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token.
    ///
    /// Returns `None` if no token has been saved or the file is blank.
    ///
    /// # Errors
    ///
    /// Returns [Error::IoError] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<AccessToken>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();

                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(AccessToken::new(token)))
                }
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Save `token`, replacing any previous token.
    ///
    /// On Unix the file is only readable by its owner, from the moment it is
    /// created. A file left over with wider permissions is restricted before
    /// the token is written to it.
    ///
    /// # Errors
    ///
    /// Returns [Error::IoError] if the file cannot be written.
    pub fn save(&self, token: &AccessToken) -> Result<(), Error> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(OWNER_ONLY_MODE);
        }

        let mut file = options.open(&self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(OWNER_ONLY_MODE))?;
        }

        file.write_all(token.as_str().as_bytes())?;

        tracing::debug!("Saved access token to {:?}", self.path);

        Ok(())
    }

    /// Forget the stored token. Does nothing if there is none.
    ///
    /// # Errors
    ///
    /// Returns [Error::IoError] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed access token at {:?}", self.path);
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::token::{AccessToken, TokenStore};

    fn temp_token_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("xpends_{name}_{}", std::process::id()))
    }

    #[test]
    fn load_without_file_is_none() {
        let store = TokenStore::new(temp_token_path("missing_token"));

        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn saved_token_can_be_loaded_and_cleared() {
        let store = TokenStore::new(temp_token_path("saved_token"));
        let token = AccessToken::new("abc.def.ghi");

        store.save(&token).unwrap();
        let loaded = store.load().unwrap();
        store.clear().unwrap();

        assert_eq!(loaded, Some(token));
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn blank_file_is_no_token() {
        let path = temp_token_path("blank_token");
        std::fs::write(&path, "  \n").unwrap();
        let store = TokenStore::new(&path);

        let loaded = store.load();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, Ok(None));
    }

    #[test]
    fn clear_without_file_is_ok() {
        let store = TokenStore::new(temp_token_path("never_saved_token"));

        assert_eq!(store.clear(), Ok(()));
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_only_readable_by_owner() {
        use std::os::unix::fs::PermissionsExt;

        let store = TokenStore::new(temp_token_path("private_token"));

        store.save(&AccessToken::new("abc.def.ghi")).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        store.clear().unwrap();

        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_token_file_is_restricted_before_writing() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_token_path("shared_token");
        std::fs::write(&path, "old-token").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        let store = TokenStore::new(&path);

        store.save(&AccessToken::new("new-token")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        let loaded = store.load().unwrap();
        store.clear().unwrap();

        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(loaded, Some(AccessToken::new("new-token")));
    }

    #[test]
    fn debug_hides_token() {
        let text = format!("{:?}", AccessToken::new("secret-token"));

        assert!(!text.contains("secret-token"));
    }
}
