//! File-backed session store.
//!
//! The session is a small JSON document. Reads treat a missing or malformed
//! file as "not logged in"; writes replace the file atomically.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::{debug, warn};

use super::atomic_io::write_atomic;
use crate::domain::Session;
use crate::domain::ports::{SessionStore, SessionStoreError};

/// Session store persisting to a single JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
}

impl FileSessionStore {
    /// Open a store at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Write`] when the parent directory cannot
    /// be created or opened, or when `path` has no file name.
    pub fn open(path: &Utf8Path) -> Result<Self, SessionStoreError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| SessionStoreError::write(format!("{path} is not a file path")))?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| SessionStoreError::write(format!("{parent}: {err}")))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| SessionStoreError::write(format!("{parent}: {err}")))?;
        Ok(Self {
            dir,
            file_name,
            path: path.to_path_buf(),
        })
    }

    /// Location of the session file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match self.dir.read_to_string(&self.file_name) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SessionStoreError::read(format!("{}: {err}", self.path))),
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.token().is_blank() => Ok(Some(session)),
            Ok(_) => {
                warn!(path = %self.path, "ignoring session file with blank token");
                Ok(None)
            }
            Err(err) => {
                warn!(path = %self.path, error = %err, "ignoring malformed session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let encoded = serde_json::to_vec(session)
            .map_err(|err| SessionStoreError::encode(err.to_string()))?;
        write_atomic(&self.dir, &self.file_name, &encoded)
            .map_err(|err| SessionStoreError::write(format!("{}: {err}", self.path)))?;
        debug!(path = %self.path, role = %session.role(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match self.dir.remove_file(&self.file_name) {
            Ok(()) => {
                debug!(path = %self.path, "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionStoreError::write(format!("{}: {err}", self.path))),
        }
    }
}
