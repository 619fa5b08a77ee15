use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use sha2::{Digest, Sha256};

use crate::domain::{ComparisonSession, SessionId};
use crate::error::CompareError;

pub trait SessionClient {
    fn add_comparison_session(
        &self,
        session: &ComparisonSession,
    ) -> Result<SessionId, CompareError>;
}

/// First 16 hex digits of the SHA-256 of the stored session JSON.
fn content_id(content: &[u8]) -> SessionId {
    let digest = Sha256::digest(content);
    SessionId::from(hex::encode(&digest[..8]))
}

/// Session service backed by a directory of JSON files. Ids are derived from
/// the session content, so saving the same session twice yields one file.
#[derive(Debug, Clone)]
pub struct FileSessionClient {
    root: Utf8PathBuf,
}

impl FileSessionClient {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn session_path(&self, id: &SessionId) -> Utf8PathBuf {
        self.root.join(format!("{id}.json"))
    }

    pub fn load(&self, id: &SessionId) -> Result<ComparisonSession, CompareError> {
        let path = self.session_path(id);
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| CompareError::InputRead(path.clone()))?;
        serde_json::from_str(&content).map_err(|err| CompareError::InputParse {
            path,
            message: err.to_string(),
        })
    }
}

impl SessionClient for FileSessionClient {
    fn add_comparison_session(
        &self,
        session: &ComparisonSession,
    ) -> Result<SessionId, CompareError> {
        let mut stored = session.clone();
        stored.id = None;
        let content = serde_json::to_vec_pretty(&stored)
            .map_err(|err| CompareError::Session(err.to_string()))?;

        let id = content_id(&content);

        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix("kira-gc-session")
            .tempfile_in(self.root.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        temp.persist(self.session_path(&id).as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;

        tracing::debug!(%id, groups = stored.groups.len(), "comparison session stored");
        Ok(id)
    }
}
