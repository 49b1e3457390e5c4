//! Read-only user directory, hydrated from JSONL (one user per line).
//!
//! Users are owned by the identity/profile collaborator. The directory only
//! indexes them by id so creation and replay can resolve participants.

use crate::user::User;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read users from a JSONL reader.
///
/// Blank lines and `#` comments are skipped.
pub fn read_users(reader: impl BufRead) -> Result<Vec<User>, DirectoryError> {
    let mut users = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DirectoryError::LineIo(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let user: User = serde_json::from_str(trimmed)
            .map_err(|e| DirectoryError::Parse(line_no + 1, e.to_string()))?;
        users.push(user);
    }
    Ok(users)
}

/// Read users from a JSONL file path.
pub fn read_users_from_path(path: impl AsRef<Path>) -> Result<Vec<User>, DirectoryError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| DirectoryError::Io(format!("{}: {e}", path.display())))?;
    read_users(BufReader::new(bytes.as_slice()))
}

/// Users indexed by id.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: BTreeMap<String, User>,
}

impl UserDirectory {
    /// Build a directory, rejecting duplicate ids and malformed records.
    pub fn from_users(users: Vec<User>) -> Result<Self, DirectoryError> {
        let mut index = BTreeMap::new();
        for user in users {
            if user.id.trim().is_empty() {
                return Err(DirectoryError::InvalidUser {
                    user_id: user.id,
                    reason: "empty id".to_string(),
                });
            }
            if !user.has_valid_rating() {
                return Err(DirectoryError::InvalidUser {
                    reason: format!("rating {} outside [0, 5]", user.rating),
                    user_id: user.id,
                });
            }
            if index.contains_key(&user.id) {
                return Err(DirectoryError::DuplicateUser(user.id));
            }
            index.insert(user.id.clone(), user);
        }
        Ok(Self { users: index })
    }

    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let users = read_users_from_path(path)?;
        Self::from_users(users)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Iterate users in deterministic id order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Errors from building or loading the user directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("line {0}: I/O error: {1}")]
    LineIo(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("duplicate user id: {0}")]
    DuplicateUser(String),

    #[error("invalid user {user_id:?}: {reason}")]
    InvalidUser { user_id: String, reason: String },
}
