use crate::core_auth::helper::{salted_digest, PasswordDigest};
use crate::core_fs::SandboxedPath;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct User {
    name: String,
    salt: String,
    digest: PasswordDigest,
    home: SandboxedPath,
}

impl User {
    pub fn new(name: &str, salt: &str, digest: PasswordDigest, home: SandboxedPath) -> Self {
        Self {
            name: name.to_string(),
            salt: salt.to_string(),
            digest,
            home,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home(&self) -> &SandboxedPath {
        &self.home
    }
}

/// Read-only table of known users, shared by every session.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<String, Arc<User>>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.name.clone(), Arc::new(user)))
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Stored salt and expected digest for `username`.
    pub fn lookup(&self, username: &str) -> Option<(&str, &PasswordDigest)> {
        self.users
            .get(username)
            .map(|user| (user.salt.as_str(), &user.digest))
    }

    /// Returns the user when `password` matches the stored salted digest.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Arc<User>> {
        let (salt, expected) = self.lookup(username)?;
        if salted_digest(password, salt) == *expected {
            self.users.get(username).cloned()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_authenticate() {
        let dir = TempDir::new().unwrap();
        let home = SandboxedPath::new(dir.path()).unwrap();
        let directory = UserDirectory::new(vec![User::new(
            "alice",
            "s4lt",
            salted_digest("wonderland", "s4lt"),
            home,
        )]);

        assert_eq!(directory.len(), 1);
        assert!(directory.lookup("alice").is_some());
        assert!(directory.lookup("bob").is_none());
        let user = directory.authenticate("alice", "wonderland").unwrap();
        assert_eq!(user.name(), "alice");
        assert!(directory.authenticate("alice", "wrong").is_none());
        assert!(directory.authenticate("Alice", "wonderland").is_none());
    }
}
