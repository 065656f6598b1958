use crate::core_fs::error::PathError;
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// A canonical, absolute filesystem location.
///
/// Values are only produced by canonicalizing a home root or by the validated
/// operations below, so a path derived from a user's home can never point
/// outside of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxedPath {
    path: PathBuf,
}

impl SandboxedPath {
    /// Canonicalizes `root`; it must exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathError> {
        let root = root.as_ref();
        let path = root
            .canonicalize()
            .map_err(|_| PathError::NotFound(root.display().to_string()))?;
        Ok(Self { path })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn is_file(&self) -> bool {
        self.path.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    /// Resolves `input` below `self`; the result must be `self` or inside it.
    pub fn resolve(&self, input: &str) -> Result<SandboxedPath, PathError> {
        self.resolve_within(self, input)
    }

    /// Resolves `input` relative to `self`, accepting only results equal to or
    /// below `root`. A leading `/` makes `input` relative to `self` as well.
    pub fn resolve_within(
        &self,
        root: &SandboxedPath,
        input: &str,
    ) -> Result<SandboxedPath, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        let relative = input.trim_start_matches('/');
        let relative_path = Path::new(relative);
        let has_prefix = relative_path
            .components()
            .any(|c| matches!(c, Component::Prefix(_)));
        if relative_path.has_root() || has_prefix {
            return Err(PathError::OutsideRoot(input.to_string()));
        }

        let canonical = match self.path.join(relative_path).canonicalize() {
            Ok(path) => path,
            Err(_) => return Err(PathError::NotFound(input.to_string())),
        };
        let candidate = SandboxedPath { path: canonical };
        if candidate == *root || candidate.is_descendant_of(root) {
            Ok(candidate)
        } else {
            warn!("Rejected path outside of the home directory: {:?}", input);
            Err(PathError::OutsideRoot(input.to_string()))
        }
    }

    /// Exclusively creates `name` directly inside `self`.
    pub fn create_file_under(&self, name: &str) -> Result<(SandboxedPath, File), PathError> {
        validate_file_name(name)?;

        let target = self.path.join(name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => PathError::AlreadyExists(name.to_string()),
                ErrorKind::PermissionDenied => PathError::PermissionDenied(name.to_string()),
                ErrorKind::NotFound => PathError::NotFound(name.to_string()),
                _ => PathError::Io(e),
            })?;

        let created = SandboxedPath {
            path: target.canonicalize()?,
        };
        if !created.is_descendant_of(self) {
            drop(file);
            let _ = std::fs::remove_file(&target);
            return Err(PathError::OutsideRoot(name.to_string()));
        }
        Ok((created, file))
    }

    /// Lexical, component-wise check that `self` lies strictly below `parent`.
    pub fn is_descendant_of(&self, parent: &SandboxedPath) -> bool {
        let mut own = self.path.components();
        for component in parent.path.components() {
            if own.next() != Some(component) {
                return false;
            }
        }
        own.next().is_some()
    }

    /// Parent directory, clamped to `root`.
    pub fn parent_within(&self, root: &SandboxedPath) -> SandboxedPath {
        if self == root || !self.is_descendant_of(root) {
            return root.clone();
        }
        match self.path.parent() {
            Some(parent) => SandboxedPath {
                path: parent.to_path_buf(),
            },
            None => root.clone(),
        }
    }

    /// Path of `self` as the client sees it, with `home` shown as `/`.
    pub fn display_from(&self, home: &SandboxedPath) -> String {
        match self.path.strip_prefix(&home.path) {
            Ok(relative) => {
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                format!("/{}", parts.join("/"))
            }
            Err(_) => String::from("/"),
        }
    }
}

fn validate_file_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::Empty);
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(PathError::InvalidName(name.to_string()));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(PathError::InvalidName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, SandboxedPath) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("home")).unwrap();
        fs::create_dir(dir.path().join("home/sub")).unwrap();
        fs::write(dir.path().join("home/sub/file.txt"), b"data").unwrap();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
        let root = SandboxedPath::new(dir.path().join("home")).unwrap();
        (dir, root)
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let (_dir, root) = sandbox();
        let a = root.resolve("sub/file.txt").unwrap();
        let b = root.resolve("/sub/file.txt").unwrap();
        assert_eq!(a, b);
        assert!(a.is_descendant_of(&root));
        assert!(a.is_file());
        assert_eq!(root.resolve("/").unwrap(), root);
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let (_dir, root) = sandbox();
        assert!(matches!(
            root.resolve("../../etc/passwd"),
            Err(PathError::NotFound(_)) | Err(PathError::OutsideRoot(_))
        ));
        assert!(matches!(root.resolve("../secret.txt"), Err(PathError::OutsideRoot(_))));
        assert!(matches!(root.resolve("/../secret.txt"), Err(PathError::OutsideRoot(_))));
        assert!(matches!(root.resolve("sub/../../secret.txt"), Err(PathError::OutsideRoot(_))));
        assert!(matches!(root.resolve(""), Err(PathError::Empty)));
        assert!(matches!(root.resolve("missing"), Err(PathError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let (dir, root) = sandbox();
        let link = dir.path().join("home/link");
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), link).unwrap();
        assert!(matches!(root.resolve("link"), Err(PathError::OutsideRoot(_))));
    }

    #[test]
    fn test_resolve_results_stay_inside_root() {
        let (_dir, root) = sandbox();
        let inputs = ["sub", "/sub", "sub/..", "./sub/./file.txt", "//sub", "sub/../sub/file.txt"];
        for input in inputs {
            let resolved = root.resolve(input).unwrap();
            assert!(resolved == root || resolved.is_descendant_of(&root), "{}", input);
        }
    }

    #[test]
    fn test_resolve_within_uses_root_for_containment() {
        let (_dir, root) = sandbox();
        let sub = root.resolve("sub").unwrap();
        assert_eq!(sub.resolve_within(&root, "..").unwrap(), root);
        assert!(sub.resolve("..").is_err());
    }

    #[test]
    fn test_create_file_under() {
        let (_dir, root) = sandbox();
        let (created, _file) = root.create_file_under("new.bin").unwrap();
        assert!(created.is_descendant_of(&root));
        assert!(matches!(root.create_file_under("new.bin"), Err(PathError::AlreadyExists(_))));
        assert!(matches!(root.create_file_under("../x"), Err(PathError::InvalidName(_))));
        assert!(matches!(root.create_file_under("sub/x"), Err(PathError::InvalidName(_))));
        assert!(matches!(root.create_file_under(".."), Err(PathError::InvalidName(_))));
        assert!(matches!(root.create_file_under("."), Err(PathError::InvalidName(_))));
        assert!(matches!(root.create_file_under(""), Err(PathError::Empty)));
    }

    #[test]
    fn test_is_descendant_of_is_strict() {
        let (_dir, root) = sandbox();
        let sub = root.resolve("sub").unwrap();
        assert!(!root.is_descendant_of(&root));
        assert!(sub.is_descendant_of(&root));
        assert!(!root.is_descendant_of(&sub));
    }

    #[test]
    fn test_parent_and_display() {
        let (_dir, root) = sandbox();
        let sub = root.resolve("sub").unwrap();
        assert_eq!(sub.display_from(&root), "/sub");
        assert_eq!(root.display_from(&root), "/");
        assert_eq!(sub.parent_within(&root), root);
        assert_eq!(root.parent_within(&root), root);
    }
}
