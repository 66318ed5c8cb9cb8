//! Security policies for candidate trash directories.
//!
//! A shared top-level trash directory (`$top/.Trash/<uid>`) sits inside a
//! world-writable parent, so the parent must be validated before use: it has
//! to be a real directory (not a symlink) with the sticky bit set. A trash
//! directory owned exclusively by the invoking user needs no checks.
//!
//! A missing or failing directory is "not usable", never a fatal condition;
//! the caller moves on to the next candidate.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityPolicy {
    /// Strict checks on the parent `.Trash` directory.
    TopTrashDir,
    /// User-private directory, always acceptable.
    UserOwned,
}

/// Outcome of a policy check: usable or not, plus advisory diagnostics for
/// the reporting layer. Diagnostics never affect control flow.
#[derive(Debug)]
pub struct SecurityCheck {
    pub secure: bool,
    pub diagnostics: Vec<String>,
}

impl SecurityCheck {
    fn secure() -> Self {
        Self {
            secure: true,
            diagnostics: Vec::new(),
        }
    }

    fn insecure(message: String) -> Self {
        Self {
            secure: false,
            diagnostics: vec![message],
        }
    }
}

pub fn check_trash_dir(policy: SecurityPolicy, trash_dir: &Path) -> SecurityCheck {
    match policy {
        SecurityPolicy::UserOwned => SecurityCheck::secure(),
        SecurityPolicy::TopTrashDir => {
            let Some(parent) = trash_dir.parent() else {
                return SecurityCheck::insecure(format!(
                    "trash dir has no parent to validate: {}",
                    trash_dir.display()
                ));
            };
            check_top_trash_dir(parent)
        }
    }
}

fn check_top_trash_dir(dot_trash: &Path) -> SecurityCheck {
    let meta = match fs::symlink_metadata(dot_trash) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return SecurityCheck::insecure(format!(
                "top trash dir does not exist: {}",
                dot_trash.display()
            ));
        }
        Err(e) => {
            return SecurityCheck::insecure(format!(
                "cannot inspect top trash dir {}: {}",
                dot_trash.display(),
                e
            ));
        }
    };

    if meta.file_type().is_symlink() {
        return SecurityCheck::insecure(format!(
            "found unsecure .Trash dir (should not be a symlink): {}",
            dot_trash.display()
        ));
    }
    if !meta.is_dir() {
        return SecurityCheck::insecure(format!(
            "found unusable .Trash dir (should be a dir): {}",
            dot_trash.display()
        ));
    }
    if meta.permissions().mode() & 0o1000 == 0 {
        return SecurityCheck::insecure(format!(
            "found unsecure .Trash dir (should have sticky bit): {}",
            dot_trash.display()
        ));
    }
    SecurityCheck::secure()
}
