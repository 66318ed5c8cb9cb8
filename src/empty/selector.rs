//! Selection of the trash directories an emptying pass operates on.
//!
//! Explicit `--trash-dir` arguments win outright. Otherwise the invoking
//! user's directories are gathered across every volume, or, with
//! `--all-users`, every user's volume trash directories discoverable on the
//! system. Shared `.Trash` directories are subject to the same strict
//! security policy as on the placement side; insecure ones are skipped and
//! reported.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::put::home_trash_dir;
use crate::security::{check_trash_dir, SecurityPolicy};
use crate::Environ;

pub struct TrashDirsSelector<'a> {
    volume_roots: &'a [PathBuf],
}

impl<'a> TrashDirsSelector<'a> {
    pub fn new(volume_roots: &'a [PathBuf]) -> Self {
        Self { volume_roots }
    }

    pub fn select(
        &self,
        all_users: bool,
        user_specified: &[PathBuf],
        home_override: Option<&Path>,
        environ: &Environ,
        uid: u32,
    ) -> Vec<PathBuf> {
        if !user_specified.is_empty() {
            return user_specified.to_vec();
        }
        if all_users {
            self.all_users_dirs()
        } else {
            self.current_user_dirs(home_override, environ, uid)
        }
    }

    fn current_user_dirs(
        &self,
        home_override: Option<&Path>,
        environ: &Environ,
        uid: u32,
    ) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        let home = home_override
            .map(Path::to_path_buf)
            .or_else(|| home_trash_dir(environ));
        if let Some(home) = home {
            dirs.push(home);
        }
        for root in self.volume_roots {
            let shared = root.join(".Trash").join(uid.to_string());
            if shared.is_dir() {
                self.push_if_secure(&mut dirs, shared);
            }
            let private = root.join(format!(".Trash-{uid}"));
            if private.is_dir() {
                dirs.push(private);
            }
        }
        dirs
    }

    fn all_users_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for root in self.volume_roots {
            for slot in read_subdirs(&root.join(".Trash")) {
                self.push_if_secure(&mut dirs, slot);
            }
            for entry in read_subdirs(root) {
                let is_private_trash = entry
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(".Trash-"))
                    .unwrap_or(false);
                if is_private_trash {
                    dirs.push(entry);
                }
            }
        }
        dirs
    }

    fn push_if_secure(&self, dirs: &mut Vec<PathBuf>, shared: PathBuf) {
        let check = check_trash_dir(SecurityPolicy::TopTrashDir, &shared);
        for message in &check.diagnostics {
            info!(trash_dir = %shared.display(), "{message}");
        }
        if check.secure {
            dirs.push(shared);
        } else {
            info!(trash_dir = %shared.display(), "trash dir skipped: insecure");
        }
    }
}

fn read_subdirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "not scanning");
            return Vec::new();
        }
    };
    let mut subdirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();
    subdirs
}
