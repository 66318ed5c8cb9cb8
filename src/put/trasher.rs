//! The placement algorithm.
//!
//! `FileTrasher` iterates the ordered candidate list: security check, volume
//! locality check, directory preparation, then atomic record+content
//! creation. The first candidate that succeeds wins and iteration stops;
//! every per-candidate failure is logged and the next candidate is tried.
//! `Trasher` wraps it with the per-file policy (dot-entry guard, force and
//! interactive modes).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::candidates::CandidateFinder;
use super::suffix::SuffixSource;
use super::trash_dir::PutTrashDir;
use crate::clock::Clock;
use crate::errors::TrashError;
use crate::interact::{is_affirmative, UserInput};
use crate::security::check_trash_dir;
use crate::volume::{Volume, Volumes};
use crate::Environ;

/// Final state of one placement attempt, used only for reporting and exit
/// status.
#[derive(Debug)]
pub enum TrashResult {
    /// Record and content were created in this trash directory.
    Trashed { trash_dir: PathBuf },
    /// Nothing was attempted (dot entry, declined confirmation, or an
    /// inaccessible path under force mode).
    Skipped,
    /// Every candidate was tried and none accepted the file.
    Failed,
}

impl TrashResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, TrashResult::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    Standard,
    /// Skip inaccessible paths silently.
    Force,
    /// Ask before trashing each accessible path.
    Interactive,
}

pub struct FileTrasher<'a> {
    volumes: &'a dyn Volumes,
    clock: &'a dyn Clock,
}

impl<'a> FileTrasher<'a> {
    pub fn new(volumes: &'a dyn Volumes, clock: &'a dyn Clock) -> Self {
        Self { volumes, clock }
    }

    /// Try each candidate trash directory for `path` in priority order.
    #[allow(clippy::too_many_arguments)]
    pub fn trash_file(
        &self,
        path: &Path,
        forced_volume: Option<&Volume>,
        override_dir: Option<&Path>,
        home_override: Option<&Path>,
        environ: &Environ,
        uid: u32,
        suffixes: &mut dyn SuffixSource,
    ) -> TrashResult {
        let Some(file_name) = path.file_name() else {
            warn!(path = %path.display(), "path has no basename");
            return TrashResult::Failed;
        };
        // Resolve the parent so a symlinked directory records its real
        // location; the basename itself is never resolved.
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        let canonical_parent = match fs::canonicalize(parent.unwrap_or(Path::new("."))) {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot resolve parent directory");
                return TrashResult::Failed;
            }
        };
        let original_location = canonical_parent.join(file_name);

        let volume = match forced_volume {
            Some(v) => v.clone(),
            None => match self.volumes.volume_of(&canonical_parent) {
                Ok(v) => v,
                Err(e) => {
                    let err = TrashError::VolumeResolution {
                        path: canonical_parent.clone(),
                        source: e,
                    };
                    warn!(error = %err, "cannot trash file");
                    return TrashResult::Failed;
                }
            },
        };
        info!(path = %path.display(), volume = %volume, "volume of file resolved");

        let finder = CandidateFinder::new(self.volumes);
        let candidates = finder.candidates_for(&volume, override_dir, home_override, environ, uid);

        for candidate in &candidates {
            let check = check_trash_dir(candidate.policy, &candidate.trash_dir);
            for message in &check.diagnostics {
                info!(trash_dir = %candidate.trash_dir.display(), "{message}");
            }
            if !check.secure {
                info!(trash_dir = %candidate.trash_dir.display(), "trash dir skipped: insecure");
                continue;
            }

            // Defensive: candidates are pre-filtered by construction, but a
            // cross-device rename can never be atomic.
            match self.volumes.volume_of(&candidate.trash_dir) {
                Ok(trash_volume) if trash_volume == volume => {}
                Ok(trash_volume) => {
                    debug!(
                        trash_dir = %candidate.trash_dir.display(),
                        trash_volume = %trash_volume,
                        file_volume = %volume,
                        "trash dir skipped: different volume"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(trash_dir = %candidate.trash_dir.display(), error = %e, "cannot resolve trash dir volume");
                    continue;
                }
            }

            let put_dir = PutTrashDir::new(candidate);
            if let Err(e) = put_dir.prepare() {
                warn!(trash_dir = %candidate.trash_dir.display(), error = %e, "cannot prepare trash dir");
                continue;
            }

            match put_dir.trash(path, &original_location, self.clock.now(), suffixes) {
                Ok(id) => {
                    info!(
                        path = %path.display(),
                        trash_dir = %candidate.trash_dir.display(),
                        id = %id,
                        "file trashed"
                    );
                    return TrashResult::Trashed {
                        trash_dir: candidate.trash_dir.clone(),
                    };
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        trash_dir = %candidate.trash_dir.display(),
                        error = %e,
                        "failed to trash file in candidate"
                    );
                    continue;
                }
            }
        }

        warn!(error = %TrashError::NoUsableTrashDir(path.to_path_buf()), "file not trashed");
        TrashResult::Failed
    }
}

/// Per-file orchestration around `FileTrasher`: rejects dot entries and
/// applies the force/interactive mode before any candidate is tried.
pub struct Trasher<'a> {
    file_trasher: FileTrasher<'a>,
}

impl<'a> Trasher<'a> {
    pub fn new(volumes: &'a dyn Volumes, clock: &'a dyn Clock) -> Self {
        Self {
            file_trasher: FileTrasher::new(volumes, clock),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn trash(
        &self,
        path: &Path,
        mode: PutMode,
        forced_volume: Option<&Volume>,
        override_dir: Option<&Path>,
        home_override: Option<&Path>,
        environ: &Environ,
        uid: u32,
        input: &mut dyn UserInput,
        suffixes: &mut dyn SuffixSource,
    ) -> TrashResult {
        if is_dot_entry(path) {
            warn!(error = %TrashError::DotEntry(path.to_path_buf()), "skipping");
            return TrashResult::Skipped;
        }

        let accessible = fs::symlink_metadata(path).is_ok();
        match mode {
            PutMode::Force if !accessible => return TrashResult::Skipped,
            PutMode::Interactive if accessible => {
                let prompt = format!("trash '{}'? [y/N] ", path.display());
                match input.read_reply(&prompt) {
                    Ok(reply) if is_affirmative(&reply) => {}
                    Ok(_) => {
                        debug!(path = %path.display(), "user declined");
                        return TrashResult::Skipped;
                    }
                    Err(e) => {
                        warn!(error = %e, "could not read confirmation; not trashing");
                        return TrashResult::Skipped;
                    }
                }
            }
            _ => {}
        }

        self.file_trasher.trash_file(
            path,
            forced_volume,
            override_dir,
            home_override,
            environ,
            uid,
            suffixes,
        )
    }
}

/// Basename check on the raw path so `dir/.` and `dir/..` are rejected the
/// way a shell user wrote them, before any normalization.
fn is_dot_entry(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;
    let bytes = path.as_os_str().as_bytes();
    let last = bytes.rsplit(|b| *b == b'/').next().unwrap_or(bytes);
    last == b"." || last == b".."
}
