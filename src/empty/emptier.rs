//! The emptying pass.
//!
//! Scans each approved trash directory, filters entries through the
//! retention policy, and deletes record + content as one unit. Individual
//! failures are reported and the pass continues; an entry that vanished
//! between listing and deletion counts as already removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::policy::RetentionPolicy;
use super::reader::{list_entries, TrashEntry};
use crate::clock::Clock;
use crate::output;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct EmptyStats {
    pub deleted: usize,
    pub would_delete: usize,
    pub retained: usize,
    pub failed: usize,
}

pub struct Emptier<'a> {
    policy: RetentionPolicy,
    clock: &'a dyn Clock,
    dry_run: bool,
}

impl<'a> Emptier<'a> {
    pub fn new(policy: RetentionPolicy, clock: &'a dyn Clock, dry_run: bool) -> Self {
        Self {
            policy,
            clock,
            dry_run,
        }
    }

    pub fn empty(&self, trash_dirs: &[PathBuf]) -> EmptyStats {
        let mut stats = EmptyStats::default();
        let now = self.clock.now();

        for trash_dir in trash_dirs {
            debug!(trash_dir = %trash_dir.display(), "scanning");
            for entry in list_entries(trash_dir) {
                if !self.policy.should_delete(entry.info.deleted_at, now) {
                    debug!(id = %entry.id, "entry retained");
                    stats.retained += 1;
                    continue;
                }
                if self.dry_run {
                    output::print_user(&format!(
                        "would remove: {}",
                        entry.info.original_path.display()
                    ));
                    stats.would_delete += 1;
                    continue;
                }
                match remove_pair(&entry) {
                    Ok(()) => {
                        info!(
                            id = %entry.id,
                            original = %entry.info.original_path.display(),
                            "entry deleted"
                        );
                        stats.deleted += 1;
                    }
                    Err(e) => {
                        warn!(id = %entry.id, error = %e, "could not delete entry");
                        stats.failed += 1;
                    }
                }
            }
        }
        stats
    }
}

/// Remove content then record. A missing piece means another invocation got
/// there first, which is fine.
fn remove_pair(entry: &TrashEntry) -> io::Result<()> {
    remove_any(&entry.content_path)?;
    match fs::remove_file(&entry.record_path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
