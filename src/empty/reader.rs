//! Listing and parsing of existing trash records.
//!
//! A malformed or unreadable record is reported and skipped, never fatal to
//! the scan. Entries may appear or disappear between listing and acting on
//! them; callers treat a vanished entry as already handled.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::trashinfo::TrashInfo;

/// One trashed entry: the record, the content it pairs with, and the parsed
/// record fields.
#[derive(Debug)]
pub struct TrashEntry {
    /// Shared id of record and content (display form).
    pub id: String,
    pub record_path: PathBuf,
    pub content_path: PathBuf,
    pub info: TrashInfo,
}

/// Parse every readable record in `<trash_dir>/info`. A missing trash
/// directory simply yields no entries.
pub fn list_entries(trash_dir: &Path) -> Vec<TrashEntry> {
    let info_dir = trash_dir.join("info");
    let dir = match fs::read_dir(&info_dir) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(trash_dir = %trash_dir.display(), "no info dir; nothing to scan");
            return Vec::new();
        }
        Err(e) => {
            warn!(info_dir = %info_dir.display(), error = %e, "cannot list trash records");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for dirent in dir {
        let dirent = match dirent {
            Ok(d) => d,
            Err(e) => {
                warn!(info_dir = %info_dir.display(), error = %e, "cannot read directory entry");
                continue;
            }
        };
        let record_path = dirent.path();
        if record_path.extension().and_then(|e| e.to_str()) != Some("trashinfo") {
            debug!(path = %record_path.display(), "ignoring non-record file in info dir");
            continue;
        }
        let Some(stem) = record_path.file_stem() else {
            continue;
        };

        let contents = match fs::read_to_string(&record_path) {
            Ok(c) => c,
            Err(e) => {
                warn!(record = %record_path.display(), error = %e, "unreadable trash record; skipping");
                continue;
            }
        };
        let info = match TrashInfo::parse(&contents, &record_path) {
            Ok(i) => i,
            Err(e) => {
                warn!(error = %e, "skipping malformed trash record");
                continue;
            }
        };

        entries.push(TrashEntry {
            id: stem.to_string_lossy().into_owned(),
            content_path: trash_dir.join("files").join(stem),
            record_path,
            info,
        });
    }
    entries
}
