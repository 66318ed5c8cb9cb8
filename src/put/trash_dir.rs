//! Record + content pair creation inside one candidate trash directory.
//!
//! The record is created with `O_CREAT|O_EXCL`, which is the only
//! concurrency-safety primitive: a name collision surfaces as
//! `AlreadyExists` and triggers a retry with a fresh random suffix. The
//! content is then renamed under the same id. If the rename fails the orphan
//! record is removed so a record and its content always exist as a pair.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::candidates::Candidate;
use super::suffix::{name_for_attempt, SuffixSource};
use crate::errors::TrashError;
use crate::trashinfo::TrashInfo;

const MAX_NAME_ATTEMPTS: u32 = 100;

pub struct PutTrashDir<'a> {
    candidate: &'a Candidate,
}

impl<'a> PutTrashDir<'a> {
    pub fn new(candidate: &'a Candidate) -> Self {
        Self { candidate }
    }

    fn files_dir(&self) -> PathBuf {
        self.candidate.trash_dir.join("files")
    }

    fn info_dir(&self) -> PathBuf {
        self.candidate.trash_dir.join("info")
    }

    /// Create the trash directory and its `files/` and `info/` subdirectories
    /// with owner-only permissions (on demand, idempotent).
    pub fn prepare(&self) -> io::Result<()> {
        ensure_dir_0700(&self.candidate.trash_dir)?;
        ensure_dir_0700(&self.files_dir())?;
        ensure_dir_0700(&self.info_dir())?;
        Ok(())
    }

    /// Write the record for `original_location` and move `src` into place
    /// under the same id. Returns the allocated id.
    pub fn trash(
        &self,
        src: &Path,
        original_location: &Path,
        deleted_at: NaiveDateTime,
        suffixes: &mut dyn SuffixSource,
    ) -> Result<String> {
        let base = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let stored = self
            .candidate
            .encoding
            .encode(original_location, &self.candidate.volume);
        let record = TrashInfo::new(stored, deleted_at).render();

        let (id, info_path) = self.persist_record(&base, &record, suffixes)?;

        let content_path = self.files_dir().join(&id);
        if let Err(e) = fs::rename(src, &content_path) {
            // Keep the pair invariant: no record without content.
            let _ = fs::remove_file(&info_path);
            return Err(e).with_context(|| {
                format!(
                    "move '{}' into trash as '{}'",
                    src.display(),
                    content_path.display()
                )
            });
        }
        // Persist the rename (best-effort, same as any other rename we do).
        let _ = fsync_dir(&self.files_dir());

        debug!(
            src = %src.display(),
            trash_dir = %self.candidate.trash_dir.display(),
            id = %id,
            "record and content created"
        );
        Ok(id)
    }

    /// Allocate an id and atomically create `info/<id>.trashinfo`, retrying
    /// with fresh random suffixes on collision, bounded at 100 attempts.
    fn persist_record(
        &self,
        base: &str,
        contents: &str,
        suffixes: &mut dyn SuffixSource,
    ) -> Result<(String, PathBuf)> {
        let info_dir = self.info_dir();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let id = name_for_attempt(base, attempt, suffixes);
            let info_path = info_dir.join(format!("{id}.trashinfo"));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o600)
                .open(&info_path)
            {
                Ok(mut file) => {
                    if let Err(e) = file
                        .write_all(contents.as_bytes())
                        .and_then(|_| file.sync_all())
                    {
                        // Same pair invariant as the rename branch: a record
                        // that was never fully written must not survive.
                        let _ = fs::remove_file(&info_path);
                        return Err(e)
                            .with_context(|| format!("write record {}", info_path.display()));
                    }
                    return Ok((id, info_path));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(id = %id, "record name taken, retrying with new suffix");
                    continue;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("create record {}", info_path.display()));
                }
            }
        }
        Err(TrashError::NameExhausted {
            dir: info_dir,
            name: base.to_string(),
            attempts: MAX_NAME_ATTEMPTS,
        }
        .into())
    }
}

fn ensure_dir_0700(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::put::candidates::PathEncoding;
    use crate::put::suffix::SequenceSuffixes;
    use crate::security::SecurityPolicy;
    use crate::volume::Volume;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn candidate(trash_dir: &Path, top: &Path) -> Candidate {
        Candidate {
            trash_dir: trash_dir.to_path_buf(),
            volume: Volume::new(top),
            encoding: PathEncoding::Absolute,
            policy: SecurityPolicy::UserOwned,
        }
    }

    #[test]
    fn prepare_creates_owner_only_subdirs() {
        let td = tempdir().unwrap();
        let trash = td.path().join("Trash");
        let cand = candidate(&trash, td.path());
        PutTrashDir::new(&cand).prepare().unwrap();

        for sub in ["files", "info"] {
            let meta = fs::metadata(trash.join(sub)).unwrap();
            assert!(meta.is_dir());
            assert_eq!(meta.permissions().mode() & 0o777, 0o700);
        }
    }

    #[test]
    fn trash_creates_pair_under_one_id() {
        let td = tempdir().unwrap();
        let trash = td.path().join("Trash");
        let src = td.path().join("doc.txt");
        fs::write(&src, b"hello").unwrap();

        let cand = candidate(&trash, td.path());
        let dir = PutTrashDir::new(&cand);
        dir.prepare().unwrap();
        let id = dir
            .trash(&src, &src, date(), &mut SequenceSuffixes(vec![]))
            .unwrap();

        assert_eq!(id, "doc.txt");
        assert!(!src.exists());
        assert_eq!(fs::read(trash.join("files/doc.txt")).unwrap(), b"hello");
        let record = fs::read_to_string(trash.join("info/doc.txt.trashinfo")).unwrap();
        assert!(record.starts_with("[Trash Info]\n"));
        assert!(record.contains("DeletionDate=2024-05-01T09:00:00"));
    }

    #[test]
    fn collision_retries_with_suffix() {
        let td = tempdir().unwrap();
        let trash = td.path().join("Trash");
        let cand = candidate(&trash, td.path());
        let dir = PutTrashDir::new(&cand);
        dir.prepare().unwrap();

        // Occupy the plain id and the first suffixed id.
        fs::write(trash.join("info/doc.txt.trashinfo"), b"taken").unwrap();
        fs::write(trash.join("info/doc.txt_7.trashinfo"), b"taken").unwrap();

        let src = td.path().join("doc.txt");
        fs::write(&src, b"x").unwrap();
        let id = dir
            .trash(&src, &src, date(), &mut SequenceSuffixes(vec![7, 19]))
            .unwrap();
        assert_eq!(id, "doc.txt_19");
        assert!(trash.join("files/doc.txt_19").exists());
    }

    #[test]
    fn failed_content_move_removes_orphan_record() {
        let td = tempdir().unwrap();
        let trash = td.path().join("Trash");
        let cand = candidate(&trash, td.path());
        let dir = PutTrashDir::new(&cand);
        dir.prepare().unwrap();

        let missing = td.path().join("vanished.txt");
        let err = dir.trash(&missing, &missing, date(), &mut SequenceSuffixes(vec![]));
        assert!(err.is_err());
        assert!(
            !trash.join("info/vanished.txt.trashinfo").exists(),
            "orphan record must be cleaned up"
        );
    }
}
