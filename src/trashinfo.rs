//! The `.trashinfo` record format.
//!
//! One record per trashed entry, plain key-value text:
//!
//! ```text
//! [Trash Info]
//! Path=<absolute or volume-relative path, percent-encoded>
//! DeletionDate=YYYY-MM-DDTHH:MM:SS
//! ```
//!
//! `Path` is percent-encoded byte-wise so non-UTF8 names survive the round
//! trip. `DeletionDate` is local time, second precision. Duplicate keys keep
//! the first occurrence; unknown keys are ignored.

use chrono::NaiveDateTime;
use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use crate::errors::TrashError;

pub const HEADER: &str = "[Trash Info]";
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Everything except unreserved characters and the path separator is escaped.
const PATH_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashInfo {
    /// Original location, absolute or relative to the volume top directory.
    pub original_path: PathBuf,
    pub deleted_at: NaiveDateTime,
}

impl TrashInfo {
    pub fn new(original_path: impl Into<PathBuf>, deleted_at: NaiveDateTime) -> Self {
        Self {
            original_path: original_path.into(),
            deleted_at,
        }
    }

    /// Serialize to record-file contents (trailing newline included).
    pub fn render(&self) -> String {
        let encoded = percent_encode(self.original_path.as_os_str().as_bytes(), PATH_ESCAPES);
        format!(
            "{HEADER}\nPath={}\nDeletionDate={}\n",
            encoded,
            self.deleted_at.format(DATE_FORMAT)
        )
    }

    /// Parse record-file contents. `record_path` is only used for error context.
    pub fn parse(contents: &str, record_path: &Path) -> Result<Self, TrashError> {
        let malformed = |reason: &str| TrashError::MalformedRecord {
            path: record_path.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
        if lines.next().map(str::trim) != Some(HEADER) {
            return Err(malformed("missing [Trash Info] header"));
        }

        let mut path: Option<PathBuf> = None;
        let mut date: Option<NaiveDateTime> = None;
        for line in lines {
            if let Some(value) = line.strip_prefix("Path=") {
                if path.is_none() {
                    let bytes: Vec<u8> = percent_decode_str(value).collect();
                    path = Some(PathBuf::from(std::ffi::OsString::from_vec(bytes)));
                }
            } else if let Some(value) = line.strip_prefix("DeletionDate=") {
                if date.is_none() {
                    let parsed = NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT)
                        .map_err(|_| malformed("unparsable DeletionDate"))?;
                    date = Some(parsed);
                }
            }
        }

        Ok(Self {
            original_path: path.ok_or_else(|| malformed("missing Path key"))?,
            deleted_at: date.ok_or_else(|| malformed("missing DeletionDate key"))?,
        })
    }
}
