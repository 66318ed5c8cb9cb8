//! Volume resolution.
//!
//! A `Volume` identifies one mounted filesystem by its mount root. Two paths
//! are on the same volume iff their resolved mount roots are equal, which is
//! what decides whether a rename into a trash directory can be atomic.
//!
//! Resolution is behind the `Volumes` trait so the engine takes it as an
//! explicit dependency and tests can substitute a fake mapping.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One mounted filesystem, identified by its top directory (mount root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    top_dir: PathBuf,
}

impl Volume {
    pub fn new(top_dir: impl Into<PathBuf>) -> Self {
        Self {
            top_dir: top_dir.into(),
        }
    }

    /// The mount root, used as the anchor for volume-relative path encoding
    /// and for locating `.Trash` / `.Trash-<uid>` directories.
    pub fn top_dir(&self) -> &Path {
        &self.top_dir
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.top_dir.display())
    }
}

pub trait Volumes {
    /// Volume holding `path`. For a path that does not exist yet, the volume
    /// of its nearest existing ancestor.
    fn volume_of(&self, path: &Path) -> io::Result<Volume>;
}

/// Device-id based resolver: walk upward until the parent directory lives on
/// a different device; that directory is the mount root.
pub struct RealVolumes;

impl Volumes for RealVolumes {
    fn volume_of(&self, path: &Path) -> io::Result<Volume> {
        let start = nearest_existing(path)?;
        let dev = fs::metadata(&start)?.dev();
        let mut current = start;
        loop {
            let parent = match current.parent() {
                Some(p) => p.to_path_buf(),
                None => break, // reached "/"
            };
            if fs::metadata(&parent)?.dev() != dev {
                break;
            }
            current = parent;
        }
        debug!(path = %path.display(), top_dir = %current.display(), "resolved volume");
        Ok(Volume { top_dir: current })
    }
}

/// Canonicalized nearest existing ancestor of `path` (or `path` itself).
fn nearest_existing(path: &Path) -> io::Result<PathBuf> {
    let mut current = path;
    loop {
        match fs::canonicalize(current) {
            Ok(p) => return Ok(p),
            Err(e) if e.kind() == io::ErrorKind::NotFound => match current.parent() {
                Some(p) => current = p,
                None => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }
}

/// Mount roots of every mounted filesystem, for the emptying side's
/// per-volume trash discovery. Order follows the mount table.
pub fn list_volume_roots() -> Vec<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        match fs::read_to_string("/proc/mounts") {
            Ok(table) => {
                let mut roots: Vec<PathBuf> = Vec::new();
                for line in table.lines() {
                    let Some(mount_point) = line.split_whitespace().nth(1) else {
                        continue;
                    };
                    let decoded = decode_mount_point(mount_point);
                    if !roots.contains(&decoded) {
                        roots.push(decoded);
                    }
                }
                roots
            }
            Err(e) => {
                debug!(error = %e, "could not read /proc/mounts; assuming only /");
                vec![PathBuf::from("/")]
            }
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        vec![PathBuf::from("/")]
    }
}

/// /proc/mounts escapes space, tab, newline and backslash as octal (\040 etc).
#[cfg(target_os = "linux")]
fn decode_mount_point(raw: &str) -> PathBuf {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().take(3).collect();
        if digits.len() == 3 {
            if let Ok(code) = u8::from_str_radix(&digits, 8) {
                out.push(code as char);
                for _ in 0..3 {
                    chars.next();
                }
                continue;
            }
        }
        out.push(c);
    }
    PathBuf::from(out)
}
