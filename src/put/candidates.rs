//! Candidate trash-directory discovery for placement.
//!
//! For a target volume the finder yields an ordered list of directories to
//! try. The order is an external contract (home trash is preferred over
//! volume trash) and is tried strictly top-to-bottom:
//!
//! 1. the user's home trash (absolute encoding, no checks needed),
//! 2. `<top>/.Trash/<uid>` (volume-relative encoding, strict checks),
//! 3. `<top>/.Trash-<uid>` (volume-relative encoding, created on demand).
//!
//! An explicit `--trash-dir` override replaces the whole list.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::security::SecurityPolicy;
use crate::volume::{Volume, Volumes};
use crate::Environ;

/// How a record's `Path` value is derived from the original location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEncoding {
    /// Store the path unchanged.
    Absolute,
    /// Strip the candidate volume's top directory prefix when the path is
    /// under it; otherwise leave the path unchanged (defensive fallback).
    TopDirRelative,
}

impl PathEncoding {
    pub fn encode(&self, path: &Path, volume: &Volume) -> PathBuf {
        match self {
            PathEncoding::Absolute => path.to_path_buf(),
            PathEncoding::TopDirRelative => match path.strip_prefix(volume.top_dir()) {
                Ok(rel) if rel.as_os_str().is_empty() => path.to_path_buf(),
                Ok(rel) => rel.to_path_buf(),
                Err(_) => path.to_path_buf(),
            },
        }
    }
}

/// One directory the trasher may place a file in, tagged with the policies
/// it must satisfy.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub trash_dir: PathBuf,
    pub volume: Volume,
    pub encoding: PathEncoding,
    pub policy: SecurityPolicy,
}

pub struct CandidateFinder<'a> {
    volumes: &'a dyn Volumes,
}

impl<'a> CandidateFinder<'a> {
    pub fn new(volumes: &'a dyn Volumes) -> Self {
        Self { volumes }
    }

    /// Ordered candidates for placing a file that lives on `volume`.
    /// `home_override` replaces the environment-derived home trash slot.
    pub fn candidates_for(
        &self,
        volume: &Volume,
        override_dir: Option<&Path>,
        home_override: Option<&Path>,
        environ: &Environ,
        uid: u32,
    ) -> Vec<Candidate> {
        if let Some(dir) = override_dir {
            return match self.volumes.volume_of(dir) {
                Ok(vol) => vec![Candidate {
                    trash_dir: dir.to_path_buf(),
                    volume: vol,
                    encoding: PathEncoding::TopDirRelative,
                    policy: SecurityPolicy::UserOwned,
                }],
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "cannot resolve volume of trash dir override");
                    Vec::new()
                }
            };
        }

        let mut candidates = Vec::with_capacity(3);

        let home = home_override
            .map(Path::to_path_buf)
            .or_else(|| home_trash_dir(environ));
        if let Some(home) = home {
            match self.volumes.volume_of(&home) {
                Ok(vol) => candidates.push(Candidate {
                    trash_dir: home,
                    volume: vol,
                    encoding: PathEncoding::Absolute,
                    policy: SecurityPolicy::UserOwned,
                }),
                Err(e) => {
                    debug!(dir = %home.display(), error = %e, "cannot resolve volume of home trash");
                }
            }
        } else {
            debug!("neither XDG_DATA_HOME nor HOME set; skipping home trash");
        }

        candidates.push(Candidate {
            trash_dir: volume.top_dir().join(".Trash").join(uid.to_string()),
            volume: volume.clone(),
            encoding: PathEncoding::TopDirRelative,
            policy: SecurityPolicy::TopTrashDir,
        });
        candidates.push(Candidate {
            trash_dir: volume.top_dir().join(format!(".Trash-{uid}")),
            volume: volume.clone(),
            encoding: PathEncoding::TopDirRelative,
            policy: SecurityPolicy::UserOwned,
        });

        candidates
    }
}

/// Home trash per the XDG base directory rules: `$XDG_DATA_HOME/Trash`,
/// falling back to `$HOME/.local/share/Trash`.
pub fn home_trash_dir(environ: &Environ) -> Option<PathBuf> {
    if let Some(data_home) = environ.get("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(data_home).join("Trash"));
    }
    environ
        .get("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".local/share/Trash"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct OneVolume(PathBuf);

    impl Volumes for OneVolume {
        fn volume_of(&self, _path: &Path) -> io::Result<Volume> {
            Ok(Volume::new(self.0.clone()))
        }
    }

    fn environ(pairs: &[(&str, &str)]) -> Environ {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_order_and_policies() {
        let volumes = OneVolume(PathBuf::from("/"));
        let finder = CandidateFinder::new(&volumes);
        let env = environ(&[("HOME", "/home/dave")]);
        let vol = Volume::new("/mnt/usb");

        let cands = finder.candidates_for(&vol, None, None, &env, 1000);
        assert_eq!(cands.len(), 3);

        assert_eq!(cands[0].trash_dir, PathBuf::from("/home/dave/.local/share/Trash"));
        assert_eq!(cands[0].encoding, PathEncoding::Absolute);
        assert_eq!(cands[0].policy, SecurityPolicy::UserOwned);

        assert_eq!(cands[1].trash_dir, PathBuf::from("/mnt/usb/.Trash/1000"));
        assert_eq!(cands[1].encoding, PathEncoding::TopDirRelative);
        assert_eq!(cands[1].policy, SecurityPolicy::TopTrashDir);

        assert_eq!(cands[2].trash_dir, PathBuf::from("/mnt/usb/.Trash-1000"));
        assert_eq!(cands[2].policy, SecurityPolicy::UserOwned);
    }

    #[test]
    fn xdg_data_home_wins_over_home() {
        let volumes = OneVolume(PathBuf::from("/"));
        let finder = CandidateFinder::new(&volumes);
        let env = environ(&[("HOME", "/home/dave"), ("XDG_DATA_HOME", "/data")]);

        let cands = finder.candidates_for(&Volume::new("/"), None, None, &env, 1000);
        assert_eq!(cands[0].trash_dir, PathBuf::from("/data/Trash"));
    }

    #[test]
    fn no_home_env_drops_home_candidate() {
        let volumes = OneVolume(PathBuf::from("/"));
        let finder = CandidateFinder::new(&volumes);

        let cands = finder.candidates_for(&Volume::new("/mnt/usb"), None, None, &Environ::new(), 1000);
        assert_eq!(cands.len(), 2);
        assert_eq!(cands[0].trash_dir, PathBuf::from("/mnt/usb/.Trash/1000"));
    }

    #[test]
    fn override_replaces_all_candidates() {
        let volumes = OneVolume(PathBuf::from("/"));
        let finder = CandidateFinder::new(&volumes);
        let env = environ(&[("HOME", "/home/dave")]);

        let cands =
            finder.candidates_for(&Volume::new("/"), Some(Path::new("/tmp/mytrash")), None, &env, 1000);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].trash_dir, PathBuf::from("/tmp/mytrash"));
        assert_eq!(cands[0].policy, SecurityPolicy::UserOwned);
    }

    #[test]
    fn home_override_replaces_home_slot_only() {
        let volumes = OneVolume(PathBuf::from("/"));
        let finder = CandidateFinder::new(&volumes);
        let env = environ(&[("HOME", "/home/dave")]);

        let cands = finder.candidates_for(
            &Volume::new("/mnt/usb"),
            None,
            Some(Path::new("/srv/MyTrash")),
            &env,
            1000,
        );
        assert_eq!(cands.len(), 3);
        assert_eq!(cands[0].trash_dir, PathBuf::from("/srv/MyTrash"));
        assert_eq!(cands[1].trash_dir, PathBuf::from("/mnt/usb/.Trash/1000"));
    }

    #[test]
    fn relative_encoding_strips_topdir() {
        let vol = Volume::new("/mnt/usb");
        assert_eq!(
            PathEncoding::TopDirRelative.encode(Path::new("/mnt/usb/docs/a.txt"), &vol),
            PathBuf::from("docs/a.txt")
        );
    }

    #[test]
    fn relative_encoding_leaves_foreign_paths() {
        let vol = Volume::new("/mnt/usb");
        assert_eq!(
            PathEncoding::TopDirRelative.encode(Path::new("/elsewhere/a.txt"), &vol),
            PathBuf::from("/elsewhere/a.txt")
        );
        // The topdir itself stays as-is rather than becoming empty.
        assert_eq!(
            PathEncoding::TopDirRelative.encode(Path::new("/mnt/usb"), &vol),
            PathBuf::from("/mnt/usb")
        );
    }

    #[test]
    fn absolute_encoding_is_identity() {
        let vol = Volume::new("/mnt/usb");
        assert_eq!(
            PathEncoding::Absolute.encode(Path::new("/mnt/usb/a.txt"), &vol),
            PathBuf::from("/mnt/usb/a.txt")
        );
    }
}
