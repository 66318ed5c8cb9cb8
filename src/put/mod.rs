//! Placement side: candidate discovery, unique-name allocation and the
//! record+content pair creation that moves a file into a trash directory.

pub mod candidates;
pub mod suffix;
pub mod trash_dir;
pub mod trasher;

pub use candidates::{home_trash_dir, Candidate, CandidateFinder, PathEncoding};
pub use suffix::{RandomSuffixes, SuffixSource};
pub use trasher::{FileTrasher, PutMode, TrashResult, Trasher};
