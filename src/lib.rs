//! Core library for `trashcan`.
//!
//! Implements a FreeDesktop-style trash engine: `put` moves files into a
//! reversible holding area (a trash directory with `files/` and `info/`
//! subdirectories), `empty` expires old entries. The engine is synchronous
//! and single-threaded; candidate trash directories are tried in a fixed,
//! deterministic priority order, and the only concurrency-safety primitive
//! is atomic create-if-absent plus randomized-suffix retry.
//!
//! External collaborators (device resolution, the clock, randomness, console
//! prompts) are injected through small traits so the core logic is testable
//! without a terminal or real mounts.

use std::collections::HashMap;

pub mod clock;
pub mod config;
pub mod empty;
pub mod errors;
pub mod interact;
pub mod output;
pub mod put;
pub mod security;
pub mod trashinfo;
pub mod volume;

pub use clock::{Clock, SystemClock};
pub use errors::TrashError;
pub use interact::{ConsoleInput, UserInput};
pub use trashinfo::TrashInfo;
pub use volume::{list_volume_roots, RealVolumes, Volume, Volumes};

/// Normalized process environment, as handed in by the binary.
pub type Environ = HashMap<String, String>;
