//! Interactive confirmation for an emptying pass.
//!
//! In interactive mode the directories about to be emptied are shown and a
//! yes/no confirmation is requested; anything but an affirmative reply turns
//! the pass into a no-op. Non-interactive mode proceeds unconditionally.

use std::path::PathBuf;
use tracing::debug;

use crate::interact::{is_affirmative, UserInput};

/// Outcome of the guard: whether to proceed, and the approved directories.
#[derive(Debug)]
pub struct DeletePass {
    pub proceed: bool,
    pub trash_dirs: Vec<PathBuf>,
}

pub struct Guard;

impl Guard {
    pub fn ask(
        &self,
        interactive: bool,
        trash_dirs: Vec<PathBuf>,
        input: &mut dyn UserInput,
    ) -> DeletePass {
        if !interactive {
            return DeletePass {
                proceed: true,
                trash_dirs,
            };
        }

        let mut prompt = String::from("About to empty these trash directories:\n");
        for dir in &trash_dirs {
            prompt.push_str(&format!("  - {}\n", dir.display()));
        }
        prompt.push_str("Proceed? [y/N] ");

        let proceed = match input.read_reply(&prompt) {
            Ok(reply) => is_affirmative(&reply),
            Err(e) => {
                debug!(error = %e, "could not read confirmation; not emptying");
                false
            }
        };
        DeletePass {
            proceed,
            trash_dirs,
        }
    }
}
