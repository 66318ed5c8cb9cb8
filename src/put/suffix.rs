//! Randomized name suffixes for collision avoidance.
//!
//! The first allocation attempt uses the plain basename; every retry appends
//! `_<random>`. The randomness source is injected so tests can force
//! collisions deterministically and verify the bounded retry.

use rand::Rng;

pub trait SuffixSource {
    fn next_suffix(&mut self) -> u16;
}

/// Thread-RNG backed source used in production.
pub struct RandomSuffixes;

impl SuffixSource for RandomSuffixes {
    fn next_suffix(&mut self) -> u16 {
        rand::thread_rng().gen()
    }
}

/// Basename for the given attempt number (attempt 0 is the plain name).
pub fn name_for_attempt(base: &str, attempt: u32, source: &mut dyn SuffixSource) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}_{}", source.next_suffix())
    }
}

#[cfg(test)]
pub(crate) struct SequenceSuffixes(pub Vec<u16>);

#[cfg(test)]
impl SuffixSource for SequenceSuffixes {
    fn next_suffix(&mut self) -> u16 {
        if self.0.is_empty() {
            0
        } else {
            self.0.remove(0)
        }
    }
}
