/// Sharpness score source
///
/// The analysis pipeline asks a `ScoreSource` for one score per
/// uploaded file. The shipped implementation is a uniform random
/// stub; a real analyzer slots in behind the same trait.

use std::path::Path;

use rand::Rng;

/// Produces a sharpness score in 0..100 for an image file.
pub trait ScoreSource {
    fn score(&mut self, file: &Path) -> u8;
}

/// Simulated scoring: uniform random draw, ignores the file contents.
#[derive(Debug, Default)]
pub struct RandomScore;

impl ScoreSource for RandomScore {
    fn score(&mut self, _file: &Path) -> u8 {
        rand::thread_rng().gen_range(0..100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_score_stays_in_range() {
        let mut source = RandomScore;
        for _ in 0..500 {
            let score = source.score(Path::new("whatever.jpg"));
            assert!(score < 100);
        }
    }
}
