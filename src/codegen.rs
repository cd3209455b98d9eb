use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::ShortenError;

/// Length of every generated short code.
pub const CODE_LEN: usize = 6;

/// How many candidates [`allocate_unique`] draws before giving up. With 62^6
/// possible codes this is only reachable once the code space is nearly full.
pub const MAX_ATTEMPTS: usize = 1024;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Something that hands out candidate short codes. Candidates are not
/// guaranteed to be unique; see [`allocate_unique`].
pub trait CodeSource: Send + Sync {
    fn next_code(&mut self) -> String;
}

/// Uniformly random alphanumeric codes of [`CODE_LEN`] characters.
#[derive(Debug, Clone)]
pub struct RandomCodes<R = StdRng> {
    rng: R,
}

impl RandomCodes<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send + Sync> CodeSource for RandomCodes<R> {
    fn next_code(&mut self) -> String {
        random_code(&mut self.rng, CODE_LEN)
    }
}

/// Generate a random alphanumeric string of the given length.
pub fn random_code<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Draw codes from `source` until one is not `taken`.
pub fn allocate_unique<F>(source: &mut dyn CodeSource, taken: F) -> Result<String, ShortenError>
where
    F: Fn(&str) -> bool,
{
    for _ in 0..MAX_ATTEMPTS {
        let code = source.next_code();
        if !taken(&code) {
            return Ok(code);
        }
    }
    tracing::error!("No free short code after {} attempts", MAX_ATTEMPTS);
    Err(ShortenError::CodeSpaceExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    struct Scripted(VecDeque<&'static str>);

    impl CodeSource for Scripted {
        fn next_code(&mut self) -> String {
            self.0.pop_front().unwrap_or("zzzzzz").to_owned()
        }
    }

    #[test]
    fn generated_codes_are_six_alphanumerics() {
        let mut codes = RandomCodes::seeded(7);
        for _ in 0..2_000 {
            let code = codes.next_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn generator_covers_all_character_classes() {
        let mut codes = RandomCodes::seeded(42);
        let seen: String = (0..500).map(|_| codes.next_code()).collect();
        assert!(seen.chars().any(|c| c.is_ascii_uppercase()));
        assert!(seen.chars().any(|c| c.is_ascii_lowercase()));
        assert!(seen.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn allocate_skips_taken_candidates() {
        let mut source = Scripted(VecDeque::from(["aaaaaa", "bbbbbb", "cccccc"]));
        let taken: HashSet<&str> = ["aaaaaa", "bbbbbb"].into_iter().collect();

        let code = allocate_unique(&mut source, |c| taken.contains(c)).unwrap();
        assert_eq!(code, "cccccc");
    }

    #[test]
    fn allocate_gives_up_when_everything_is_taken() {
        let mut source = Scripted(VecDeque::new());
        let err = allocate_unique(&mut source, |_| true).unwrap_err();
        assert!(matches!(err, ShortenError::CodeSpaceExhausted));
    }
}
