use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::error::ConfigurationError;
use crate::language::PoolRegistry;

/// Enough words that nobody exhausts them within the longest session.
pub const TARGET_WORD_COUNT: usize = 160;

/// Builds target word streams from a pool, using an injected random source
#[derive(Debug)]
pub struct WordGenerator<R: Rng = StdRng> {
    rng: R,
}

impl WordGenerator<StdRng> {
    /// Generator seeded from the OS entropy source
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic generator: the same seed always yields the same stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WordGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Samples `count` words uniformly, with replacement, from the pool
    /// registered under `theme`. Adjacent repeats are allowed.
    pub fn generate(
        &mut self,
        registry: &PoolRegistry,
        theme: &str,
        count: usize,
    ) -> Result<Vec<String>, ConfigurationError> {
        if count == 0 {
            return Err(ConfigurationError::ZeroWordCount);
        }
        let pool = registry.get(theme).inspect_err(|e| {
            warn!(theme, error = %e, "word pool lookup failed");
        })?;

        let words = (0..count)
            .filter_map(|_| pool.words.choose(&mut self.rng).cloned())
            .collect();
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::WordPool;

    fn registry() -> PoolRegistry {
        let mut registry = PoolRegistry::new();
        registry
            .register(WordPool::new(
                "classic",
                vec!["kernel".into(), "buffer".into(), "socket".into()],
            ))
            .unwrap();
        registry
    }

    #[test]
    fn generates_requested_count_from_pool() {
        let registry = registry();
        let mut generator = WordGenerator::seeded(7);

        let words = generator.generate(&registry, "classic", 50).unwrap();

        assert_eq!(words.len(), 50);
        let pool = registry.get("classic").unwrap();
        assert!(words.iter().all(|w| pool.words.contains(w)));
    }

    #[test]
    fn same_seed_same_stream() {
        let registry = registry();

        let a = WordGenerator::seeded(42)
            .generate(&registry, "classic", 20)
            .unwrap();
        let b = WordGenerator::seeded(42)
            .generate(&registry, "classic", 20)
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn samples_with_replacement() {
        let mut registry = PoolRegistry::new();
        registry
            .register(WordPool::new("solo", vec!["echo".into()]))
            .unwrap();

        let words = WordGenerator::seeded(1)
            .generate(&registry, "solo", 5)
            .unwrap();

        assert_eq!(words, vec!["echo"; 5]);
    }

    #[test]
    fn unknown_theme_is_configuration_error() {
        let err = WordGenerator::seeded(1)
            .generate(&registry(), "unknown-theme", 10)
            .unwrap_err();

        assert_eq!(err, ConfigurationError::UnknownPool("unknown-theme".into()));
    }

    #[test]
    fn zero_count_is_configuration_error() {
        let err = WordGenerator::seeded(1)
            .generate(&registry(), "classic", 0)
            .unwrap_err();

        assert_eq!(err, ConfigurationError::ZeroWordCount);
    }

    #[test]
    fn builtin_pools_fill_a_full_session() {
        let registry = PoolRegistry::builtin().unwrap();
        let mut generator = WordGenerator::from_entropy();

        for theme in registry.themes() {
            let words = generator
                .generate(&registry, &theme, TARGET_WORD_COUNT)
                .unwrap();
            assert_eq!(words.len(), TARGET_WORD_COUNT);
        }
    }
}
