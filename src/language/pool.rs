use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;

use crate::error::{ConfigurationError, LabResult};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A named, immutable set of candidate words.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WordPool {
    pub name: String,
    pub words: Vec<String>,
}

impl WordPool {
    pub fn new<S: Into<String>>(name: S, words: Vec<String>) -> Self {
        Self {
            name: name.into(),
            words,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Word pools keyed by theme name
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: HashMap<String, WordPool>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every pool embedded under `src/lang`.
    pub fn builtin() -> LabResult<Self> {
        let mut registry = Self::new();
        for file in LANG_DIR.files() {
            let is_json = file
                .path()
                .extension()
                .is_some_and(|ext| ext == "json");
            if !is_json {
                continue;
            }
            let Some(contents) = file.contents_utf8() else {
                continue;
            };
            let pool: WordPool = from_str(contents)?;
            registry.register(pool)?;
        }
        Ok(registry)
    }

    /// Adds a pool, replacing any pool already registered under the same name.
    pub fn register(&mut self, pool: WordPool) -> Result<(), ConfigurationError> {
        if pool.is_empty() {
            return Err(ConfigurationError::EmptyPool(pool.name));
        }
        self.pools.insert(pool.name.clone(), pool);
        Ok(())
    }

    /// Resolves a theme to its pool; unknown and empty pools are both errors.
    pub fn get(&self, theme: &str) -> Result<&WordPool, ConfigurationError> {
        match self.pools.get(theme) {
            Some(pool) if !pool.is_empty() => Ok(pool),
            Some(_) => Err(ConfigurationError::EmptyPool(theme.to_string())),
            None => Err(ConfigurationError::UnknownPool(theme.to_string())),
        }
    }

    pub fn contains(&self, theme: &str) -> bool {
        self.pools.contains_key(theme)
    }

    /// Theme names, sorted
    pub fn themes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.keys().cloned().collect();
        names.sort();
        names
    }

    /// The theme after `current` in sorted order, wrapping around.
    pub fn next_theme(&self, current: &str) -> Option<String> {
        let themes = self.themes();
        let idx = themes.iter().position(|t| t == current);
        match idx {
            Some(i) => themes.get((i + 1) % themes.len()).cloned(),
            None => themes.first().cloned(),
        }
    }
}
