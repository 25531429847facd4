// src/placement/registry.rs

//! Strategy identifier → factory lookup.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{DayplanError, Result};
use crate::placement::{
    BalancedLoad, EarliestFit, LatestFit, PlacementStrategy, BALANCED_LOAD, EARLIEST_FIT,
    LATEST_FIT,
};

/// Builds a fresh strategy instance for one scheduling request.
pub type StrategyFactory = Box<dyn Fn() -> Box<dyn PlacementStrategy> + Send + Sync>;

/// Registry of placement strategies keyed by identifier.
///
/// Identifiers are matched after trimming and lower-casing. Unknown
/// identifiers are an error; there is no fallback strategy.
pub struct StrategyRegistry {
    factories: BTreeMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with `earliest-fit`, `latest-fit` and `balanced-load`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(EARLIEST_FIT, || Box::new(EarliestFit));
        registry.register(LATEST_FIT, || Box::new(LatestFit));
        registry.register(BALANCED_LOAD, || Box::new(BalancedLoad));
        registry
    }

    /// Register (or replace) the factory for `name`.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn PlacementStrategy> + Send + Sync + 'static,
    {
        self.factories.insert(normalize(name), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&normalize(name))
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|s| s.as_str())
    }

    /// Instantiate the strategy registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn PlacementStrategy>> {
        self.factories
            .get(&normalize(name))
            .map(|factory| factory())
            .ok_or_else(|| DayplanError::UnknownStrategy(name.to_string()))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
