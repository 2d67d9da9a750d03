//! Name to identifier resolution.

use std::collections::HashMap;

/// Supplies the stable identifier of a quantity name.
///
/// Implementations must be pure: the same name always resolves the same
/// way, so results can be memoized by [`ResolverCache`].
pub trait IdentifierResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> IdentifierResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Shortened tokens used in older tables and their full words.
#[derive(Debug, Clone)]
pub struct AbbreviationTable {
    entries: Vec<(String, String)>,
}

impl AbbreviationTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an abbreviation. Entries are applied in insertion order.
    #[must_use]
    pub fn with(mut self, abbreviation: impl Into<String>, expansion: impl Into<String>) -> Self {
        self.entries.push((abbreviation.into(), expansion.into()));
        self
    }

    /// Replace every known abbreviation in `name`.
    ///
    /// # Examples
    /// ```
    /// use codata_normalizer::identifiers::AbbreviationTable;
    ///
    /// let table = AbbreviationTable::default();
    /// assert_eq!(table.expand("electron mag. mom."), "electron magnetic moment");
    /// ```
    #[must_use]
    pub fn expand(&self, name: &str) -> String {
        self.entries
            .iter()
            .fold(name.to_string(), |name, (abbreviation, expansion)| {
                name.replace(abbreviation.as_str(), expansion)
            })
    }
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::new()
            .with("mag.", "magnetic")
            .with("mom.", "moment")
    }
}

/// Memoizing front for an [`IdentifierResolver`].
///
/// Names are abbreviation-expanded before lookup and results (hits and misses)
/// are cached by the name as given.
pub struct ResolverCache<'r> {
    resolver: &'r dyn IdentifierResolver,
    abbreviations: AbbreviationTable,
    cache: HashMap<String, Option<String>>,
}

impl<'r> ResolverCache<'r> {
    /// Create a cache with the default abbreviation table.
    #[must_use]
    pub fn new(resolver: &'r dyn IdentifierResolver) -> Self {
        Self::with_abbreviations(resolver, AbbreviationTable::default())
    }

    #[must_use]
    pub fn with_abbreviations(
        resolver: &'r dyn IdentifierResolver,
        abbreviations: AbbreviationTable,
    ) -> Self {
        Self {
            resolver,
            abbreviations,
            cache: HashMap::new(),
        }
    }

    /// Resolve a published quantity name.
    pub fn resolve(&mut self, name: &str) -> Option<String> {
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }
        let expanded = self.abbreviations.expand(name);
        let id = self.resolver.resolve(&expanded);
        tracing::debug!(quantity = name, expanded = %expanded, id = ?id, "Resolved identifier");
        self.cache.insert(name.to_string(), id.clone());
        id
    }

    /// Number of distinct names looked up so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_abbreviation_expand() {
        let table = AbbreviationTable::default();
        assert_eq!(
            table.expand("neutron mag. mom. to nuclear magneton ratio"),
            "neutron magnetic moment to nuclear magneton ratio"
        );
        assert_eq!(table.expand("electron mass"), "electron mass");
    }

    #[test]
    fn test_custom_abbreviation_table() {
        let table = AbbreviationTable::new().with("grav.", "gravitation");
        assert_eq!(
            table.expand("Newtonian constant of grav."),
            "Newtonian constant of gravitation"
        );
        assert_eq!(table.expand("mag."), "mag.");
    }

    #[test]
    fn test_cache_expands_before_lookup() {
        let resolver =
            |name: &str| (name == "electron magnetic moment").then(|| "muem".to_string());
        let mut cache = ResolverCache::new(&resolver);

        assert_eq!(cache.resolve("electron mag. mom.").as_deref(), Some("muem"));
        assert_eq!(cache.resolve("unknown"), None);
    }

    #[test]
    fn test_cache_memoizes_hits_and_misses() {
        let calls = Cell::new(0);
        let resolver = |name: &str| {
            calls.set(calls.get() + 1);
            (name == "elementary charge").then(|| "e".to_string())
        };
        let mut cache = ResolverCache::new(&resolver);

        for _ in 0..3 {
            assert_eq!(cache.resolve("elementary charge").as_deref(), Some("e"));
            assert_eq!(cache.resolve("nothing"), None);
        }
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }
}
