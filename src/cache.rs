use crate::{
    ecma_versions::EcmaVersion,
    validator::{Options, ValidatePatternFlags},
};

/// Identifies one memoizable parse: the source text plus everything that
/// can change how it's interpreted. Two equal keys must parse to
/// structurally identical ASTs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub strict: bool,
    pub ecma_version: EcmaVersion,
    pub unicode: bool,
    pub unicode_sets: bool,
}

impl CacheKey {
    pub fn new(source: impl Into<String>, options: Options, flags: ValidatePatternFlags) -> Self {
        Self {
            source: source.into(),
            strict: options.strict,
            ecma_version: options.ecma_version,
            unicode: flags.unicode,
            unicode_sets: flags.unicode_sets,
        }
    }
}

/// Interface a host application can implement to memoize parses across
/// calls (spec.md §6.3). No implementation ships with this crate: an LRU
/// policy, eviction, and thread-safety are all host concerns.
pub trait ParseCache<V> {
    fn get(&self, key: &CacheKey) -> Option<V>;
    fn put(&mut self, key: CacheKey, value: V);
}
