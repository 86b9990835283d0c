use std::{collections::HashMap, hash::Hash};

/// Combines the parameter a controller currently holds with a newly supplied
/// one. The result is what the next transition's state callbacks receive.
///
/// Implementations are expected to be pure.
pub trait ParameterMerger<P> {
    fn merge(&self, current: &P, supplied: &P) -> P;
}

impl<P, F> ParameterMerger<P> for F
where
    F: Fn(&P, &P) -> P,
{
    fn merge(&self, current: &P, supplied: &P) -> P {
        (self)(current, supplied)
    }
}

// ReplaceMerger

/// The newest parameter wins outright
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaceMerger;

impl<P: Clone> ParameterMerger<P> for ReplaceMerger {
    fn merge(&self, _current: &P, supplied: &P) -> P {
        supplied.clone()
    }
}

// BundleMerger

/// Key/value bundles are unioned, keys in the newer bundle overwrite
#[derive(Clone, Copy, Debug, Default)]
pub struct BundleMerger;

impl<K, V> ParameterMerger<HashMap<K, V>> for BundleMerger
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn merge(&self, current: &HashMap<K, V>, supplied: &HashMap<K, V>) -> HashMap<K, V> {
        let mut merged = current.clone();
        for (key, value) in supplied {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}
