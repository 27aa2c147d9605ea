//! Pure selectors over the validated dataset.
//!
//! Every function takes a borrowed slice and returns a fresh subsequence;
//! nothing here mutates or holds state, so the same call with the same
//! input always yields the same output.

use crate::db::{Record, Variant};

/// Records produced by one benchmark suite, order preserved.
pub fn by_test<'a>(name: &str, results: &[&'a Record]) -> Vec<&'a Record> {
    results
        .iter()
        .copied()
        .filter(|r| r.test_name == name)
        .collect()
}

/// Records run under one experimental condition, order preserved.
pub fn by_variant<'a>(variant: Variant, results: &[&'a Record]) -> Vec<&'a Record> {
    results
        .iter()
        .copied()
        .filter(|r| r.variant == variant)
        .collect()
}

/// Records grouped under one effective memory size, order preserved.
pub fn by_effective_memory<'a>(mem: u64, results: &[&'a Record]) -> Vec<&'a Record> {
    results
        .iter()
        .copied()
        .filter(|r| r.effective_memory() == mem)
        .collect()
}

/// Every effective memory size present in the input, ascending, no
/// duplicates.
pub fn distinct_memory_sizes(results: &[&Record]) -> Vec<u64> {
    let sizes: Vec<u64> = results.iter().map(|r| r.effective_memory()).collect();
    let mut sizes = unique(&sizes);
    sizes.sort_unstable();
    sizes
}

/// Every test name present in the input, dataset order.
pub fn distinct_test_names(results: &[&Record]) -> Vec<String> {
    let names: Vec<String> = results.iter().map(|r| r.test_name.clone()).collect();
    unique(&names)
}

/// Deduplicate, keeping the first occurrence of each value in place.
pub fn unique<T: Clone + PartialEq>(xs: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for x in xs {
        if !out.contains(x) {
            out.push(x.clone());
        }
    }
    out
}
