//! Set-overlap similarity.
//!
//! All similarity in Larder is structural: it compares which neighbours
//! two entities share, never what their names mean.

use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`.
///
/// Returns 0.0 when either set is empty, so two empty sets are not
/// considered identical.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}
