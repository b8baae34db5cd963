use std::collections::HashSet;

use crate::fingerprint::Fingerprint;

pub(crate) fn jaccard(a: &HashSet<Fingerprint>, b: &HashSet<Fingerprint>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

// Nonlinear remap sharpening the decision boundaries: weak matches are pushed
// down, the mid-band stays linear, strong matches are pulled up.
pub(crate) fn remap(x: f64) -> f64 {
    if x < 0.5 {
        x * x
    } else if x < 0.8 {
        x
    } else {
        x.sqrt()
    }
}

pub(crate) fn score(a: &HashSet<Fingerprint>, b: &HashSet<Fingerprint>) -> f64 {
    remap(jaccard(a, b))
}

/// Maximum under a strict-greater update: on ties the first-encountered
/// candidate wins. Candidates scoring 0 never displace the initial state.
pub(crate) fn best_of(scores: impl IntoIterator<Item = f64>) -> (f64, Option<usize>) {
    let mut best = 0.0;
    let mut best_index = None;
    for (index, value) in scores.into_iter().enumerate() {
        if value > best {
            best = value;
            best_index = Some(index);
        }
    }
    (best, best_index)
}
