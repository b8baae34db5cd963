use std::collections::{HashSet, VecDeque};

use sha2::{Digest, Sha256};

/// A winnowing fingerprint: one SHA-256 digest of a k-gram of tags. Compared
/// bytewise, which orders digests like 256-bit big-endian integers.
pub(crate) type Fingerprint = [u8; 32];

fn hash_kgram(tags: &[&str]) -> Fingerprint {
    let mut hasher = Sha256::new();
    for tag in tags {
        hasher.update(tag.as_bytes());
    }
    hasher.finalize().into()
}

/// Document fingerprinting over a tag sequence: hash every k-gram, then slide
/// a window of `t` hashes emitting a value only when it enters as the window
/// minimum. The bootstrap window always contributes its minimum, so every
/// window of size `t` is represented in the result.
///
/// Sequences shorter than `k` produce no k-grams and an empty set; fewer than
/// `t` hashes degrade to a single window covering all of them.
pub(crate) fn winnow(tags: &[&str], k: usize, t: usize) -> HashSet<Fingerprint> {
    let mut fingerprints = HashSet::new();
    if k == 0 || t == 0 || tags.len() < k {
        return fingerprints;
    }

    let hashes: Vec<Fingerprint> = (0..=tags.len() - k)
        .map(|i| hash_kgram(&tags[i..i + k]))
        .collect();

    if hashes.len() < t {
        if let Some(min) = hashes.iter().min() {
            fingerprints.insert(*min);
        }
        return fingerprints;
    }

    // The window is addressed by position, never by value, so equal hashes
    // can coexist in-window without evicting the wrong slot.
    let mut window: VecDeque<Fingerprint> = hashes[..t].iter().copied().collect();
    let bootstrap_min = *window.iter().min().expect("window has items");
    fingerprints.insert(bootstrap_min);

    for &hash in &hashes[t..] {
        window.pop_front();
        window.push_back(hash);
        let min = *window.iter().min().expect("window has items");
        if hash == min {
            fingerprints.insert(hash);
        }
    }

    fingerprints
}
