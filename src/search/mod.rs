//! Bounded-distance enumeration over a membership index.
//!
//! A radius-`r` query does not scan the indexed keys at all. It walks the
//! Hamming ball around the query key instead: every combination of up to
//! `r` bit flips is generated exactly once and probed against the index.
//! The per-query cost is therefore a fixed `sum(C(32, i) for i <= r)`
//! probes, independent of how many keys are indexed.

use crate::{Key, KeyIndex, MAX_DISTANCE};

/// Reusable match buffer.
///
/// Cleared (length reset, backing storage kept) by the caller before each
/// query; matches appear in enumeration order, not sorted by distance or
/// value. No dedup is needed: the enumeration never revisits a bit
/// subset, so a key cannot be pushed twice within one query.
pub struct ResultBuf {
    keys: Vec<Key>,
}

impl ResultBuf {
    pub fn new() -> Self {
        Self {
            keys: Vec::with_capacity(16),
        }
    }

    /// Reset the logical length to zero; capacity is retained so a long
    /// benchmark loop stops allocating once the buffer has warmed up.
    #[inline]
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    #[inline]
    pub fn push(&mut self, key: Key) {
        self.keys.push(key);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    pub fn as_slice(&self) -> &[Key] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.keys.iter()
    }
}

impl Default for ResultBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ResultBuf {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Membership probes a radius-`r` query performs:
/// `sum(C(32, i) for i in 0..=r)`. Independent of the index contents.
pub fn ball_size(radius: u32) -> u64 {
    let mut total = 0u64;
    let mut term = 1u64;
    for i in 0..=radius.min(MAX_DISTANCE) as u64 {
        if i > 0 {
            // C(32, i) from C(32, i-1); the product is always divisible.
            term = term * (MAX_DISTANCE as u64 - i + 1) / i;
        }
        total += term;
    }
    total
}

/// Append every indexed key within Hamming distance `radius` of `query`
/// to `out`, returning the number of membership probes performed.
///
/// The caller clears (or not) `out`; this only appends. `radius` may be
/// 0 (the query key alone is probed) up to 32; the harness restricts its
/// own queries to 1..32 but the algorithm is defined on the full range.
pub fn search<I: KeyIndex>(index: &I, query: Key, radius: u32, out: &mut ResultBuf) -> u64 {
    debug_assert!(radius <= MAX_DISTANCE);
    visit(index, query, radius.min(MAX_DISTANCE), 1 << 31, out)
}

/// One node of the enumeration: probe `candidate`, then recurse into
/// every strictly lower-order bit position than the last one flipped.
/// Descending-only recursion is what makes each flipped-bit subset
/// unique -- combinations, not permutations.
fn visit<I: KeyIndex>(
    index: &I,
    candidate: Key,
    budget: u32,
    mut bit: Key,
    out: &mut ResultBuf,
) -> u64 {
    let mut probes = 1u64;
    if index.contains(candidate) {
        out.push(candidate);
    }
    if budget == 0 {
        return probes;
    }
    while bit != 0 {
        probes += visit(index, candidate ^ bit, budget - 1, bit >> 1, out);
        bit >>= 1;
    }
    probes
}

#[cfg(test)]
mod tests {
    use super::{ball_size, search, ResultBuf};
    use crate::hash_index::HashIndex;
    use crate::rng::Mwc;
    use crate::{distance, Key};

    /// Oracle: linear scan with an explicit distance filter.
    fn brute_force(keys: &[Key], query: Key, radius: u32) -> Vec<Key> {
        let mut matches: Vec<Key> = keys
            .iter()
            .copied()
            .filter(|&k| distance(query, k) <= radius)
            .collect();
        matches.sort_unstable();
        matches
    }

    fn run(keys: &[Key], query: Key, radius: u32) -> (Vec<Key>, u64) {
        let index = HashIndex::build(keys);
        let mut out = ResultBuf::new();
        let probes = search(&index, query, radius, &mut out);
        let mut found: Vec<Key> = out.as_slice().to_vec();
        found.sort_unstable();
        (found, probes)
    }

    #[test]
    fn matches_brute_force_on_random_sets() {
        let mut rng = Mwc::seed(0xbeef);
        let keys: Vec<Key> = (0..200).map(|_| rng.next_u32()).collect();

        for radius in [0, 1, 2, 3] {
            for _ in 0..5 {
                let query = rng.next_u32();
                let (found, _) = run(&keys, query, radius);
                assert_eq!(found, brute_force(&keys, query, radius));
            }
        }
    }

    #[test]
    fn finds_near_neighbors_planted_around_the_query() {
        let query = 0x5a5a_5a5a;
        // One key per distance 0..=4 from the query.
        let keys = [
            query,
            query ^ (1 << 31),
            query ^ 0b11,
            query ^ 0b111,
            query ^ 0b1111,
        ];

        for radius in 0..=4 {
            let (found, _) = run(&keys, query, radius);
            assert_eq!(found, brute_force(&keys, query, radius));
            assert_eq!(found.len(), radius as usize + 1);
        }
    }

    #[test]
    fn probe_count_is_the_ball_size_regardless_of_contents() {
        let empty: &[Key] = &[];
        let full: &[Key] = &[0, 1, 2, 3, u32::MAX];

        for radius in 0..=4 {
            let (_, probes_empty) = run(empty, 0x1234_5678, radius);
            let (_, probes_full) = run(full, 0, radius);
            assert_eq!(probes_empty, ball_size(radius));
            assert_eq!(probes_full, ball_size(radius));
        }
    }

    #[test]
    fn ball_size_closed_forms() {
        assert_eq!(ball_size(0), 1);
        assert_eq!(ball_size(1), 33);
        assert_eq!(ball_size(2), 529);
        assert_eq!(ball_size(3), 5489);
        // Radius 32 covers the whole universe.
        assert_eq!(ball_size(32), 1u64 << 32);
    }

    #[test]
    fn radius_one_excludes_distance_two() {
        // Indexed set {0, 3}: distance(0, 3) = 2.
        let (found, _) = run(&[0, 3], 0, 1);
        assert_eq!(found, vec![0]);

        let (found, _) = run(&[0, 3], 0, 2);
        assert_eq!(found, vec![0, 3]);
    }

    #[test]
    fn radius_zero_probes_exactly_once() {
        let (found, probes) = run(&[0xdead_beef], 0xdead_beef, 0);
        assert_eq!(found, vec![0xdead_beef]);
        assert_eq!(probes, 1);
    }

    #[test]
    fn no_duplicate_matches_in_one_query() {
        let mut rng = Mwc::seed(3);
        let keys: Vec<Key> = (0..64).map(|_| rng.next_u32() & 0xff).collect();
        let (found, _) = run(&keys, 0, 3);
        let mut deduped = found.clone();
        deduped.dedup();
        assert_eq!(found, deduped);
    }

    #[test]
    fn dense_and_hash_indexes_agree_on_identical_queries() {
        use crate::dense::DenseBitIndex;

        let mut rng = Mwc::seed(0x1ce);
        let keys: Vec<Key> = (0..500).map(|_| rng.next_u32()).collect();
        let dense = DenseBitIndex::build(&keys);
        let hash = HashIndex::build(&keys);

        let mut dense_out = ResultBuf::new();
        let mut hash_out = ResultBuf::new();
        for radius in [1, 2] {
            for _ in 0..3 {
                let query = rng.next_u32();
                dense_out.clear();
                hash_out.clear();
                let dense_probes = search(&dense, query, radius, &mut dense_out);
                let hash_probes = search(&hash, query, radius, &mut hash_out);
                // Same enumeration order, so the buffers match exactly.
                assert_eq!(dense_out.as_slice(), hash_out.as_slice());
                assert_eq!(dense_probes, hash_probes);
            }
        }
    }

    #[test]
    fn buffer_clear_resets_length_only() {
        let mut buf = ResultBuf::new();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 16);

        for key in 0..100u32 {
            buf.push(key);
        }
        let grown = buf.capacity();
        assert_eq!(buf.len(), 100);

        buf.clear();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), grown);
    }

    #[test]
    fn buffer_preserves_insertion_order_across_growth() {
        let mut buf = ResultBuf::new();
        let keys: Vec<Key> = (0..1000).map(|i| i * 7 + 1).collect();
        for &key in &keys {
            buf.push(key);
        }
        assert_eq!(buf.as_slice(), &keys[..]);
        let collected: Vec<Key> = buf.iter().copied().collect();
        assert_eq!(collected, keys);
    }
}
