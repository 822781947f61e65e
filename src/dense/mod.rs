//! Full-universe membership bitmap: one bit per possible 32-bit key.

use crate::{Key, KeyIndex};

/// Words in a full-universe bitmap: 2^32 bits / 64 bits per word.
pub const UNIVERSE_WORDS: usize = 1 << 26;

/// Heap footprint of a full-universe bitmap: 512 MiB.
pub const UNIVERSE_BYTES: usize = UNIVERSE_WORDS * 8;

/// Flat bit array. Single owned allocation, sized at construction and
/// never grown, so `set`/`test` stay one word access each.
pub struct Bitmap {
    words: Vec<u64>,
}

impl Bitmap {
    /// Allocate `words` zeroed 64-bit words.
    pub fn with_words(words: usize) -> Self {
        Self {
            words: vec![0u64; words],
        }
    }

    /// Allocate one bit for every possible `u32` key, eagerly zeroed.
    /// 512 MiB: the space half of this design's space-for-speed trade.
    pub fn universe() -> Self {
        Self::with_words(UNIVERSE_WORDS)
    }

    #[inline]
    pub fn set(&mut self, bit: Key) {
        self.words[(bit >> 6) as usize] |= 1u64 << (bit & 63);
    }

    #[inline]
    pub fn test(&self, bit: Key) -> bool {
        (self.words[(bit >> 6) as usize] >> (bit & 63)) & 1 != 0
    }

    pub fn size_bytes(&self) -> usize {
        self.words.len() * 8
    }
}

/// Exact-membership index over the whole 32-bit key domain.
///
/// Build sets one bit per input key; `contains` is a single word load and
/// bit test no matter how many keys are indexed. Read-only after build.
pub struct DenseBitIndex {
    bits: Bitmap,
    len: usize,
}

impl DenseBitIndex {
    /// An empty index with the universe bitmap already allocated.
    pub fn new() -> Self {
        Self {
            bits: Bitmap::universe(),
            len: 0,
        }
    }

    /// Build from a key sequence. Duplicates in the input are idempotent;
    /// `len` counts distinct keys only.
    pub fn build(keys: &[Key]) -> Self {
        let mut index = Self::new();
        for &key in keys {
            index.insert(key);
        }
        index
    }

    /// Heap footprint of the bit array.
    pub fn footprint_bytes(&self) -> usize {
        self.bits.size_bytes()
    }
}

impl Default for DenseBitIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyIndex for DenseBitIndex {
    #[inline]
    fn insert(&mut self, key: Key) -> bool {
        if self.bits.test(key) {
            return false;
        }
        self.bits.set(key);
        self.len += 1;
        true
    }

    #[inline]
    fn contains(&self, key: Key) -> bool {
        self.bits.test(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        1usize << 32
    }
}
