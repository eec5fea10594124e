//! Growable Bit Vector for Points-to Sets
//!
//! Dense word-packed set of vertex ids:
//! - **Grow on demand**: setting bit `i` extends storage; reads past the end are false
//! - **Semantic equality**: trailing zero words never make two sets differ
//! - **Ordered scans**: `first` / `next_after` walk set bits in ascending order,
//!   so callers may mutate the vector between steps
//!
//! # Performance Characteristics
//! - Insert / Remove / Contains: O(1) (amortized for growth)
//! - Union: O(words)
//! - Equality: O(words)

use std::fmt;

const WORD_BITS: usize = 64;

/// Growable bit vector indexed by `u32`
#[derive(Clone, Default)]
pub struct BitVector {
    words: Vec<u64>,
}

impl BitVector {
    /// Create an empty vector
    #[inline]
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Create with room for `bits` bits
    #[inline]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(WORD_BITS)),
        }
    }

    /// Create with every bit in `0..len` set
    pub fn filled(len: usize) -> Self {
        let mut words = vec![u64::MAX; len / WORD_BITS];
        let rest = len % WORD_BITS;
        if rest > 0 {
            words.push((1u64 << rest) - 1);
        }
        Self { words }
    }

    #[inline]
    fn split(index: u32) -> (usize, u64) {
        let index = index as usize;
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    /// Set a bit. Returns true if it was not set before.
    #[inline]
    pub fn insert(&mut self, index: u32) -> bool {
        let (word, mask) = Self::split(index);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let was_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        !was_set
    }

    /// Clear a bit. Returns true if it was set.
    #[inline]
    pub fn remove(&mut self, index: u32) -> bool {
        let (word, mask) = Self::split(index);
        match self.words.get_mut(word) {
            Some(w) if *w & mask != 0 => {
                *w &= !mask;
                true
            }
            _ => false,
        }
    }

    /// Check if a bit is set; out-of-range bits read as false
    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        let (word, mask) = Self::split(index);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Number of set bits
    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Lowest set bit
    #[inline]
    pub fn first(&self) -> Option<u32> {
        self.scan_from(0)
    }

    /// Lowest set bit strictly greater than `index`
    #[inline]
    pub fn next_after(&self, index: u32) -> Option<u32> {
        self.scan_from(index as usize + 1)
    }

    fn scan_from(&self, start: usize) -> Option<u32> {
        let mut word = start / WORD_BITS;
        if word >= self.words.len() {
            return None;
        }
        let mut bits = self.words[word] & (u64::MAX << (start % WORD_BITS));
        loop {
            if bits != 0 {
                return Some((word * WORD_BITS + bits.trailing_zeros() as usize) as u32);
            }
            word += 1;
            if word >= self.words.len() {
                return None;
            }
            bits = self.words[word];
        }
    }

    /// Remove and return the lowest set bit
    #[inline]
    pub fn pop_first(&mut self) -> Option<u32> {
        let first = self.first()?;
        self.remove(first);
        Some(first)
    }

    /// Iterate over set bits in ascending order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            word: 0,
            bits: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Union: self = self ∪ other. Returns true if self grew.
    pub fn union_with(&mut self, other: &BitVector) -> bool {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        let mut changed = false;
        for (dst, &src) in self.words.iter_mut().zip(&other.words) {
            let merged = *dst | src;
            changed |= merged != *dst;
            *dst = merged;
        }
        changed
    }
}

impl PartialEq for BitVector {
    fn eq(&self, other: &Self) -> bool {
        let (short, long) = if self.words.len() <= other.words.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        short.iter().zip(long.iter()).all(|(a, b)| a == b)
            && long[short.len()..].iter().all(|&w| w == 0)
    }
}

impl Eq for BitVector {}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<u32> for BitVector {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut bits = BitVector::new();
        for i in iter {
            bits.insert(i);
        }
        bits
    }
}

/// Ascending iterator over set bits
pub struct Iter<'a> {
    words: &'a [u64],
    word: usize,
    bits: u64,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.bits != 0 {
                let bit = self.bits.trailing_zeros() as usize;
                self.bits &= self.bits - 1;
                return Some((self.word * WORD_BITS + bit) as u32);
            }
            self.word += 1;
            if self.word >= self.words.len() {
                return None;
            }
            self.bits = self.words[self.word];
        }
    }
}

impl<'a> IntoIterator for &'a BitVector {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
