//! Lexicographic enumeration of k-subsets of `0..n`.
//!
//! Subsets are index vectors in increasing order. `from_rank` starts the
//! sequence at an arbitrary lexicographic rank so that disjoint contiguous
//! slices of the index space can be scanned independently.

/// Binomial coefficient C(n, k), or None if it does not fit in a u64.
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // Exact at every step: acc * (n - i) is divisible by (i + 1)
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return None;
        }
    }
    Some(acc as u64)
}

#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    rank: u64,
    total: u64,
    started: bool,
}

impl Combinations {
    /// All C(n, k) subsets starting from `[0, 1, .., k-1]`.
    /// Returns None if the count overflows a u64.
    pub fn new(n: usize, k: usize) -> Option<Self> {
        Self::from_rank(n, k, 0)
    }

    /// Subsets starting at lexicographic `rank`. A rank at or past the end
    /// yields an exhausted sequence.
    pub fn from_rank(n: usize, k: usize, rank: u64) -> Option<Self> {
        let total = binomial(n, k)?;
        let indices = if rank < total {
            unrank(n, k, rank)
        } else {
            Vec::new()
        };
        Some(Self {
            n,
            indices,
            rank,
            total,
            started: false,
        })
    }

    /// Lexicographic rank of the subset returned by the last `advance`.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// Step to the next subset and borrow it along with its rank. Avoids
    /// allocating per candidate.
    pub fn advance(&mut self) -> Option<(u64, &[usize])> {
        if self.started {
            self.rank += 1;
            if self.rank >= self.total || !self.step() {
                self.rank = self.total;
                return None;
            }
        } else {
            self.started = true;
            if self.rank >= self.total {
                return None;
            }
        }
        Some((self.rank, &self.indices))
    }

    fn step(&mut self) -> bool {
        let k = self.indices.len();
        let n = self.n;
        // Rightmost index that can still move right
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < n - k + i) else {
            return false;
        };
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|(_, s)| s.to_vec())
    }
}

/// Subset at lexicographic position `rank` (must be < C(n, k)).
fn unrank(n: usize, k: usize, mut rank: u64) -> Vec<usize> {
    let mut out = Vec::with_capacity(k);
    let mut x = 0;
    for i in 0..k {
        loop {
            // Subsets whose i-th element is x
            let block = binomial(n - 1 - x, k - 1 - i).unwrap_or(u64::MAX);
            if rank < block {
                break;
            }
            rank -= block;
            x += 1;
        }
        out.push(x);
        x += 1;
    }
    out
}
