/// A set of bond indices packed into 64-bit words.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BondSet(Vec<u64>);

impl BondSet {
    pub fn empty(bits: usize) -> Self {
        Self(vec![0; bits.div_ceil(64)])
    }

    pub fn single(bits: usize, index: usize) -> Self {
        let mut set = Self::empty(bits);
        set.insert(index);
        set
    }

    pub fn insert(&mut self, index: usize) {
        self.0[index / 64] |= 1u64 << (index % 64);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0
            .get(index / 64)
            .is_some_and(|word| word & (1u64 << (index % 64)) != 0)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a | b).collect())
    }

    pub fn xor_assign(&mut self, other: &Self) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a ^= *b;
        }
    }

    pub fn count(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & b == *b)
    }

    /// Lowest set index.
    pub fn leading_bit(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .find(|&(_, &w)| w != 0)
            .map(|(i, &w)| i * 64 + w.trailing_zeros() as usize)
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(i, &word)| {
            (0..64).filter(move |bit| word & (1u64 << bit) != 0).map(move |bit| i * 64 + bit)
        })
    }
}

/// Incrementally reduced basis of the cycle space over GF(2).
///
/// Every stored row has been reduced against all earlier rows, so the leading bit
/// of each row is clear in every later one.
#[derive(Debug, Clone, Default)]
pub struct CycleBasis {
    rows: Vec<BondSet>,
}

impl CycleBasis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if `candidate` is a XOR combination of the rows already stored.
    pub fn spans(&self, candidate: &BondSet) -> bool {
        self.reduce(candidate.clone()).is_empty()
    }

    /// Adds `candidate` if it is linearly independent of the basis.
    pub fn try_insert(&mut self, candidate: &BondSet) -> bool {
        let reduced = self.reduce(candidate.clone());
        if reduced.is_empty() {
            return false;
        }
        self.rows.push(reduced);
        true
    }

    fn reduce(&self, mut v: BondSet) -> BondSet {
        for row in &self.rows {
            if let Some(pivot) = row.leading_bit() {
                if v.contains(pivot) {
                    v.xor_assign(row);
                }
            }
        }
        v
    }
}
