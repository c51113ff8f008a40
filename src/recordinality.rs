//! ## Recordinality sketch
//! Estimates cardinality from the number of times the set of `k` hash-maximal
//! elements changes while the stream is consumed.
//!
//! [Original Recordinality paper](https://doi.org/10.1137/1.9781611973037.9)
//!
//! The working set keeps raw elements together with their hashes. Every element
//! entering a full working set evicts the member with the minimum hash and
//! counts as a record. With `R` being the initial `k` plus the number of records,
//! the estimate is `k * (1 + 1/k)^(R - k + 1) - 1`.
//!
//! Until the working set fills up it holds every distinct element observed so
//! far, and its size is reported as an exact estimate.
//!
//! Working set lookups are linear scans over at most `k` members.

use std::fmt::{Debug, Formatter};

use tracing::{debug, trace};

use crate::error::{EstimatorError, Result};
use crate::oracle::{HashOracle, SaltedHasher};
use crate::token::Token;

/// Working set member
#[derive(Clone, Debug, PartialEq)]
struct Record {
    hash: u64,
    element: String,
}

pub struct Recordinality<O: HashOracle = SaltedHasher> {
    /// Target size of the working set
    capacity: usize,
    /// Salt passed to the hash oracle
    seed: u64,
    /// Initial `capacity` plus number of record events
    records: usize,
    /// Working set of hash-maximal elements
    set: Vec<Record>,
    /// Position of the minimum hash within `set`
    min_idx: usize,
    oracle: O,
}

impl Recordinality {
    /// Creates new `Recordinality` with working set of `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_oracle(capacity, 0, SaltedHasher::new())
    }

    /// Creates new `Recordinality` whose hashes are salted with `seed`.
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self> {
        Self::with_oracle(capacity, seed, SaltedHasher::new())
    }
}

impl<O: HashOracle> Recordinality<O> {
    /// Creates new `Recordinality` using provided hash oracle.
    pub fn with_oracle(capacity: usize, seed: u64, oracle: O) -> Result<Self> {
        if capacity == 0 {
            return Err(EstimatorError::InvalidCapacity { capacity });
        }
        debug!(capacity, seed, "created Recordinality sketch");
        Ok(Self {
            capacity,
            seed,
            records: capacity,
            set: Vec::new(),
            min_idx: 0,
            oracle,
        })
    }

    /// Insert a token into `Recordinality`
    pub fn insert<'a>(&mut self, token: impl Into<Token<'a>>) -> Result<()> {
        self.observe_token(&token.into())
    }

    /// Process a single stream element.
    pub fn observe_token(&mut self, token: &Token) -> Result<()> {
        let element = token.normalize();
        let hash = self.oracle.hash(element.as_bytes(), self.seed)?;

        if self.set.len() < self.capacity {
            if !self.contains_hashed(hash, &element) {
                if self.set.is_empty() || hash < self.set[self.min_idx].hash {
                    self.min_idx = self.set.len();
                }
                self.set.push(Record {
                    hash,
                    element: element.into_owned(),
                });
            }
            return Ok(());
        }

        if hash > self.set[self.min_idx].hash && !self.contains_hashed(hash, &element) {
            self.set[self.min_idx] = Record {
                hash,
                element: element.into_owned(),
            };
            self.records += 1;
            self.min_idx = self.find_min();
            trace!(records = self.records, "record event");
        }

        Ok(())
    }

    /// Consume the whole stream in a single pass.
    pub fn observe<'a, I, T>(&mut self, stream: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Token<'a>>,
    {
        for token in stream {
            self.insert(token)?;
        }
        Ok(())
    }

    /// Return cardinality estimate
    pub fn estimate(&self) -> f64 {
        if self.set.len() < self.capacity {
            return self.set.len() as f64;
        }
        let k = self.capacity as f64;
        let exponent = (self.records - self.capacity + 1) as f64;
        k * (1.0 + 1.0 / k).powf(exponent) - 1.0
    }

    /// Return whether `element` is currently in the working set.
    pub fn contains<'a>(&self, element: impl Into<Token<'a>>) -> bool {
        let element = element.into().normalize();
        self.set.iter().any(|r| r.element == element)
    }

    #[inline]
    fn contains_hashed(&self, hash: u64, element: &str) -> bool {
        self.set
            .iter()
            .any(|r| r.hash == hash && r.element == element)
    }

    #[inline]
    fn find_min(&self) -> usize {
        self.set
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.hash)
            .map_or(0, |(idx, _)| idx)
    }

    /// Empty the working set and restart the record count.
    pub fn reset(&mut self) {
        self.set.clear();
        self.min_idx = 0;
        self.records = self.capacity;
        debug!(capacity = self.capacity, "reset Recordinality sketch");
    }

    /// Number of record events plus the initial working set capacity (`R`).
    #[inline]
    pub fn records(&self) -> usize {
        self.records
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of elements in the working set
    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Elements of the working set in no particular order
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.set.iter().map(|r| r.element.as_str())
    }

    /// Theoretical relative standard error `1 / sqrt(k)`.
    pub fn standard_error(&self) -> f64 {
        standard_error(self.capacity)
    }
}

impl<O: HashOracle + Clone> Clone for Recordinality<O> {
    fn clone(&self) -> Self {
        Self {
            capacity: self.capacity,
            seed: self.seed,
            records: self.records,
            set: self.set.clone(),
            min_idx: self.min_idx,
            oracle: self.oracle.clone(),
        }
    }
}

impl<O: HashOracle> PartialEq for Recordinality<O> {
    /// Compare sketches by their working sets and record counts
    fn eq(&self, rhs: &Self) -> bool {
        self.capacity == rhs.capacity && self.records == rhs.records && self.set == rhs.set
    }
}

impl<O: HashOracle> Debug for Recordinality<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ capacity: {}, len: {}, records: {}, estimate: {:.2} }}",
            self.capacity,
            self.len(),
            self.records,
            self.estimate()
        )
    }
}

/// Theoretical relative standard error for given working set capacity.
#[inline]
pub fn standard_error(capacity: usize) -> f64 {
    1.0 / (capacity as f64).sqrt()
}
