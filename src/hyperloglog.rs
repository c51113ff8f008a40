//! ## HyperLogLog sketch
//! Estimates cardinality with `M = 2^P` registers, each storing the maximum rank
//! observed among hashes routed to it.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! Hash layout (64 bits):
//! - 0..P bits     - register index
//! - P..64 bits    - remainder used for rank: number of trailing zero bits plus one
//!
//! Number of zero registers and registers' harmonic sum are updated on every
//! register increase, so `estimate` is a constant time operation. The harmonic
//! sum is kept in `2^-64` fixed point units, so every `2^-rank` term is exact.
//!
//! Expected error is `1.04 / sqrt(M)`:
//! - P = 8:  6.50%
//! - P = 12: 1.62%
//! - P = 16: 0.41%

use std::fmt::{Debug, Formatter};
use std::mem::{size_of, size_of_val};

use tracing::{debug, trace};

use crate::error::{EstimatorError, Result};
use crate::oracle::{HashOracle, SaltedHasher, HASH_RANGE};
use crate::token::Token;

/// Smallest supported precision, `alpha` is undefined for fewer than 16 registers.
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision.
pub const MAX_PRECISION: u8 = 18;
/// Fixed point scale of the harmonic sum (`2^64`).
const SUM_SCALE: f64 = 18_446_744_073_709_551_616.0;

pub struct HyperLogLog<O: HashOracle = SaltedHasher> {
    /// Number of bits used for register index
    precision: u8,
    /// Register ranks
    registers: Box<[u8]>,
    /// Number of registers set to 0
    zeros: usize,
    /// Harmonic sum of registers: sum of `2^(64 - rank)`
    sum: u128,
    /// Bias correction constant derived from number of registers
    alpha: f64,
    /// Salt used by `insert`
    trial: u64,
    oracle: O,
}

impl HyperLogLog {
    /// Creates new `HyperLogLog` with `2^precision` registers using default hash oracle.
    pub fn new(precision: u8) -> Result<Self> {
        Self::with_oracle(precision, SaltedHasher::new())
    }
}

impl<O: HashOracle> HyperLogLog<O> {
    /// Creates new `HyperLogLog` with `2^precision` registers using provided hash oracle.
    pub fn with_oracle(precision: u8, oracle: O) -> Result<Self> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(EstimatorError::InvalidPrecision { precision });
        }
        let m = 1usize << precision;
        debug!(precision, registers = m, "created HyperLogLog sketch");
        Ok(Self {
            precision,
            // Use `resize` instead of `vec![]` to avoid page faults caused by delayed allocation.
            registers: {
                let mut data = Vec::with_capacity(m);
                data.resize(m, 0);
                data.into_boxed_slice()
            },
            zeros: m,
            sum: (m as u128) << 64,
            alpha: alpha_for(m),
            trial: 0,
            oracle,
        })
    }

    /// Set salt used by subsequent `insert` calls.
    pub fn with_trial(mut self, trial: u64) -> Self {
        self.trial = trial;
        self
    }

    /// Add token hashed under given `salt`.
    #[inline]
    pub fn add<'a>(&mut self, token: impl Into<Token<'a>>, salt: u64) -> Result<()> {
        self.add_token(&token.into(), salt)
    }

    #[inline]
    pub fn add_token(&mut self, token: &Token, salt: u64) -> Result<()> {
        let hash = self.oracle.hash(token.normalize().as_bytes(), salt)?;
        self.add_hash(hash);
        Ok(())
    }

    /// Add token hashed under the sketch's trial salt.
    #[inline]
    pub fn insert<'a>(&mut self, token: impl Into<Token<'a>>) -> Result<()> {
        self.add(token, self.trial)
    }

    /// Add already hashed value.
    #[inline]
    pub fn add_hash(&mut self, hash: u64) {
        let idx = (hash & (self.num_registers() as u64 - 1)) as usize;
        let rank = self.rank(hash);
        self.update_rank(idx, rank);
    }

    /// Number of trailing zero bits of the hash remainder plus one.
    #[inline]
    fn rank(&self, hash: u64) -> u8 {
        let max_rank = 64 - u32::from(self.precision) + 1;
        let rank = (hash >> self.precision).trailing_zeros() + 1;
        // `max_rank` is at most 61, so it always fits into `u8`
        rank.min(max_rank) as u8
    }

    /// Raise register `idx` to `new_rank` if it is larger than the stored rank.
    #[inline]
    fn update_rank(&mut self, idx: usize, new_rank: u8) {
        let old_rank = self.registers[idx];
        if new_rank <= old_rank {
            return;
        }
        self.registers[idx] = new_rank;
        if old_rank == 0 {
            self.zeros -= 1;
        }
        self.sum -= 1 << (64 - u32::from(old_rank));
        self.sum += 1 << (64 - u32::from(new_rank));
    }

    /// Return harmonic sum of registers `Z = sum(2^-rank)`.
    #[inline]
    pub fn harmonic_sum(&self) -> f64 {
        self.sum as f64 / SUM_SCALE
    }

    /// Return raw (uncorrected) estimate `alpha * M^2 / Z`.
    #[inline]
    pub fn raw_estimate(&self) -> f64 {
        let m = self.num_registers() as f64;
        self.alpha * m * m / self.harmonic_sum()
    }

    /// Return cardinality estimate, saturating at `u64::MAX`.
    pub fn estimate(&self) -> u64 {
        let m = self.num_registers() as f64;
        let estimate = self.raw_estimate();

        // Small range correction (linear counting)
        if estimate < 2.5 * m && self.zeros > 0 {
            let corrected = m * (m / self.zeros as f64).ln();
            trace!(estimate, corrected, zeros = self.zeros, "small range correction");
            return corrected as u64;
        }

        // Large range correction (hash space saturation)
        if estimate > HASH_RANGE / 30.0 {
            let ratio = estimate / HASH_RANGE;
            let corrected = if ratio < 1.0 {
                -HASH_RANGE * (1.0 - ratio).ln()
            } else {
                HASH_RANGE
            };
            trace!(estimate, corrected, "large range correction");
            return corrected as u64;
        }

        estimate as u64
    }

    /// Zero all registers, keeping precision, trial and oracle.
    pub fn reset(&mut self) {
        self.registers.fill(0);
        self.zeros = self.num_registers();
        self.sum = (self.num_registers() as u128) << 64;
        debug!(precision = self.precision, "reset HyperLogLog sketch");
    }

    /// Number of bits used for register index
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers `M = 2^P`
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    #[inline]
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Number of registers which were never updated
    #[inline]
    pub fn zero_registers(&self) -> usize {
        self.zeros
    }

    /// Salt used by `insert`
    #[inline]
    pub fn trial(&self) -> u64 {
        self.trial
    }

    /// Theoretical relative standard error `1.04 / sqrt(M)`.
    pub fn standard_error(&self) -> f64 {
        standard_error(self.precision)
    }

    /// Return memory size of `HyperLogLog`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(&*self.registers)
    }
}

impl<O: HashOracle + Clone> Clone for HyperLogLog<O> {
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            registers: self.registers.clone(),
            zeros: self.zeros,
            sum: self.sum,
            alpha: self.alpha,
            trial: self.trial,
            oracle: self.oracle.clone(),
        }
    }
}

impl<O: HashOracle> PartialEq for HyperLogLog<O> {
    /// Compare sketches by their register state
    fn eq(&self, rhs: &Self) -> bool {
        self.precision == rhs.precision && self.registers == rhs.registers
    }
}

impl<O: HashOracle> Debug for HyperLogLog<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, zeros: {}, estimate: {}, size: {} }}",
            self.precision,
            self.zeros,
            self.estimate(),
            self.size_of()
        )
    }
}

/// Parameter for bias correction
#[inline]
pub fn alpha_for(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Theoretical relative standard error for given precision.
#[inline]
pub fn standard_error(precision: u8) -> f64 {
    1.04 / ((1u64 << precision) as f64).sqrt()
}

/// Smallest precision whose standard error does not exceed `error_rate`,
/// clamped into supported range.
pub fn precision_for_error(error_rate: f64) -> Result<u8> {
    if !error_rate.is_finite() || error_rate <= 0.0 {
        return Err(EstimatorError::InvalidErrorRate { error_rate });
    }
    let m = (1.04 / error_rate).powi(2);
    let precision = m.log2().ceil().max(0.0);
    Ok((precision as u8).clamp(MIN_PRECISION, MAX_PRECISION))
}
