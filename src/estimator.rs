//! Unified access to both sketches.
//!
//! `EstimatorConfig` describes a sketch and its trial salt at runtime, `build`
//! validates it and returns an `Estimator` which dispatches to the concrete sketch.

use enum_dispatch::enum_dispatch;

use crate::error::Result;
use crate::hyperloglog::HyperLogLog;
use crate::oracle::HashOracle;
use crate::recordinality::Recordinality;
use crate::token::Token;

/// Sketch types supported by `Estimator`
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch]
pub enum Estimator {
    Hll(HyperLogLog),
    Rec(Recordinality),
}

/// Operations shared by all sketches.
#[enum_dispatch(Estimator)]
pub trait EstimatorTrait {
    /// Feed a single stream element.
    fn insert_token(&mut self, token: &Token) -> Result<()>;
    /// Return cardinality estimate for elements observed so far.
    fn cardinality(&self) -> f64;
    /// Theoretical relative standard error.
    fn standard_error(&self) -> f64;
    /// Forget all observed elements.
    fn reset(&mut self);
    fn name(&self) -> &'static str;
}

impl Estimator {
    /// Consume the whole stream in a single pass.
    pub fn observe<'a, I, T>(&mut self, stream: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Token<'a>>,
    {
        for token in stream {
            self.insert_token(&token.into())?;
        }
        Ok(())
    }
}

impl<O: HashOracle> EstimatorTrait for HyperLogLog<O> {
    #[inline]
    fn insert_token(&mut self, token: &Token) -> Result<()> {
        self.add_token(token, self.trial())
    }

    #[inline]
    fn cardinality(&self) -> f64 {
        self.estimate() as f64
    }

    fn standard_error(&self) -> f64 {
        HyperLogLog::standard_error(self)
    }

    fn reset(&mut self) {
        HyperLogLog::reset(self)
    }

    fn name(&self) -> &'static str {
        "hyperloglog"
    }
}

impl<O: HashOracle> EstimatorTrait for Recordinality<O> {
    #[inline]
    fn insert_token(&mut self, token: &Token) -> Result<()> {
        self.observe_token(token)
    }

    #[inline]
    fn cardinality(&self) -> f64 {
        self.estimate()
    }

    fn standard_error(&self) -> f64 {
        Recordinality::standard_error(self)
    }

    fn reset(&mut self) {
        Recordinality::reset(self)
    }

    fn name(&self) -> &'static str {
        "recordinality"
    }
}

/// Runtime description of an `Estimator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorConfig {
    /// HyperLogLog with `2^precision` registers hashing under `trial` salt.
    HyperLogLog { precision: u8, trial: u64 },
    /// Recordinality with working set of `capacity` elements hashing under `seed` salt.
    Recordinality { capacity: usize, seed: u64 },
}

impl EstimatorConfig {
    pub fn hll(precision: u8) -> Self {
        EstimatorConfig::HyperLogLog { precision, trial: 0 }
    }

    pub fn rec(capacity: usize) -> Self {
        EstimatorConfig::Recordinality { capacity, seed: 0 }
    }

    /// Return the same configuration hashing under given salt.
    pub fn with_salt(self, salt: u64) -> Self {
        match self {
            EstimatorConfig::HyperLogLog { precision, .. } => EstimatorConfig::HyperLogLog {
                precision,
                trial: salt,
            },
            EstimatorConfig::Recordinality { capacity, .. } => EstimatorConfig::Recordinality {
                capacity,
                seed: salt,
            },
        }
    }

    /// Validate configuration and create new `Estimator`.
    pub fn build(&self) -> Result<Estimator> {
        Ok(match *self {
            EstimatorConfig::HyperLogLog { precision, trial } => {
                HyperLogLog::new(precision)?.with_trial(trial).into()
            }
            EstimatorConfig::Recordinality { capacity, seed } => {
                Recordinality::with_seed(capacity, seed)?.into()
            }
        })
    }
}
