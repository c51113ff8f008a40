//! `cardinality-sketches` estimates the number of distinct elements in a stream
//! using memory far smaller than the number of distinct elements itself.
//!
//! Two independent sketches are provided:
//! - [`HyperLogLog`]: `2^b` registers tracking maximum hash ranks, with small and
//!   large range corrections of the raw harmonic mean estimate.
//! - [`Recordinality`]: `k` hash-maximal elements and the number of record events
//!   that changed them.
//!
//! Both sketches hash stream elements through an injectable [`HashOracle`] under a
//! per-trial salt, so one stream can be re-hashed for independent trials.
//!
//! # Usage
//!
//! ```
//! use cardinality_sketches::{HyperLogLog, Recordinality};
//!
//! let stream = ["a", "b", "a", "c", "b", "d"];
//!
//! let mut hll = HyperLogLog::new(8).unwrap();
//! let mut rec = Recordinality::with_seed(2, 1).unwrap();
//! for word in stream {
//!     hll.insert(word).unwrap();
//! }
//! rec.observe(stream).unwrap();
//!
//! assert!(hll.estimate() <= 4);
//! assert!(rec.estimate() >= 2.0);
//! ```
pub mod error;
pub mod estimator;
pub mod hyperloglog;
pub mod oracle;
pub mod recordinality;
pub mod token;

pub use error::{EstimatorError, Result};
pub use estimator::{Estimator, EstimatorConfig, EstimatorTrait};
pub use hyperloglog::HyperLogLog;
pub use oracle::{HashOracle, SaltedHasher};
pub use recordinality::Recordinality;
pub use token::Token;
