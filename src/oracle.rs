//! Hash oracle shared by both sketches.
//!
//! An oracle maps `(bytes, salt)` to a uniformly distributed `u64`. The salt lets
//! one logical stream be re-hashed under independent trials without needing a
//! separate hash family per trial.
//!
//! All correction constants in this crate assume the full 64-bit output range,
//! see [`HASH_RANGE`].

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hasher};

use wyhash::WyHash;

use crate::error::Result;

/// Size of the hash space produced by every oracle (`2^64`).
pub const HASH_RANGE: f64 = 18_446_744_073_709_551_616.0;

/// Deterministic hash function used by the sketches.
pub trait HashOracle {
    /// Hash `bytes` under given `salt`.
    fn hash(&self, bytes: &[u8], salt: u64) -> Result<u64>;
}

impl<F> HashOracle for F
where
    F: Fn(&[u8], u64) -> Result<u64>,
{
    #[inline]
    fn hash(&self, bytes: &[u8], salt: u64) -> Result<u64> {
        self(bytes, salt)
    }
}

/// Default oracle which feeds the salt followed by the bytes into a fresh `H`.
pub struct SaltedHasher<H: Hasher + Default = WyHash> {
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl<H: Hasher + Default> SaltedHasher<H> {
    pub fn new() -> Self {
        Self {
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> HashOracle for SaltedHasher<H> {
    #[inline]
    fn hash(&self, bytes: &[u8], salt: u64) -> Result<u64> {
        let mut hasher = self.build_hasher.build_hasher();
        hasher.write_u64(salt);
        hasher.write(bytes);
        Ok(hasher.finish())
    }
}

impl<H: Hasher + Default> Default for SaltedHasher<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hasher + Default> Clone for SaltedHasher<H> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<H: Hasher + Default> Debug for SaltedHasher<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SaltedHasher")
    }
}
