//! Memory-hard derivation of a private scalar from a secret.
//!
//! The secret is normalized, stretched with scrypt, and the output is read as a
//! big-endian integer reduced modulo the group order. The same reduction is used
//! when a credential is created and whenever a proof is generated against it.

use scrypt::{Params, scrypt};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::codec;
use crate::protocol::NormalizationForm;
use crate::{Error, Group, Result};

/// Smallest accepted derived-key length. Shorter outputs bias the reduction mod `n`.
pub const MIN_OUTPUT_LENGTH: usize = 32;

/// Largest accepted derived-key length.
pub const MAX_OUTPUT_LENGTH: usize = 64;

/// Upper bound on `log2(N)`.
pub const MAX_LOG_N: u8 = 20;

/// Upper bound on the scrypt block size `r`.
pub const MAX_BLOCK_SIZE: u32 = 32;

/// Upper bound on the scrypt parallelism `p`.
pub const MAX_PARALLELISM: u32 = 16;

/// Upper bound on the scrypt working set `128·r·N`, 256 MiB.
pub const MAX_MEMORY_BYTES: u64 = 256 * 1024 * 1024;

/// Upper bound on the sequential work factor `N·p`.
pub const MAX_WORK_FACTOR: u64 = 1 << 22;

/// scrypt cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScryptParams {
    /// CPU/memory cost `N`; a power of two.
    pub n: u64,
    /// Block size `r`.
    pub r: u32,
    /// Parallelism `p`.
    pub p: u32,
    /// Derived key length in bytes.
    pub length: usize,
}

impl ScryptParams {
    /// Default cost factor `N = 2^15`.
    pub const DEFAULT_N: u64 = 32_768;
    /// Default block size.
    pub const DEFAULT_R: u32 = 8;
    /// Default parallelism.
    pub const DEFAULT_P: u32 = 1;
    /// Default output length, one secp256k1 scalar.
    pub const DEFAULT_LENGTH: usize = 32;

    /// Creates validated scrypt parameters.
    pub fn new(n: u64, r: u32, p: u32, length: usize) -> Result<Self> {
        let params = Self { n, r, p, length };
        params.validate()?;
        Ok(params)
    }

    /// Checks every parameter against the accepted ranges.
    pub fn validate(&self) -> Result<()> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(Error::MalformedInput(format!(
                "scrypt N must be a power of two of at least 2, got {}",
                self.n
            )));
        }

        if self.log_n() > MAX_LOG_N {
            return Err(Error::MalformedInput(format!(
                "scrypt N must not exceed 2^{MAX_LOG_N}, got {}",
                self.n
            )));
        }

        if self.r == 0 || self.r > MAX_BLOCK_SIZE {
            return Err(Error::MalformedInput(format!(
                "scrypt r must be in [1, {MAX_BLOCK_SIZE}], got {}",
                self.r
            )));
        }

        if self.p == 0 || self.p > MAX_PARALLELISM {
            return Err(Error::MalformedInput(format!(
                "scrypt p must be in [1, {MAX_PARALLELISM}], got {}",
                self.p
            )));
        }

        let memory = 128 * u64::from(self.r) * self.n;
        if memory > MAX_MEMORY_BYTES {
            return Err(Error::MalformedInput(format!(
                "scrypt memory 128*r*N must not exceed {MAX_MEMORY_BYTES} bytes, got {memory}"
            )));
        }

        let work = self.n * u64::from(self.p);
        if work > MAX_WORK_FACTOR {
            return Err(Error::MalformedInput(format!(
                "scrypt work factor N*p must not exceed {MAX_WORK_FACTOR}, got {work}"
            )));
        }

        if !(MIN_OUTPUT_LENGTH..=MAX_OUTPUT_LENGTH).contains(&self.length) {
            return Err(Error::MalformedInput(format!(
                "scrypt length must be in [{MIN_OUTPUT_LENGTH}, {MAX_OUTPUT_LENGTH}], got {}",
                self.length
            )));
        }

        Ok(())
    }

    /// Returns `log2(N)`.
    pub fn log_n(&self) -> u8 {
        self.n.trailing_zeros() as u8
    }
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            n: Self::DEFAULT_N,
            r: Self::DEFAULT_R,
            p: Self::DEFAULT_P,
            length: Self::DEFAULT_LENGTH,
        }
    }
}

/// Derives the private scalar for `secret` under the given salt and parameters.
///
/// # Errors
///
/// - [`Error::MalformedInput`] if the secret is not UTF-8, the salt is empty,
///   or the parameters are out of range
/// - [`Error::DegenerateScalar`] if the derived scalar is zero
pub fn derive_scalar<G: Group>(
    secret: &[u8],
    salt: &[u8],
    form: NormalizationForm,
    params: &ScryptParams,
) -> Result<G::Scalar> {
    params.validate()?;

    if salt.is_empty() {
        return Err(Error::MalformedInput("salt must not be empty".to_string()));
    }

    let normalized = codec::normalize(secret, form)?;

    let scrypt_params = Params::new(params.log_n(), params.r, params.p, params.length)
        .map_err(|e| Error::MalformedInput(format!("scrypt parameters rejected: {e}")))?;

    let mut output = Zeroizing::new(vec![0u8; params.length]);
    scrypt(normalized.as_bytes(), salt, &scrypt_params, &mut output)
        .map_err(|e| Error::MalformedInput(format!("scrypt output length rejected: {e}")))?;

    let scalar = G::scalar_reduce(&output);
    if G::scalar_is_zero(&scalar) {
        return Err(Error::DegenerateScalar(
            "derived key reduces to zero".to_string(),
        ));
    }

    Ok(scalar)
}
