//! Knizk: non-interactive Schnorr proofs of secret knowledge over secp256k1.
//!
//! A secret (typically a password) is normalized with NFKC and stretched with
//! scrypt into a private scalar `x`. The verifier stores only the public point
//! `x·G` and the key-derivation parameters. To authenticate, the verifier
//! issues a challenge with a fresh nonce and the prover answers with a
//! Fiat-Shamir proof `(c, s)` that verifies without the secret ever leaving
//! the prover.
//!
//! The free functions below cover the common flow with default issuance
//! settings and the operating system's generator. Use [`Knizk`] to configure
//! scrypt cost or salt and nonce sizes, or to inject a seeded generator.
//!
//! ```no_run
//! let credential = knizk::credential_from_secret("secrets are good")?;
//! let challenge = knizk::default_challenge_from_credential(&credential)?;
//! let proof = knizk::proof_from_secret_and_challenge("secrets are good", &challenge)?;
//! let verified = knizk::verifiable_from_proof_and_challenge(&proof, &challenge)?;
//! assert!(knizk::is_verified(&verified));
//! # Ok::<(), knizk::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Base64 and secret normalization helpers.
pub mod codec;
/// Issuance configuration.
pub mod config;
/// Error types.
pub mod error;
/// Core cryptographic primitives.
pub mod primitives;
/// The Knizk protocol.
pub mod protocol;

pub use config::KnizkConfig;
pub use error::Error;
pub use primitives::{Element, Group, Scalar, ScryptParams, Secp256k1, SecureRng, Transcript};
pub use protocol::{
    Challenge, Credential, CurveId, HashAlgorithm, HashFn, KeyFn, Knizk, NormalizationForm,
    Nonce, Proof, Protocol, ProtocolDescriptor, Prover, PublicPoint, VerifiedCredential, Verifier,
};

/// Result type for Knizk operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Issues a credential, builds a challenge for it, proves and verifies.
pub fn verifiable_from_secret(secret: impl AsRef<[u8]>) -> Result<VerifiedCredential> {
    Knizk::default().verifiable_from_secret(secret)
}

/// Issues a credential for `secret` with default scrypt cost and a fresh salt.
pub fn credential_from_secret(secret: impl AsRef<[u8]>) -> Result<Credential> {
    Knizk::default().credential_from_secret(secret)
}

/// Extracts the storable credential from a verified credential.
pub fn credential_from_verifiable(verified: &VerifiedCredential) -> Credential {
    verified.credential()
}

/// Issues a challenge for `credential` with a fresh nonce and the default descriptor.
pub fn default_challenge_from_credential(credential: &Credential) -> Result<Challenge> {
    Knizk::default().challenge_from_credential(credential)
}

/// Proves knowledge of `secret` against `challenge`.
pub fn proof_from_secret_and_challenge(
    secret: impl AsRef<[u8]>,
    challenge: &Challenge,
) -> Result<Proof> {
    Knizk::default().proof_from_secret_and_challenge(secret, challenge)
}

/// Verifies `proof` against `challenge`.
///
/// A wrong secret surfaces as [`Error::VerificationFailed`].
pub fn verifiable_from_proof_and_challenge(
    proof: &Proof,
    challenge: &Challenge,
) -> Result<VerifiedCredential> {
    Knizk::default().verifiable_from_proof_and_challenge(proof, challenge)
}

/// Re-runs verification on a verified credential.
pub fn is_verified(verified: &VerifiedCredential) -> bool {
    Knizk::default().is_verified(verified)
}
