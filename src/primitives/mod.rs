//! Core cryptographic primitives for the Knizk protocol.
//!
//! This module contains the mathematical and cryptographic building blocks:
//! - **crypto**: group trait and secure randomness
//! - **groups**: the secp256k1 group implementation
//! - **kdf**: scrypt-based derivation of private scalars from secrets
//! - **transcript**: Fiat-Shamir transform for non-interactive proofs

/// Cryptographic primitives and traits.
pub mod crypto;
/// Group implementations.
pub mod groups;
/// Key derivation from secrets.
pub mod kdf;
/// Transcript for Fiat-Shamir transform.
pub mod transcript;

pub use crypto::{Group, SecureRng, random_bytes};
pub use groups::Secp256k1;
pub use groups::secp256k1::{Element, Scalar};
pub use kdf::{ScryptParams, derive_scalar};
pub use transcript::Transcript;
