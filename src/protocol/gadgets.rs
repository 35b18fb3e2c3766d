//! Protocol gadgets for Knizk proofs.
//!
//! This module contains the typed values that flow through the protocol:
//! key-derivation parameters, the secret witness, public points, challenge
//! nonces, and the Credential / Challenge / Proof / VerifiedCredential records.
//! Every constructor validates its input, so a value of one of these types is
//! always usable for arithmetic.

use core::fmt;

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{CurveId, NormalizationForm, ProtocolDescriptor};
use crate::primitives::{Element, Group, Scalar, ScryptParams, Secp256k1, derive_scalar, random_bytes};
use crate::{Error, Result};

/// Smallest accepted salt, in bytes.
pub const MIN_SALT_BYTES: usize = 16;

/// Largest accepted salt, in bytes.
pub const MAX_SALT_BYTES: usize = 64;

/// Smallest accepted challenge nonce, in bytes.
pub const MIN_NONCE_BYTES: usize = 16;

/// Largest accepted challenge nonce, in bytes.
pub const MAX_NONCE_BYTES: usize = 64;

/// Key-derivation function parameters: scrypt over the normalized secret.
///
/// The salt is public and generated once per credential. Challenges copy these
/// parameters verbatim so the prover can re-derive the same scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFn {
    salt: Vec<u8>,
    normalization: NormalizationForm,
    scrypt: ScryptParams,
}

impl KeyFn {
    /// Creates key-derivation parameters from an existing salt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the salt length or scrypt parameters
    /// are out of range.
    pub fn new(salt: Vec<u8>, normalization: NormalizationForm, scrypt: ScryptParams) -> Result<Self> {
        if !(MIN_SALT_BYTES..=MAX_SALT_BYTES).contains(&salt.len()) {
            return Err(Error::MalformedInput(format!(
                "salt must be {MIN_SALT_BYTES} to {MAX_SALT_BYTES} bytes, got {}",
                salt.len()
            )));
        }
        scrypt.validate()?;

        Ok(Self {
            salt,
            normalization,
            scrypt,
        })
    }

    /// Creates parameters with a fresh random salt of `salt_length` bytes.
    pub fn generate<R: CryptoRngCore>(
        rng: &mut R,
        salt_length: usize,
        scrypt: ScryptParams,
    ) -> Result<Self> {
        Self::new(random_bytes(rng, salt_length), NormalizationForm::Nfkc, scrypt)
    }

    /// Returns the public salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the normalization form applied to secrets.
    pub fn normalization(&self) -> NormalizationForm {
        self.normalization
    }

    /// Returns the scrypt cost parameters.
    pub fn scrypt(&self) -> &ScryptParams {
        &self.scrypt
    }

    /// Derives the secret witness for `secret` under these parameters.
    pub fn derive_witness(&self, secret: &[u8]) -> Result<Witness> {
        derive_scalar::<Secp256k1>(secret, &self.salt, self.normalization, &self.scrypt)
            .and_then(Witness::new)
    }
}

/// Secret witness for the Knizk proof.
///
/// Contains the discrete logarithm `x` of the public point. It only ever exists
/// for the duration of a single credential or proof computation.
///
/// # Security
///
/// - The witness is automatically zeroized when dropped
/// - Never transmit or persist witness values
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Witness {
    x: Scalar,
}

impl Witness {
    /// Creates a new witness from a non-zero scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateScalar`] if `x` is zero.
    pub fn new(x: Scalar) -> Result<Self> {
        if Secp256k1::scalar_is_zero(&x) {
            return Err(Error::DegenerateScalar("witness scalar is zero".to_string()));
        }
        Ok(Self { x })
    }

    /// Returns a reference to the secret scalar.
    pub(crate) fn secret(&self) -> &Scalar {
        &self.x
    }
}

/// A public curve point tagged with its curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicPoint {
    curve: CurveId,
    point: Element,
}

impl PublicPoint {
    /// Wraps a point, rejecting the point at infinity.
    pub fn new(curve: CurveId, point: Element) -> Result<Self> {
        if Secp256k1::is_identity(&point) {
            return Err(Error::InvalidCurvePoint(
                "public point cannot be the point at infinity".to_string(),
            ));
        }
        Ok(Self { curve, point })
    }

    /// Decodes a compressed point on `curve`.
    pub fn from_bytes(curve: CurveId, bytes: &[u8]) -> Result<Self> {
        let point = match curve {
            CurveId::Secp256k1 => Secp256k1::element_from_bytes(bytes)?,
        };
        Ok(Self { curve, point })
    }

    /// Computes `x·G` for the witness.
    pub fn from_witness(witness: &Witness) -> Result<Self> {
        Self::new(
            CurveId::Secp256k1,
            Secp256k1::scalar_mul(&Secp256k1::generator(), witness.secret()),
        )
    }

    /// Returns the curve identifier.
    pub fn curve(&self) -> CurveId {
        self.curve
    }

    /// Returns the point.
    pub fn point(&self) -> &Element {
        &self.point
    }

    /// Returns the canonical compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        Secp256k1::element_to_bytes(&self.point)
    }
}

/// Single-use random value binding a challenge to one verification attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(Vec<u8>);

impl Nonce {
    /// Wraps nonce bytes after a length check.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if !(MIN_NONCE_BYTES..=MAX_NONCE_BYTES).contains(&bytes.len()) {
            return Err(Error::MalformedInput(format!(
                "nonce must be {MIN_NONCE_BYTES} to {MAX_NONCE_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Draws a fresh nonce of `len` bytes.
    pub fn generate<R: CryptoRngCore>(rng: &mut R, len: usize) -> Result<Self> {
        Self::new(random_bytes(rng, len))
    }

    /// Returns the nonce bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(&self.0))
    }
}

/// What the verifier stores: key-derivation parameters and the public point.
///
/// Invariant: `public = KDF(secret, keyfn)·G`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    keyfn: KeyFn,
    public: PublicPoint,
}

impl Credential {
    /// Assembles a credential from its parts.
    pub fn new(keyfn: KeyFn, public: PublicPoint) -> Self {
        Self { keyfn, public }
    }

    /// Returns the key-derivation parameters.
    pub fn keyfn(&self) -> &KeyFn {
        &self.keyfn
    }

    /// Returns the public point.
    pub fn public_point(&self) -> &PublicPoint {
        &self.public
    }
}

/// A per-attempt challenge: the credential's parameters plus a fresh nonce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    descriptor: ProtocolDescriptor,
    keyfn: KeyFn,
    nonce: Nonce,
    public: PublicPoint,
}

impl Challenge {
    /// Assembles a challenge, checking that its parts agree with each other.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedProtocol`] if the descriptor cannot be run
    /// - [`Error::InvalidCurvePoint`] if the public point is the identity
    /// - [`Error::DescriptorMismatch`] if the public point's curve differs from
    ///   the descriptor's curve
    pub fn new(
        descriptor: ProtocolDescriptor,
        keyfn: KeyFn,
        nonce: Nonce,
        public: PublicPoint,
    ) -> Result<Self> {
        descriptor.validate()?;

        if Secp256k1::is_identity(public.point()) {
            return Err(Error::InvalidCurvePoint(
                "challenge public point cannot be the point at infinity".to_string(),
            ));
        }

        if public.curve() != descriptor.curve {
            return Err(Error::DescriptorMismatch {
                field: "public point curve",
                expected: descriptor.curve.to_string(),
                found: public.curve().to_string(),
            });
        }

        Ok(Self {
            descriptor,
            keyfn,
            nonce,
            public,
        })
    }

    /// Returns the protocol descriptor.
    pub fn descriptor(&self) -> &ProtocolDescriptor {
        &self.descriptor
    }

    /// Returns the key-derivation parameters copied from the credential.
    pub fn keyfn(&self) -> &KeyFn {
        &self.keyfn
    }

    /// Returns the nonce.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Returns the public point copied from the credential.
    pub fn public_point(&self) -> &PublicPoint {
        &self.public
    }

    /// Returns the credential this challenge was derived from.
    pub fn credential(&self) -> Credential {
        Credential::new(self.keyfn.clone(), self.public)
    }
}

/// Non-interactive proof: the Fiat-Shamir challenge `c` and response `s`.
///
/// # Security
///
/// - Proofs are bound to one challenge through its nonce and public point
/// - Proofs reveal nothing about the secret and can be transmitted freely
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    descriptor: ProtocolDescriptor,
    c: Scalar,
    s: Scalar,
}

impl Proof {
    /// Creates a proof, rejecting zero scalars.
    pub fn new(descriptor: ProtocolDescriptor, c: Scalar, s: Scalar) -> Result<Self> {
        if Secp256k1::scalar_is_zero(&c) {
            return Err(Error::DegenerateScalar("challenge scalar c is zero".to_string()));
        }
        if Secp256k1::scalar_is_zero(&s) {
            return Err(Error::DegenerateScalar("response scalar s is zero".to_string()));
        }
        Ok(Self { descriptor, c, s })
    }

    /// Returns the protocol descriptor the proof was generated under.
    pub fn descriptor(&self) -> &ProtocolDescriptor {
        &self.descriptor
    }

    /// Returns the challenge scalar `c`.
    pub fn c(&self) -> &Scalar {
        &self.c
    }

    /// Returns the response scalar `s`.
    pub fn s(&self) -> &Scalar {
        &self.s
    }
}

/// A challenge together with the proof scalars that verified against it.
///
/// The public point is the challenge's own; callers decide whether the secret
/// was correct by comparing it with their stored credential's point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedCredential {
    challenge: Challenge,
    c: Scalar,
    s: Scalar,
}

impl VerifiedCredential {
    pub(crate) fn new(challenge: Challenge, proof: Proof) -> Self {
        let Proof { c, s, .. } = proof;
        Self { challenge, c, s }
    }

    /// Reassembles a verified credential from untrusted parts.
    ///
    /// No verification happens here; use [`crate::is_verified`] to check it.
    pub fn from_parts(challenge: Challenge, c: Scalar, s: Scalar) -> Result<Self> {
        let proof = Proof::new(challenge.descriptor, c, s)?;
        Ok(Self::new(challenge, proof))
    }

    /// Returns the underlying challenge.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Returns the embedded proof.
    pub fn proof(&self) -> Proof {
        Proof {
            descriptor: self.challenge.descriptor,
            c: self.c.clone(),
            s: self.s.clone(),
        }
    }

    /// Returns the protocol descriptor.
    pub fn descriptor(&self) -> &ProtocolDescriptor {
        self.challenge.descriptor()
    }

    /// Returns the key-derivation parameters.
    pub fn keyfn(&self) -> &KeyFn {
        self.challenge.keyfn()
    }

    /// Returns the nonce.
    pub fn nonce(&self) -> &Nonce {
        self.challenge.nonce()
    }

    /// Returns the public point.
    pub fn public_point(&self) -> &PublicPoint {
        self.challenge.public_point()
    }

    /// Returns the challenge scalar `c`.
    pub fn c(&self) -> &Scalar {
        &self.c
    }

    /// Returns the response scalar `s`.
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Extracts the credential (parameters and public point).
    pub fn credential(&self) -> Credential {
        self.challenge.credential()
    }
}
