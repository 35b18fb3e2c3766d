//! The Knizk proof-of-knowledge protocol.
//!
//! States flow `Secret → Credential → Challenge → Proof → VerifiedCredential`;
//! each step is a pure transformation over immutable values.

/// Protocol, curve, hash and normalization identifiers.
pub mod descriptor;
/// Typed protocol values (parameters, witness, records).
pub mod gadgets;
/// Public entry points.
pub mod knizk;
/// Proof generation.
pub mod prover;
/// Proof verification.
pub mod verifier;
/// Namespaced record shapes and their conversions.
pub mod wire;

pub use descriptor::{CurveId, HashAlgorithm, HashFn, NormalizationForm, Protocol, ProtocolDescriptor};
pub use gadgets::{
    Challenge, Credential, KeyFn, Nonce, Proof, PublicPoint, VerifiedCredential, Witness,
};
pub use knizk::Knizk;
pub use prover::{CommitmentSecret, Prover};
pub use verifier::Verifier;

use crate::primitives::{Element, Group, Scalar, Secp256k1, Transcript};

/// Computes the Fiat-Shamir challenge `c = H(descriptor ‖ pub ‖ R ‖ nonce) mod n`.
pub(crate) fn fiat_shamir_challenge(
    descriptor: &ProtocolDescriptor,
    public: &Element,
    commitment: &Element,
    nonce: &[u8],
) -> Scalar {
    let mut transcript = Transcript::new();
    transcript.append_descriptor(
        descriptor.protocol.tag(),
        descriptor.curve.tag(),
        descriptor.hashfn.algorithm.tag(),
        descriptor.hashfn.normalization.tag(),
    );
    transcript.append_public_point(&Secp256k1::element_to_bytes(public));
    transcript.append_commitment(&Secp256k1::element_to_bytes(commitment));
    transcript.append_nonce(nonce);
    transcript.challenge_scalar::<Secp256k1>()
}
