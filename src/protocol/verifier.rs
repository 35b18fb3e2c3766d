use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{Challenge, Proof, VerifiedCredential, fiat_shamir_challenge};
use crate::primitives::{Element, Group, Secp256k1};
use crate::{Error, Result};

/// Verifier for the Knizk zero-knowledge protocol.
///
/// Validates a proof against the challenge it answers. Only public data is
/// needed; the secret never reaches the verifier.
///
/// # Security
///
/// - Descriptors are compared before any arithmetic
/// - The recomputed commitment must not be the point at infinity
/// - The challenge scalars are compared in constant time
pub struct Verifier<'a> {
    challenge: &'a Challenge,
}

impl<'a> Verifier<'a> {
    /// Creates a verifier for one challenge.
    pub fn new(challenge: &'a Challenge) -> Self {
        Self { challenge }
    }

    /// Verifies a proof and, on success, returns the verified credential.
    ///
    /// # Errors
    ///
    /// - [`Error::DescriptorMismatch`] if the proof was made under another descriptor
    /// - [`Error::UnsupportedProtocol`] if the challenge's descriptor cannot be run
    /// - [`Error::InvalidCurvePoint`] if the challenge's public point is the identity
    /// - [`Error::VerificationFailed`] if the proof does not verify
    pub fn verify(&self, proof: &Proof) -> Result<VerifiedCredential> {
        self.verify_response(proof)?;
        Ok(VerifiedCredential::new(self.challenge.clone(), proof.clone()))
    }

    /// Checks `H(descriptor ‖ pub ‖ s·G − c·pub ‖ nonce) == c`.
    pub fn verify_response(&self, proof: &Proof) -> Result<()> {
        let descriptor = self.challenge.descriptor();
        descriptor.validate()?;
        if let Err(err) = descriptor.ensure_matches(proof.descriptor()) {
            warn!(error = %err, "rejecting proof with foreign descriptor");
            return Err(err);
        }

        let public = self.challenge.public_point().point();
        if Secp256k1::is_identity(public) {
            warn!("challenge public point is the point at infinity");
            return Err(Error::InvalidCurvePoint(
                "public point cannot be the point at infinity".to_string(),
            ));
        }

        let commitment = recompute_commitment(public, proof);

        if Secp256k1::is_identity(&commitment) {
            warn!("recomputed commitment is the point at infinity");
            return Err(Error::VerificationFailed);
        }

        let expected = fiat_shamir_challenge(
            descriptor,
            public,
            &commitment,
            self.challenge.nonce().as_bytes(),
        );

        if bool::from(expected.ct_eq(proof.c())) {
            debug!("knizk proof verified");
            Ok(())
        } else {
            debug!("knizk proof rejected");
            Err(Error::VerificationFailed)
        }
    }
}

/// `R' = s·G − c·pub`
fn recompute_commitment(public: &Element, proof: &Proof) -> Element {
    let s_g = Secp256k1::scalar_mul(&Secp256k1::generator(), proof.s());
    let neg_c = Secp256k1::scalar_negate(proof.c());
    let neg_c_pub = Secp256k1::scalar_mul(public, &neg_c);
    Secp256k1::element_add(&s_g, &neg_c_pub)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::primitives::ScryptParams;
    use crate::protocol::{
        CurveId, HashAlgorithm, KeyFn, Nonce, Prover, ProtocolDescriptor, PublicPoint,
    };

    fn challenge_for(secret: &[u8], rng: &mut StdRng) -> Challenge {
        let scrypt = ScryptParams::new(1024, 8, 1, 32).unwrap();
        let keyfn = KeyFn::generate(rng, 32, scrypt).unwrap();
        let public = PublicPoint::from_witness(&keyfn.derive_witness(secret).unwrap()).unwrap();
        let nonce = Nonce::generate(rng, 32).unwrap();
        Challenge::new(ProtocolDescriptor::default(), keyfn, nonce, public).unwrap()
    }

    #[test]
    fn verifier_accepts_valid_proof() {
        let mut rng = StdRng::seed_from_u64(21);
        let challenge = challenge_for(b"open sesame", &mut rng);
        let proof = Prover::new(&challenge, b"open sesame")
            .unwrap()
            .prove(&mut rng)
            .unwrap();

        let verified = Verifier::new(&challenge).verify(&proof).unwrap();
        assert_eq!(verified.public_point(), challenge.public_point());
        assert_eq!(verified.proof(), proof);
    }

    #[test]
    fn verifier_rejects_wrong_secret() {
        let mut rng = StdRng::seed_from_u64(22);
        let challenge = challenge_for(b"open sesame", &mut rng);
        let proof = Prover::new(&challenge, b"open barley")
            .unwrap()
            .prove(&mut rng)
            .unwrap();

        let err = Verifier::new(&challenge).verify(&proof).unwrap_err();
        assert!(err.is_verification_failure());
    }

    #[test]
    fn verifier_rejects_swapped_scalars() {
        let mut rng = StdRng::seed_from_u64(23);
        let challenge = challenge_for(b"open sesame", &mut rng);
        let proof = Prover::new(&challenge, b"open sesame")
            .unwrap()
            .prove(&mut rng)
            .unwrap();

        let swapped = Proof::new(*proof.descriptor(), proof.s().clone(), proof.c().clone()).unwrap();
        assert_eq!(
            Verifier::new(&challenge).verify(&swapped).unwrap_err(),
            Error::VerificationFailed
        );
    }

    #[test]
    fn verifier_rejects_foreign_descriptor_before_arithmetic() {
        let mut rng = StdRng::seed_from_u64(24);
        let challenge = challenge_for(b"open sesame", &mut rng);
        let proof = Prover::new(&challenge, b"open sesame")
            .unwrap()
            .prove(&mut rng)
            .unwrap();

        let mut descriptor = *proof.descriptor();
        descriptor.hashfn.algorithm = HashAlgorithm::Scrypt;
        let foreign = Proof::new(descriptor, proof.c().clone(), proof.s().clone()).unwrap();

        assert!(matches!(
            Verifier::new(&challenge).verify(&foreign),
            Err(Error::DescriptorMismatch { .. })
        ));
        assert_eq!(descriptor.curve, CurveId::Secp256k1);
    }
}
