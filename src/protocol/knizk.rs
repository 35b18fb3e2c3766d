use rand_core::CryptoRngCore;
use tracing::debug;

use super::{
    Challenge, Credential, KeyFn, Nonce, Proof, ProtocolDescriptor, Prover, PublicPoint,
    VerifiedCredential, Verifier,
};
use crate::config::KnizkConfig;
use crate::primitives::SecureRng;
use crate::Result;

/// Entry points for the Knizk protocol.
///
/// Holds the issuance configuration (scrypt cost, salt and nonce sizes). Every
/// randomized operation has a `_with_rng` form taking an injected
/// cryptographically secure generator; the plain form uses [`SecureRng`].
///
/// # Example
///
/// ```no_run
/// use knizk::Knizk;
///
/// let knizk = Knizk::default();
/// let credential = knizk.credential_from_secret("secrets are good")?;
/// let challenge = knizk.challenge_from_credential(&credential)?;
/// let proof = knizk.proof_from_secret_and_challenge("secrets are good", &challenge)?;
/// let verified = knizk.verifiable_from_proof_and_challenge(&proof, &challenge)?;
/// assert!(knizk.is_verified(&verified));
/// # Ok::<(), knizk::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Knizk {
    config: KnizkConfig,
}

impl Knizk {
    /// Creates an instance with a validated configuration.
    pub fn new(config: KnizkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the issuance configuration.
    pub fn config(&self) -> &KnizkConfig {
        &self.config
    }

    /// Issues a credential for `secret` with a fresh salt.
    pub fn credential_from_secret(&self, secret: impl AsRef<[u8]>) -> Result<Credential> {
        self.credential_from_secret_with_rng(secret, &mut SecureRng::new())
    }

    /// Issues a credential for `secret`, drawing the salt from `rng`.
    ///
    /// The derived scalar lives only for the duration of this call.
    pub fn credential_from_secret_with_rng<R: CryptoRngCore>(
        &self,
        secret: impl AsRef<[u8]>,
        rng: &mut R,
    ) -> Result<Credential> {
        let keyfn = KeyFn::generate(rng, self.config.salt_length, self.config.scrypt)?;
        let witness = keyfn.derive_witness(secret.as_ref())?;
        let public = PublicPoint::from_witness(&witness)?;

        debug!(
            salt_len = keyfn.salt().len(),
            log_n = keyfn.scrypt().log_n(),
            "issued knizk credential"
        );

        Ok(Credential::new(keyfn, public))
    }

    /// Issues a challenge for `credential` with a fresh nonce and the default descriptor.
    pub fn challenge_from_credential(&self, credential: &Credential) -> Result<Challenge> {
        self.challenge_from_credential_with_rng(credential, &mut SecureRng::new())
    }

    /// Issues a challenge for `credential`, drawing the nonce from `rng`.
    pub fn challenge_from_credential_with_rng<R: CryptoRngCore>(
        &self,
        credential: &Credential,
        rng: &mut R,
    ) -> Result<Challenge> {
        let nonce = Nonce::generate(rng, self.config.nonce_length)?;
        Challenge::new(
            ProtocolDescriptor::default(),
            credential.keyfn().clone(),
            nonce,
            *credential.public_point(),
        )
    }

    /// Proves knowledge of `secret` against `challenge`.
    ///
    /// A wrong secret still yields a well-formed proof; it simply fails
    /// verification.
    pub fn proof_from_secret_and_challenge(
        &self,
        secret: impl AsRef<[u8]>,
        challenge: &Challenge,
    ) -> Result<Proof> {
        self.proof_from_secret_and_challenge_with_rng(secret, challenge, &mut SecureRng::new())
    }

    /// Proves knowledge of `secret`, drawing the commitment scalar from `rng`.
    pub fn proof_from_secret_and_challenge_with_rng<R: CryptoRngCore>(
        &self,
        secret: impl AsRef<[u8]>,
        challenge: &Challenge,
        rng: &mut R,
    ) -> Result<Proof> {
        Prover::new(challenge, secret.as_ref())?.prove(rng)
    }

    /// Verifies `proof` against `challenge`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::VerificationFailed`] when the proof does not
    /// verify; other kinds mean the inputs themselves were unusable.
    pub fn verifiable_from_proof_and_challenge(
        &self,
        proof: &Proof,
        challenge: &Challenge,
    ) -> Result<VerifiedCredential> {
        Verifier::new(challenge).verify(proof)
    }

    /// Runs credential, challenge, proof and verification back to back.
    pub fn verifiable_from_secret(&self, secret: impl AsRef<[u8]>) -> Result<VerifiedCredential> {
        self.verifiable_from_secret_with_rng(secret, &mut SecureRng::new())
    }

    /// Like [`Knizk::verifiable_from_secret`] with an injected generator.
    pub fn verifiable_from_secret_with_rng<R: CryptoRngCore>(
        &self,
        secret: impl AsRef<[u8]>,
        rng: &mut R,
    ) -> Result<VerifiedCredential> {
        let secret = secret.as_ref();
        let credential = self.credential_from_secret_with_rng(secret, rng)?;
        let challenge = self.challenge_from_credential_with_rng(&credential, rng)?;
        let proof = self.proof_from_secret_and_challenge_with_rng(secret, &challenge, rng)?;
        self.verifiable_from_proof_and_challenge(&proof, &challenge)
    }

    /// Extracts the storable credential from a verified credential.
    pub fn credential_from_verifiable(&self, verified: &VerifiedCredential) -> Credential {
        verified.credential()
    }

    /// Re-checks a verified credential, e.g. one read back from storage.
    pub fn is_verified(&self, verified: &VerifiedCredential) -> bool {
        Verifier::new(verified.challenge())
            .verify_response(&verified.proof())
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::primitives::{Group, ScryptParams, Secp256k1};
    use crate::Error;

    fn fast() -> Knizk {
        Knizk::new(KnizkConfig {
            scrypt: ScryptParams::new(1024, 8, 1, 32).unwrap(),
            ..KnizkConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn end_to_end_roundtrip() {
        let knizk = fast();
        let mut rng = StdRng::seed_from_u64(31);

        let verified = knizk
            .verifiable_from_secret_with_rng("secrets are good", &mut rng)
            .unwrap();
        assert!(knizk.is_verified(&verified));

        let credential = knizk.credential_from_verifiable(&verified);
        assert_eq!(credential.public_point(), verified.public_point());
        assert_eq!(credential.keyfn(), verified.keyfn());
    }

    #[test]
    fn stored_credential_accepts_the_right_secret_only() {
        let knizk = fast();
        let mut rng = StdRng::seed_from_u64(32);
        let credential = knizk
            .credential_from_secret_with_rng("hunter2", &mut rng)
            .unwrap();

        let challenge = knizk
            .challenge_from_credential_with_rng(&credential, &mut rng)
            .unwrap();
        let good = knizk
            .proof_from_secret_and_challenge_with_rng("hunter2", &challenge, &mut rng)
            .unwrap();
        assert!(knizk.verifiable_from_proof_and_challenge(&good, &challenge).is_ok());

        let bad = knizk
            .proof_from_secret_and_challenge_with_rng("hunter3", &challenge, &mut rng)
            .unwrap();
        let err = knizk
            .verifiable_from_proof_and_challenge(&bad, &challenge)
            .unwrap_err();
        assert!(err.is_verification_failure());
    }

    #[test]
    fn challenges_carry_fresh_nonces() {
        let knizk = fast();
        let mut rng = StdRng::seed_from_u64(33);
        let credential = knizk.credential_from_secret_with_rng("pw", &mut rng).unwrap();

        let a = knizk.challenge_from_credential_with_rng(&credential, &mut rng).unwrap();
        let b = knizk.challenge_from_credential_with_rng(&credential, &mut rng).unwrap();
        assert_ne!(a.nonce(), b.nonce());
        assert_eq!(a.nonce().as_bytes().len(), 32);
        assert_eq!(a.credential(), credential);
    }

    #[test]
    fn proof_does_not_transfer_between_challenges() {
        let knizk = fast();
        let mut rng = StdRng::seed_from_u64(34);
        let credential = knizk.credential_from_secret_with_rng("pw", &mut rng).unwrap();

        let first = knizk.challenge_from_credential_with_rng(&credential, &mut rng).unwrap();
        let second = knizk.challenge_from_credential_with_rng(&credential, &mut rng).unwrap();
        let proof = knizk
            .proof_from_secret_and_challenge_with_rng("pw", &first, &mut rng)
            .unwrap();

        assert_eq!(
            knizk
                .verifiable_from_proof_and_challenge(&proof, &second)
                .unwrap_err(),
            Error::VerificationFailed
        );
    }

    #[test]
    fn tampered_verified_credential_is_rejected() {
        let knizk = fast();
        let mut rng = StdRng::seed_from_u64(35);
        let verified = knizk.verifiable_from_secret_with_rng("pw", &mut rng).unwrap();

        let one = Secp256k1::scalar_reduce(&[1u8]);
        let tampered = VerifiedCredential::from_parts(
            verified.challenge().clone(),
            verified.c().clone(),
            Secp256k1::scalar_add(verified.s(), &one),
        )
        .unwrap();

        assert!(!knizk.is_verified(&tampered));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = KnizkConfig {
            nonce_length: 8,
            ..KnizkConfig::default()
        };
        assert!(matches!(Knizk::new(config), Err(Error::InvalidConfig(_))));
    }
}
