use rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Challenge, Proof, Witness, fiat_shamir_challenge};
use crate::primitives::{Element, Group, Scalar, Secp256k1};
use crate::Result;

/// Prover for the Knizk zero-knowledge protocol.
///
/// Generates non-interactive proofs that the holder knows the secret behind a
/// challenge's public point, without revealing the secret.
///
/// # Security
///
/// - The witness is re-derived from the secret and zeroized with the prover
/// - Each proof uses a fresh commitment scalar; never reuse a [`CommitmentSecret`]
/// - Proofs are bound to the challenge nonce and cannot be replayed elsewhere
pub struct Prover<'a> {
    challenge: &'a Challenge,
    witness: Witness,
}

impl<'a> Prover<'a> {
    /// Creates a prover by re-deriving the witness from `secret` under the
    /// challenge's key-derivation parameters.
    ///
    /// # Errors
    ///
    /// Fails if the challenge's descriptor is unsupported or key derivation
    /// rejects the secret or parameters.
    pub fn new(challenge: &'a Challenge, secret: &[u8]) -> Result<Self> {
        challenge.descriptor().validate()?;
        let witness = challenge.keyfn().derive_witness(secret)?;
        Ok(Self { challenge, witness })
    }

    /// Creates a prover from an already derived witness.
    pub fn with_witness(challenge: &'a Challenge, witness: Witness) -> Self {
        Self { challenge, witness }
    }

    /// Generates a non-interactive zero-knowledge proof using Fiat-Shamir.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R) -> Result<Proof> {
        let (commitment, secret) = self.commit(rng);

        let c = fiat_shamir_challenge(
            self.challenge.descriptor(),
            self.challenge.public_point().point(),
            &commitment,
            self.challenge.nonce().as_bytes(),
        );
        let s = self.respond(&secret, &c);

        debug!(
            curve = %self.challenge.descriptor().curve,
            "generated knizk proof"
        );

        Proof::new(*self.challenge.descriptor(), c, s)
    }

    /// Generates the commitment `R = r·G` (first message).
    ///
    /// Returns the commitment and the secret `r` (must be kept secret).
    pub fn commit<R: CryptoRngCore>(&self, rng: &mut R) -> (Element, CommitmentSecret) {
        let r = Secp256k1::random_scalar(rng);
        let commitment = Secp256k1::scalar_mul(&Secp256k1::generator(), &r);

        (commitment, CommitmentSecret::new(r))
    }

    /// Generates the response `s = r + c·x mod n` (third message).
    pub fn respond(&self, secret: &CommitmentSecret, challenge: &Scalar) -> Scalar {
        let cx = Secp256k1::scalar_mul_scalar(challenge, self.witness.secret());
        Secp256k1::scalar_add(secret.r(), &cx)
    }
}

/// Secret commitment scalar `r` used in the commitment phase.
///
/// Automatically zeroized when dropped.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct CommitmentSecret {
    r: Scalar,
}

impl CommitmentSecret {
    /// Creates a new commitment secret from a scalar.
    pub fn new(r: Scalar) -> Self {
        Self { r }
    }

    /// Returns a reference to the commitment scalar.
    pub fn r(&self) -> &Scalar {
        &self.r
    }
}
