//! Fiat-Shamir transcript for non-interactive proofs.
//!
//! The challenge scalar is `SHA-256(descriptor ‖ pub ‖ R ‖ nonce)` reduced modulo
//! the group order. Every message is framed as `len(label) ‖ label ‖ len(msg) ‖ msg`
//! with 8-byte big-endian lengths, so no two distinct transcripts can collide by
//! shifting bytes between adjacent fields.

use sha2::{Digest, Sha256};

use super::Group;

/// Domain separation tag absorbed before anything else.
const TRANSCRIPT_DST: &[u8] = b"knizk-fiat-shamir-sha256";

/// Transcript wrapper for the Fiat-Shamir transformation.
#[derive(Clone)]
pub struct Transcript(Sha256);

impl Transcript {
    /// Creates a new domain-separated transcript.
    pub fn new() -> Self {
        let mut transcript = Self(Sha256::new());
        transcript.append_message(b"dst", TRANSCRIPT_DST);
        transcript
    }

    /// Appends a labeled message.
    pub fn append_message(&mut self, label: &[u8], message: &[u8]) {
        self.0.update((label.len() as u64).to_be_bytes());
        self.0.update(label);
        self.0.update((message.len() as u64).to_be_bytes());
        self.0.update(message);
    }

    /// Appends the protocol descriptor identifiers.
    pub fn append_descriptor(&mut self, protocol: &str, curve: &str, hash: &str, normalization: &str) {
        self.append_message(b"protocol", protocol.as_bytes());
        self.append_message(b"curve", curve.as_bytes());
        self.append_message(b"hashfn-algorithm", hash.as_bytes());
        self.append_message(b"hashfn-normalization", normalization.as_bytes());
    }

    /// Appends the prover's public point.
    pub fn append_public_point(&mut self, point: &[u8]) {
        self.append_message(b"pub", point);
    }

    /// Appends the commitment point `R`.
    pub fn append_commitment(&mut self, commitment: &[u8]) {
        self.append_message(b"commitment", commitment);
    }

    /// Appends the challenge nonce.
    pub fn append_nonce(&mut self, nonce: &[u8]) {
        self.append_message(b"nonce", nonce);
    }

    /// Finalizes the transcript into a challenge scalar for `G`.
    pub fn challenge_scalar<G: Group>(self) -> G::Scalar {
        let digest = self.0.finalize();
        G::scalar_reduce(&digest)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
