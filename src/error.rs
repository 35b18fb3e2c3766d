//! Error types for Knizk

/// Main error types for the library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Input could not be decoded: bad base64, invalid UTF-8, a missing field,
    /// or key-derivation parameters outside the accepted range.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A protocol, curve, hash or normalization identifier is not recognized.
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// A proof and a challenge disagree on their protocol descriptor.
    #[error("Descriptor mismatch on {field}: expected {expected}, found {found}")]
    DescriptorMismatch {
        /// Descriptor component that differs.
        field: &'static str,
        /// Value carried by the challenge.
        expected: String,
        /// Value carried by the proof.
        found: String,
    },

    /// A point is off the curve, not canonically encoded, or the identity.
    #[error("Invalid curve point: {0}")]
    InvalidCurvePoint(String),

    /// A scalar is zero or outside the range `[0, n)`.
    #[error("Degenerate scalar: {0}")]
    DegenerateScalar(String),

    /// The recomputed challenge scalar does not match the proof.
    ///
    /// This is the expected outcome of a wrong secret, not a malformed input.
    #[error("Proof verification failed")]
    VerificationFailed,

    /// Configuration values are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` when the error is a legitimate verification rejection
    /// rather than an input or protocol error.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Error::VerificationFailed)
    }
}
