//! Protocol, curve, hash and normalization identifiers.
//!
//! Each identifier category is a closed enum. Parsing an unrecognized tag yields
//! [`Error::UnsupportedProtocol`] instead of accepting it.

use core::fmt;
use core::str::FromStr;

use crate::{Error, Result};

macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $category:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Returns the namespaced wire tag.
            pub const fn tag(self) -> &'static str {
                match self {
                    $( $name::$variant => $tag ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(tag: &str) -> Result<Self> {
                match tag {
                    $( $tag => Ok($name::$variant), )+
                    other => Err(Error::UnsupportedProtocol(format!(
                        "unrecognized {} '{other}'",
                        $category
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.tag())
            }
        }
    };
}

tagged_enum! {
    /// Zero-knowledge protocol identifier.
    Protocol, "protocol" {
        /// Non-interactive Schnorr proof of knowledge.
        Knizk => "nuid.zk.protocol/knizk",
    }
}

tagged_enum! {
    /// Elliptic curve identifier.
    CurveId, "curve id" {
        /// SEC 2 secp256k1.
        Secp256k1 => "nuid.elliptic.curve/secp256k1",
    }
}

tagged_enum! {
    /// Hash algorithm identifier.
    HashAlgorithm, "hash algorithm" {
        /// SHA-256, used for the Fiat-Shamir challenge.
        Sha256 => "nuid.cryptography.hash.algorithm/sha256",
        /// scrypt, used for key derivation.
        Scrypt => "nuid.cryptography.hash.algorithm/scrypt",
    }
}

tagged_enum! {
    /// Unicode normalization form applied to secrets before hashing.
    NormalizationForm, "normalization form" {
        /// Compatibility decomposition followed by canonical composition.
        Nfkc => "string.normalization/NFKC",
    }
}

/// Hash function used to compute the Fiat-Shamir challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashFn {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Normalization applied to string inputs.
    pub normalization: NormalizationForm,
}

impl Default for HashFn {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            normalization: NormalizationForm::Nfkc,
        }
    }
}

/// Versioned parameter bundle embedded in every challenge and proof.
///
/// Verification compares the proof's descriptor with the challenge's before
/// any curve arithmetic happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProtocolDescriptor {
    /// Proof scheme.
    pub protocol: Protocol,
    /// Curve the points and scalars live on.
    pub curve: CurveId,
    /// Challenge hash function.
    pub hashfn: HashFn,
}

impl ProtocolDescriptor {
    /// The descriptor this implementation emits.
    pub const KNIZK_SECP256K1_SHA256: Self = Self {
        protocol: Protocol::Knizk,
        curve: CurveId::Secp256k1,
        hashfn: HashFn {
            algorithm: HashAlgorithm::Sha256,
            normalization: NormalizationForm::Nfkc,
        },
    };

    /// Checks that this implementation can run the described protocol.
    pub fn validate(&self) -> Result<()> {
        if self.hashfn.algorithm != HashAlgorithm::Sha256 {
            return Err(Error::UnsupportedProtocol(format!(
                "challenge hash function must be {}, got {}",
                HashAlgorithm::Sha256,
                self.hashfn.algorithm
            )));
        }
        Ok(())
    }

    /// Fails with [`Error::DescriptorMismatch`] on the first field that differs.
    ///
    /// `self` is the expected (challenge) descriptor.
    pub fn ensure_matches(&self, found: &ProtocolDescriptor) -> Result<()> {
        fn mismatch(field: &'static str, expected: impl fmt::Display, found: impl fmt::Display) -> Error {
            Error::DescriptorMismatch {
                field,
                expected: expected.to_string(),
                found: found.to_string(),
            }
        }

        if self.protocol != found.protocol {
            return Err(mismatch("protocol", self.protocol, found.protocol));
        }
        if self.curve != found.curve {
            return Err(mismatch("curve", self.curve, found.curve));
        }
        if self.hashfn.algorithm != found.hashfn.algorithm {
            return Err(mismatch(
                "hashfn algorithm",
                self.hashfn.algorithm,
                found.hashfn.algorithm,
            ));
        }
        if self.hashfn.normalization != found.hashfn.normalization {
            return Err(mismatch(
                "hashfn normalization",
                self.hashfn.normalization,
                found.hashfn.normalization,
            ));
        }
        Ok(())
    }
}

impl Default for ProtocolDescriptor {
    fn default() -> Self {
        Self::KNIZK_SECP256K1_SHA256
    }
}
