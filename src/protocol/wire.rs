//! Namespaced record shapes exchanged with other implementations.
//!
//! The records here are the flat, namespaced-key JSON objects of the
//! `@nuid/zk` interface. They hold strings only; conversion into the
//! typed gadgets is where tags, base64, points and scalars get validated.

use serde::{Deserialize, Serialize};

use super::gadgets::{Challenge, Credential, KeyFn, Nonce, Proof, PublicPoint, VerifiedCredential};
use super::{CurveId, HashAlgorithm, HashFn, NormalizationForm, Protocol, ProtocolDescriptor};
use crate::codec::{decode_base64, decode_base64_exact, encode_base64};
use crate::primitives::{Group, Scalar, ScryptParams, Secp256k1};
use crate::{Error, Result};

/// `{"nuid.elliptic.curve/id": ...}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveRecord {
    /// Curve identifier tag.
    #[serde(rename = "nuid.elliptic.curve/id")]
    pub id: String,
}

/// A curve point together with its curve parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPointRecord {
    /// Curve parameters.
    #[serde(rename = "nuid.elliptic.curve/parameters")]
    pub parameters: CurveRecord,
    /// Base64 compressed point.
    #[serde(rename = "nuid.elliptic.curve/point")]
    pub point: String,
}

/// Challenge hash function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFnRecord {
    /// Normalization form tag.
    #[serde(rename = "string.normalization/form")]
    pub normalization: String,
    /// Hash algorithm tag.
    #[serde(rename = "nuid.cryptography.hash/algorithm")]
    pub algorithm: String,
}

/// scrypt key-derivation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFnRecord {
    /// Hash algorithm tag, always scrypt.
    #[serde(rename = "nuid.cryptography.hash/algorithm")]
    pub algorithm: String,
    /// Base64 salt.
    #[serde(rename = "nuid.cryptography.base64/salt")]
    pub salt: String,
    /// Normalization form tag.
    #[serde(rename = "string.normalization/form")]
    pub normalization: String,
    /// scrypt `N`.
    #[serde(rename = "nuid.cryptography.hash.algorithm.scrypt/N")]
    pub n: u64,
    /// scrypt `r`.
    #[serde(rename = "nuid.cryptography.hash.algorithm.scrypt/r")]
    pub r: u32,
    /// scrypt `p`.
    #[serde(rename = "nuid.cryptography.hash.algorithm.scrypt/p")]
    pub p: u32,
    /// Derived key length.
    #[serde(rename = "nuid.cryptography.hash.algorithm.scrypt/length")]
    pub length: usize,
}

/// Stored credential: key-derivation parameters plus the public point, flattened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Key-derivation parameters.
    #[serde(flatten)]
    pub keyfn: KeyFnRecord,
    /// Public point.
    #[serde(flatten)]
    pub public: PublicPointRecord,
}

/// Challenge issued for one verification attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Protocol tag.
    #[serde(rename = "nuid.zk/protocol")]
    pub protocol: String,
    /// Curve of the proof.
    #[serde(rename = "nuid.zk.knizk/curve")]
    pub curve: CurveRecord,
    /// Challenge hash function.
    #[serde(rename = "nuid.zk.knizk/hashfn")]
    pub hashfn: HashFnRecord,
    /// Key-derivation parameters copied from the credential.
    #[serde(rename = "nuid.zk.knizk/keyfn")]
    pub keyfn: KeyFnRecord,
    /// Base64 nonce.
    #[serde(rename = "nuid.zk.knizk/nonce")]
    pub nonce: String,
    /// Public point copied from the credential.
    #[serde(rename = "nuid.zk.knizk/pub")]
    pub public: PublicPointRecord,
}

/// Proof record.
///
/// `curve` and `hashfn` are always written; when absent on input the default
/// descriptor is assumed, which accepts the bare three-field `@nuid/zk` proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Protocol tag.
    #[serde(rename = "nuid.zk/protocol")]
    pub protocol: String,
    /// Curve of the proof.
    #[serde(rename = "nuid.zk.knizk/curve", default)]
    pub curve: Option<CurveRecord>,
    /// Challenge hash function.
    #[serde(rename = "nuid.zk.knizk/hashfn", default)]
    pub hashfn: Option<HashFnRecord>,
    /// Base64 challenge scalar.
    #[serde(rename = "nuid.zk.knizk/c")]
    pub c: String,
    /// Base64 response scalar.
    #[serde(rename = "nuid.zk.knizk/s")]
    pub s: String,
}

/// Challenge plus the proof scalars that verified against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedCredentialRecord {
    /// The challenge fields.
    #[serde(flatten)]
    pub challenge: ChallengeRecord,
    /// Base64 challenge scalar.
    #[serde(rename = "nuid.zk.knizk/c")]
    pub c: String,
    /// Base64 response scalar.
    #[serde(rename = "nuid.zk.knizk/s")]
    pub s: String,
}

impl From<CurveId> for CurveRecord {
    fn from(curve: CurveId) -> Self {
        Self {
            id: curve.tag().to_string(),
        }
    }
}

impl TryFrom<CurveRecord> for CurveId {
    type Error = Error;

    fn try_from(record: CurveRecord) -> Result<Self> {
        record.id.parse()
    }
}

impl From<&PublicPoint> for PublicPointRecord {
    fn from(public: &PublicPoint) -> Self {
        Self {
            parameters: public.curve().into(),
            point: encode_base64(&public.to_bytes()),
        }
    }
}

impl TryFrom<PublicPointRecord> for PublicPoint {
    type Error = Error;

    fn try_from(record: PublicPointRecord) -> Result<Self> {
        let curve = CurveId::try_from(record.parameters)?;
        let bytes = decode_base64("curve point", &record.point)?;
        PublicPoint::from_bytes(curve, &bytes)
    }
}

impl From<HashFn> for HashFnRecord {
    fn from(hashfn: HashFn) -> Self {
        Self {
            normalization: hashfn.normalization.tag().to_string(),
            algorithm: hashfn.algorithm.tag().to_string(),
        }
    }
}

impl TryFrom<HashFnRecord> for HashFn {
    type Error = Error;

    fn try_from(record: HashFnRecord) -> Result<Self> {
        Ok(Self {
            algorithm: record.algorithm.parse()?,
            normalization: record.normalization.parse()?,
        })
    }
}

impl From<&KeyFn> for KeyFnRecord {
    fn from(keyfn: &KeyFn) -> Self {
        let scrypt = keyfn.scrypt();
        Self {
            algorithm: HashAlgorithm::Scrypt.tag().to_string(),
            salt: encode_base64(keyfn.salt()),
            normalization: keyfn.normalization().tag().to_string(),
            n: scrypt.n,
            r: scrypt.r,
            p: scrypt.p,
            length: scrypt.length,
        }
    }
}

impl TryFrom<KeyFnRecord> for KeyFn {
    type Error = Error;

    fn try_from(record: KeyFnRecord) -> Result<Self> {
        let algorithm: HashAlgorithm = record.algorithm.parse()?;
        if algorithm != HashAlgorithm::Scrypt {
            return Err(Error::UnsupportedProtocol(format!(
                "key function must be {}, got {algorithm}",
                HashAlgorithm::Scrypt
            )));
        }

        let normalization: NormalizationForm = record.normalization.parse()?;
        let salt = decode_base64("salt", &record.salt)?;
        let scrypt = ScryptParams::new(record.n, record.r, record.p, record.length)?;

        KeyFn::new(salt, normalization, scrypt)
    }
}

impl From<Credential> for CredentialRecord {
    fn from(credential: Credential) -> Self {
        Self {
            keyfn: credential.keyfn().into(),
            public: credential.public_point().into(),
        }
    }
}

impl TryFrom<CredentialRecord> for Credential {
    type Error = Error;

    fn try_from(record: CredentialRecord) -> Result<Self> {
        Ok(Credential::new(
            KeyFn::try_from(record.keyfn)?,
            PublicPoint::try_from(record.public)?,
        ))
    }
}

impl From<Challenge> for ChallengeRecord {
    fn from(challenge: Challenge) -> Self {
        let descriptor = challenge.descriptor();
        Self {
            protocol: descriptor.protocol.tag().to_string(),
            curve: descriptor.curve.into(),
            hashfn: descriptor.hashfn.into(),
            keyfn: challenge.keyfn().into(),
            nonce: encode_base64(challenge.nonce().as_bytes()),
            public: challenge.public_point().into(),
        }
    }
}

impl TryFrom<ChallengeRecord> for Challenge {
    type Error = Error;

    fn try_from(record: ChallengeRecord) -> Result<Self> {
        let descriptor = ProtocolDescriptor {
            protocol: record.protocol.parse::<Protocol>()?,
            curve: CurveId::try_from(record.curve)?,
            hashfn: HashFn::try_from(record.hashfn)?,
        };
        let keyfn = KeyFn::try_from(record.keyfn)?;
        let nonce = Nonce::new(decode_base64("nonce", &record.nonce)?)?;
        let public = PublicPoint::try_from(record.public)?;

        Challenge::new(descriptor, keyfn, nonce, public)
    }
}

fn encode_scalar(scalar: &Scalar) -> String {
    encode_base64(&Secp256k1::scalar_to_bytes(scalar))
}

fn decode_scalar(field: &str, encoded: &str) -> Result<Scalar> {
    let bytes = decode_base64_exact(field, encoded, <Secp256k1 as Group>::SCALAR_BYTES)?;
    Secp256k1::scalar_from_bytes(&bytes)
}

impl From<Proof> for ProofRecord {
    fn from(proof: Proof) -> Self {
        let descriptor = proof.descriptor();
        Self {
            protocol: descriptor.protocol.tag().to_string(),
            curve: Some(descriptor.curve.into()),
            hashfn: Some(descriptor.hashfn.into()),
            c: encode_scalar(proof.c()),
            s: encode_scalar(proof.s()),
        }
    }
}

impl TryFrom<ProofRecord> for Proof {
    type Error = Error;

    fn try_from(record: ProofRecord) -> Result<Self> {
        let defaults = ProtocolDescriptor::default();
        let descriptor = ProtocolDescriptor {
            protocol: record.protocol.parse::<Protocol>()?,
            curve: match record.curve {
                Some(curve) => CurveId::try_from(curve)?,
                None => defaults.curve,
            },
            hashfn: match record.hashfn {
                Some(hashfn) => HashFn::try_from(hashfn)?,
                None => defaults.hashfn,
            },
        };

        Proof::new(
            descriptor,
            decode_scalar("c", &record.c)?,
            decode_scalar("s", &record.s)?,
        )
    }
}

impl From<VerifiedCredential> for VerifiedCredentialRecord {
    fn from(verified: VerifiedCredential) -> Self {
        Self {
            c: encode_scalar(verified.c()),
            s: encode_scalar(verified.s()),
            challenge: verified.challenge().clone().into(),
        }
    }
}

impl TryFrom<VerifiedCredentialRecord> for VerifiedCredential {
    type Error = Error;

    fn try_from(record: VerifiedCredentialRecord) -> Result<Self> {
        let challenge = Challenge::try_from(record.challenge)?;
        VerifiedCredential::from_parts(
            challenge,
            decode_scalar("c", &record.c)?,
            decode_scalar("s", &record.s)?,
        )
    }
}

macro_rules! json_record {
    ($ty:ident, $record:ident) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
                $record::from(self.clone()).serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
                let record = $record::deserialize(deserializer)?;
                $ty::try_from(record).map_err(serde::de::Error::custom)
            }
        }

        impl $ty {
            /// Serializes to the namespaced JSON record.
            pub fn to_json(&self) -> Result<String> {
                serde_json::to_string(&$record::from(self.clone()))
                    .map_err(|e| Error::MalformedInput(format!("JSON encoding failed: {e}")))
            }

            /// Parses the namespaced JSON record and validates every field.
            pub fn from_json(json: &str) -> Result<Self> {
                let record: $record = serde_json::from_str(json)
                    .map_err(|e| Error::MalformedInput(format!("invalid JSON record: {e}")))?;
                $ty::try_from(record)
            }
        }
    };
}

json_record!(Credential, CredentialRecord);
json_record!(Challenge, ChallengeRecord);
json_record!(Proof, ProofRecord);
json_record!(VerifiedCredential, VerifiedCredentialRecord);
