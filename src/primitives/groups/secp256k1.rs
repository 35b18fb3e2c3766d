//! secp256k1 elliptic curve group implementation.
//!
//! # Security Level
//!
//! secp256k1 provides approximately 128 bits of security against classical attacks.
//! The curve has cofactor 1, so every non-identity point on the curve lies in the
//! prime-order group and no extra subgroup check is needed after decoding.
//!
//! # Encoding
//!
//! Scalars are 32 bytes big-endian. Points are 33-byte SEC1 compressed encodings;
//! this is the only accepted form.

use core::fmt;

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar as K256Scalar};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a secp256k1 scalar (32 bytes).
const SECP256K1_SCALAR_BYTES: usize = 32;

/// Number of bytes in a compressed secp256k1 point (33 bytes: 1 byte prefix + 32 byte x-coordinate).
const SECP256K1_COMPRESSED_BYTES: usize = 33;

/// secp256k1 elliptic curve group implementation.
#[derive(Clone, Debug)]
pub struct Secp256k1;

/// Scalar in the secp256k1 group.
///
/// Scalars are automatically zeroized when dropped for security.
#[derive(Clone)]
pub struct Scalar(K256Scalar);

/// Element (point) in the secp256k1 group.
///
/// Points are stored in projective coordinates for efficient arithmetic,
/// and serialized in compressed form.
#[derive(Clone, Copy)]
pub struct Element(ProjectivePoint);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        // K256Scalar doesn't expose mutable internals, so we overwrite with zero
        self.0 = K256Scalar::ZERO;
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scalar(..)")
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({})", hex::encode(Secp256k1::element_to_bytes(self)))
    }
}

impl Scalar {
    /// Creates a new scalar from a k256 Scalar.
    pub fn new(value: K256Scalar) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner k256 Scalar.
    pub fn inner(&self) -> &K256Scalar {
        &self.0
    }
}

impl Element {
    /// Creates a new element from a ProjectivePoint.
    pub fn new(value: ProjectivePoint) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner ProjectivePoint.
    pub fn inner(&self) -> &ProjectivePoint {
        &self.0
    }
}

impl Group for Secp256k1 {
    type Scalar = Scalar;
    type Element = Element;

    const SCALAR_BYTES: usize = SECP256K1_SCALAR_BYTES;
    const ELEMENT_BYTES: usize = SECP256K1_COMPRESSED_BYTES;

    fn name() -> &'static str {
        "secp256k1"
    }

    fn generator() -> Self::Element {
        Element(ProjectivePoint::GENERATOR)
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != SECP256K1_SCALAR_BYTES {
            return Err(Error::DegenerateScalar(format!(
                "Expected {} bytes, got {}",
                SECP256K1_SCALAR_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; SECP256K1_SCALAR_BYTES];
        arr.copy_from_slice(bytes);

        match Option::<K256Scalar>::from(K256Scalar::from_repr(arr.into())) {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::DegenerateScalar(
                "Bytes are not below the secp256k1 group order".to_string(),
            )),
        }
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn scalar_reduce(bytes: &[u8]) -> Self::Scalar {
        // Horner evaluation of the big-endian integer in the scalar field:
        // no branches on the byte values, and any input length reduces the same way.
        let radix = K256Scalar::from(256u64);
        let reduced = bytes.iter().fold(K256Scalar::ZERO, |acc, byte| {
            acc * radix + K256Scalar::from(u64::from(*byte))
        });
        Scalar(reduced)
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != SECP256K1_COMPRESSED_BYTES {
            return Err(Error::InvalidCurvePoint(format!(
                "Expected {} bytes, got {}",
                SECP256K1_COMPRESSED_BYTES,
                bytes.len()
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidCurvePoint("Failed to parse encoded point".to_string()))?;

        if !encoded.is_compressed() {
            return Err(Error::InvalidCurvePoint(
                "Point is not in compressed SEC1 form".to_string(),
            ));
        }

        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| {
                Error::InvalidCurvePoint("Bytes do not represent a secp256k1 point".to_string())
            })?;

        let element = Element(ProjectivePoint::from(affine));
        if Self::is_identity(&element) {
            return Err(Error::InvalidCurvePoint(
                "Point at infinity is not allowed".to_string(),
            ));
        }

        Ok(element)
    }

    fn element_to_bytes(element: &Self::Element) -> Vec<u8> {
        let affine = element.0.to_affine();
        affine.to_encoded_point(true).as_bytes().to_vec()
    }

    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar {
        loop {
            let candidate = K256Scalar::random(&mut *rng);
            if !bool::from(candidate.is_zero()) {
                return Scalar(candidate);
            }
        }
    }

    fn scalar_mul(element: &Self::Element, scalar: &Self::Scalar) -> Self::Element {
        Element(element.0 * scalar.0)
    }

    fn element_add(a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element(a.0 + b.0)
    }

    fn identity() -> Self::Element {
        Element(ProjectivePoint::IDENTITY)
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.0 == ProjectivePoint::IDENTITY
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 + b.0)
    }

    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 * b.0)
    }

    fn scalar_negate(scalar: &Self::Scalar) -> Self::Scalar {
        Scalar(-scalar.0)
    }

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
        scalar.0.is_zero().into()
    }
}

#[cfg(test)]
mod tests {
    use k256::elliptic_curve::ops::Reduce;
    use k256::{FieldBytes, U256};

    use super::*;
    use crate::SecureRng;

    // secp256k1 group order n, big-endian.
    const ORDER_HEX: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

    #[test]
    fn scalar_add_negate() {
        let mut rng = SecureRng::new();
        let a = Secp256k1::random_scalar(&mut rng);
        let b = Secp256k1::random_scalar(&mut rng);

        let sum = Secp256k1::scalar_add(&a, &b);
        let diff = Secp256k1::scalar_add(&sum, &Secp256k1::scalar_negate(&b));
        assert_eq!(a, diff);
    }

    #[test]
    fn scalar_multiplication_commutes() {
        let mut rng = SecureRng::new();
        let a = Secp256k1::random_scalar(&mut rng);
        let b = Secp256k1::random_scalar(&mut rng);

        let ab = Secp256k1::scalar_mul_scalar(&a, &b);
        let ba = Secp256k1::scalar_mul_scalar(&b, &a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn scalar_serialization() {
        let mut rng = SecureRng::new();
        let scalar = Secp256k1::random_scalar(&mut rng);
        let bytes = Secp256k1::scalar_to_bytes(&scalar);
        assert_eq!(bytes.len(), SECP256K1_SCALAR_BYTES);
        let deserialized = Secp256k1::scalar_from_bytes(&bytes).unwrap();
        assert_eq!(scalar, deserialized);
    }

    #[test]
    fn scalar_from_bytes_rejects_order_and_wrong_length() {
        let order = hex::decode(ORDER_HEX).unwrap();
        assert!(matches!(
            Secp256k1::scalar_from_bytes(&order),
            Err(Error::DegenerateScalar(_))
        ));
        assert!(matches!(
            Secp256k1::scalar_from_bytes(&[1u8; 31]),
            Err(Error::DegenerateScalar(_))
        ));
    }

    #[test]
    fn scalar_reduce_matches_curve_reduction_for_32_bytes() {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hex::decode(ORDER_HEX).unwrap());
        bytes[31] = 0xff;

        let ours = Secp256k1::scalar_reduce(&bytes);
        let field_bytes: FieldBytes = bytes.into();
        let theirs = <K256Scalar as Reduce<U256>>::reduce_bytes(&field_bytes);
        assert_eq!(ours, Scalar(theirs));
    }

    #[test]
    fn scalar_reduce_wraps_the_order_to_zero() {
        let order = hex::decode(ORDER_HEX).unwrap();
        assert!(Secp256k1::scalar_is_zero(&Secp256k1::scalar_reduce(&order)));

        let mut order_plus_one = order.clone();
        order_plus_one[31] += 1;
        let one = Secp256k1::scalar_reduce(&order_plus_one);
        assert_eq!(one, Scalar(K256Scalar::ONE));
    }

    #[test]
    fn scalar_reduce_ignores_leading_zeros() {
        let short = Secp256k1::scalar_reduce(&[0x01, 0x02]);
        let padded = Secp256k1::scalar_reduce(&[0x00, 0x00, 0x00, 0x01, 0x02]);
        assert_eq!(short, padded);
        assert_eq!(short, Scalar(K256Scalar::from(0x0102u64)));
    }

    #[test]
    fn element_serialization() {
        let g = Secp256k1::generator();
        let mut rng = SecureRng::new();
        let x = Secp256k1::random_scalar(&mut rng);
        let y = Secp256k1::scalar_mul(&g, &x);

        let bytes = Secp256k1::element_to_bytes(&y);
        assert_eq!(bytes.len(), SECP256K1_COMPRESSED_BYTES);
        let deserialized = Secp256k1::element_from_bytes(&bytes).unwrap();
        assert_eq!(y, deserialized);
    }

    #[test]
    fn generator_has_the_standard_encoding() {
        let expected = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
        let g = Secp256k1::element_to_bytes(&Secp256k1::generator());
        assert_eq!(hex::encode(g), expected);
    }

    #[test]
    fn element_from_bytes_rejects_identity_and_bad_encodings() {
        assert!(matches!(
            Secp256k1::element_from_bytes(&[0u8]),
            Err(Error::InvalidCurvePoint(_))
        ));

        let mut bad_tag = Secp256k1::element_to_bytes(&Secp256k1::generator());
        bad_tag[0] = 0x05;
        assert!(matches!(
            Secp256k1::element_from_bytes(&bad_tag),
            Err(Error::InvalidCurvePoint(_))
        ));

        let mut overflow = vec![0x02];
        overflow.extend_from_slice(&[0xff; 32]);
        assert!(matches!(
            Secp256k1::element_from_bytes(&overflow),
            Err(Error::InvalidCurvePoint(_))
        ));

        let uncompressed = Secp256k1::generator()
            .0
            .to_affine()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        assert!(matches!(
            Secp256k1::element_from_bytes(&uncompressed),
            Err(Error::InvalidCurvePoint(_))
        ));
    }

    #[test]
    fn element_from_bytes_rejects_off_curve_x() {
        // Roughly half of all x-coordinates have no point; at least one small x must fail.
        let rejected = (1u8..=32).any(|x| {
            let mut bytes = vec![0x02];
            bytes.extend_from_slice(&[0u8; 31]);
            bytes.push(x);
            Secp256k1::element_from_bytes(&bytes).is_err()
        });
        assert!(rejected);
    }

    #[test]
    fn element_addition() {
        let g = Secp256k1::generator();
        let mut rng = SecureRng::new();
        let a = Secp256k1::random_scalar(&mut rng);
        let b = Secp256k1::random_scalar(&mut rng);

        let ga = Secp256k1::scalar_mul(&g, &a);
        let gb = Secp256k1::scalar_mul(&g, &b);
        let ga_plus_gb = Secp256k1::element_add(&ga, &gb);

        let a_plus_b = Secp256k1::scalar_add(&a, &b);
        let g_a_plus_b = Secp256k1::scalar_mul(&g, &a_plus_b);

        assert_eq!(ga_plus_gb, g_a_plus_b);
    }

    #[test]
    fn adding_a_negation_gives_identity() {
        let g = Secp256k1::generator();
        let mut rng = SecureRng::new();
        let a = Secp256k1::random_scalar(&mut rng);

        let ga = Secp256k1::scalar_mul(&g, &a);
        let neg = Secp256k1::scalar_mul(&g, &Secp256k1::scalar_negate(&a));
        assert!(Secp256k1::is_identity(&Secp256k1::element_add(&ga, &neg)));
        assert!(!Secp256k1::is_identity(&ga));
        assert!(Secp256k1::is_identity(&Secp256k1::identity()));
    }
}
