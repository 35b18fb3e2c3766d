use core::fmt::Debug;

use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::Result;

/// Trait for the prime-order groups the Knizk proof runs over.
///
/// Implementations provide the curve arithmetic (for elements) and the
/// scalar-field arithmetic modulo the group order `n` (for scalars). Every
/// operation taking a secret scalar must run in constant time with respect to
/// that scalar.
pub trait Group: Clone + Debug + Send + Sync + 'static {
    /// Scalar type for this group (integers modulo the group order).
    ///
    /// Scalars must be zeroizable for security.
    type Scalar: Clone + Debug + Eq + PartialEq + ConstantTimeEq + Zeroize + Send + Sync;

    /// Element type for this group (curve points).
    type Element: Clone + Debug + Eq + PartialEq + Send + Sync;

    /// Length of a canonical scalar encoding.
    const SCALAR_BYTES: usize;

    /// Length of a canonical element encoding.
    const ELEMENT_BYTES: usize;

    /// Returns the name of this group implementation.
    fn name() -> &'static str;

    /// Returns the base point `G`.
    fn generator() -> Self::Element;

    /// Deserializes a canonical scalar (must be in `[0, n)`).
    fn scalar_from_bytes(b: &[u8]) -> Result<Self::Scalar>;

    /// Serializes a scalar to its canonical big-endian encoding.
    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8>;

    /// Interprets `b` as a big-endian integer of any length and reduces it modulo `n`.
    fn scalar_reduce(b: &[u8]) -> Self::Scalar;

    /// Deserializes a group element, rejecting off-curve points and the identity.
    fn element_from_bytes(b: &[u8]) -> Result<Self::Element>;

    /// Serializes a group element to its canonical encoding.
    fn element_to_bytes(e: &Self::Element) -> Vec<u8>;

    /// Generates a uniformly random non-zero scalar.
    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar;

    /// Performs scalar multiplication: `s · e`.
    fn scalar_mul(e: &Self::Element, s: &Self::Scalar) -> Self::Element;

    /// Adds two group elements: `a + b`.
    fn element_add(a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Returns the identity element (point at infinity).
    fn identity() -> Self::Element;

    /// Checks if an element is the identity.
    fn is_identity(element: &Self::Element) -> bool;

    /// Adds two scalars: `a + b mod n`.
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Multiplies two scalars: `a · b mod n`.
    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Negates a scalar: `-s mod n`.
    fn scalar_negate(s: &Self::Scalar) -> Self::Scalar;

    /// Checks if a scalar is zero.
    fn scalar_is_zero(s: &Self::Scalar) -> bool;
}
