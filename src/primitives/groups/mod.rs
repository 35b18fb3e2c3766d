/// secp256k1 elliptic curve group, the only curve Knizk runs over.
pub mod secp256k1;

pub use secp256k1::Secp256k1;
