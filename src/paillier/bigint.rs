//! Re-export of the arbitrary-precision integer type used for Paillier
//! modular arithmetic.

pub use curv::arithmetic::{Converter, Modulo, One, Samplable, Zero};
pub use curv::BigInt;
