//! Error kinds for the threshold key-management core.
//!
//! Every error is terminal for the state machine instance that raised it:
//! the caller must construct a fresh instance to retry. Errors never name
//! which peer caused a failure — that information stays local to the
//! party that detected it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid threshold configuration: {0}")]
    Config(&'static str),

    #[error("protocol invoked out of order: {0}")]
    ProtocolOrder(&'static str),

    #[error("commitment opening did not match the received commitment")]
    CommitmentMismatch,

    #[error("Feldman VSS share verification failed")]
    VssShareInvalid,

    #[error("zero-knowledge proof rejected: {0}")]
    ProofInvalid(&'static str),

    #[error("public key inconsistency detected: {0}")]
    PublicKeyInconsistent(&'static str),

    #[error("malformed encoding: {0}")]
    Encoding(&'static str),

    #[error("secure random number generator failed")]
    CryptoRng,
}

pub type Result<T> = std::result::Result<T, Error>;
