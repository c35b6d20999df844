//! error types for witness parsing, constraint evaluation and proving

use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

use crate::witness::Operation;

#[derive(Error, Debug)]
pub enum Error {
    /// a check or range assertion does not hold for the supplied witness
    #[error("{operation} witness is unsatisfiable (first failing constraint: {constraint})")]
    UnsatisfiableWitness {
        operation: Operation,
        constraint: String,
    },

    /// input rejected before any constraint was generated
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// synthesis, setup, proving or verification error from arkworks
    #[error("proof backend error: {0}")]
    Backend(String),

    /// native poseidon decryption rejected the ciphertext
    #[error("decryption failed: {0}")]
    Decryption(&'static str),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<SynthesisError> for Error {
    fn from(err: SynthesisError) -> Self {
        Error::Backend(err.to_string())
    }
}

impl From<ark_serialize::SerializationError> for Error {
    fn from(err: ark_serialize::SerializationError) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput(format!("json: {}", err))
    }
}

impl From<light_poseidon::PoseidonError> for Error {
    fn from(err: light_poseidon::PoseidonError) -> Self {
        Error::Backend(format!("poseidon: {}", err))
    }
}
