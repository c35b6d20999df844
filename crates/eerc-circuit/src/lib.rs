//! Encrypted ERC circuits over BN254
//!
//! Zero-knowledge statements for a confidential token: balances live on chain
//! as ElGamal ciphertexts over babyjubjub, and every state transition is
//! proven with groth16 without revealing amounts or keys.
//!
//! ## Statements
//!
//! - **Register**: the caller knows the secret key behind a public key and
//!   binds it to `(chain id, address)` via a poseidon registration hash
//! - **Mint**: a private mint re-encrypts the value for the receiver, emits
//!   poseidon summaries for receiver and auditor, and a nullifier over the
//!   auditor ciphertext
//! - **Transfer**: the sender owns its balance, spends at most that much, and
//!   the value is re-encrypted for the receiver with auditor visibility
//! - **Withdraw**: like transfer but the burned value is public
//!
//! ## Layout
//!
//! - `babyjub`: curve constants, native group ops and the r1cs gadget
//! - `poseidon`: circom-compatible hash and the authenticated sponge cipher
//! - `types`: participant records and their ordered witness encoding
//! - `checks`: the shared relations every statement is built from
//! - `circuits`: the four statements
//! - `prover`: groth16 setup / prove / verify and key files
//! - `witness`: operation selector and json witness format
//! - `sample`: native witness construction
//!
//! amounts are never decrypted in-circuit; a claimed plaintext is always
//! re-encoded as `value * Base8` and compared as a point.

pub mod babyjub;
pub mod checks;
pub mod circuits;
pub mod error;
pub mod field;
pub mod params;
pub mod poseidon;
pub mod prover;
pub mod sample;
pub mod types;
pub mod witness;

pub use babyjub::{BabyJubConfig, BabyJubGadget, CurveParams, PointVar};
pub use circuits::{
    CircuitDefinition, MintCircuit, RegistrationCircuit, Synthesizer, TransferCircuit,
    WithdrawCircuit,
};
pub use error::{Error, Result};
pub use field::{parse_decimal, to_decimal, Fr};
pub use params::Params;
pub use poseidon::{PoseidonGadget, PoseidonParams};
pub use prover::{check_satisfied, constraint_count, prove, setup, verify, ProofOutput};
pub use types::{
    Auditor, ElGamalCiphertext, MintNullifier, Point, PoseidonCiphertext, Receiver,
    RegistrationSender, Sender, WithdrawSender,
};
pub use witness::{Operation, WitnessInput};

#[cfg(test)]
mod tests;
