//! poseidon hash over the bn254 scalar field (circom parameters, x^5 s-box)
//!
//! `hash(inputs)` permutes `[0, inputs..]` with width `inputs.len() + 1` and
//! returns lane 0. the native permutation and the gadget share the same
//! round constants and mds matrix, loaded once per width.

pub mod cipher;
pub mod gadget;

use light_poseidon::parameters::bn254_x5::get_poseidon_parameters;

use crate::error::{Error, Result};
use crate::field::Fr;

pub use gadget::PoseidonGadget;

/// round constants and mds matrix for one state width
#[derive(Clone, Debug)]
pub struct PoseidonParams {
    pub width: usize,
    pub full_rounds: usize,
    pub partial_rounds: usize,
    pub alpha: u64,
    /// `(full_rounds + partial_rounds) * width` round constants
    pub ark: Vec<Fr>,
    /// `width x width`
    pub mds: Vec<Vec<Fr>>,
}

impl PoseidonParams {
    /// parameters for state width `width` (inputs + 1)
    pub fn for_width(width: usize) -> Result<Self> {
        let width_u8 = u8::try_from(width)
            .map_err(|_| Error::MalformedInput(format!("poseidon width {} out of range", width)))?;
        let p = get_poseidon_parameters::<Fr>(width_u8)?;
        Ok(Self {
            width: p.width,
            full_rounds: p.full_rounds,
            partial_rounds: p.partial_rounds,
            alpha: p.alpha,
            ark: p.ark,
            mds: p.mds,
        })
    }

    /// number of message inputs absorbed by `hash`
    pub fn arity(&self) -> usize {
        self.width - 1
    }

    pub fn rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    /// true when round `round` applies the s-box to every lane
    pub fn is_full_round(&self, round: usize) -> bool {
        let half = self.full_rounds / 2;
        round < half || round >= half + self.partial_rounds
    }

    /// in-place permutation of a `width`-sized state
    pub fn permute(&self, state: &mut [Fr]) -> Result<()> {
        if state.len() != self.width {
            return Err(Error::MalformedInput(format!(
                "poseidon state has {} lanes, expected {}",
                state.len(),
                self.width
            )));
        }

        for round in 0..self.rounds() {
            for (i, lane) in state.iter_mut().enumerate() {
                *lane += self.ark[round * self.width + i];
            }

            if self.is_full_round(round) {
                for lane in state.iter_mut() {
                    *lane = sbox(*lane);
                }
            } else {
                state[0] = sbox(state[0]);
            }

            let mixed: Vec<Fr> = self
                .mds
                .iter()
                .map(|row| row.iter().zip(state.iter()).map(|(m, s)| *m * s).sum())
                .collect();
            state.copy_from_slice(&mixed);
        }
        Ok(())
    }

    /// hash exactly `arity()` inputs
    pub fn hash(&self, inputs: &[Fr]) -> Result<Fr> {
        if inputs.len() != self.arity() {
            return Err(Error::MalformedInput(format!(
                "poseidon-{} given {} inputs",
                self.arity(),
                inputs.len()
            )));
        }
        let mut state = Vec::with_capacity(self.width);
        state.push(Fr::from(0u64));
        state.extend_from_slice(inputs);
        self.permute(&mut state)?;
        Ok(state[0])
    }
}

#[inline]
fn sbox(x: Fr) -> Fr {
    let x2 = x * x;
    let x4 = x2 * x2;
    x4 * x
}

/// one-shot hash for any supported arity
pub fn hash(inputs: &[Fr]) -> Result<Fr> {
    PoseidonParams::for_width(inputs.len() + 1)?.hash(inputs)
}

/// registration binding: Poseidon(chainId, sk, address)
pub fn registration_hash(chain_id: Fr, secret_key: Fr, address: Fr) -> Result<Fr> {
    hash(&[chain_id, secret_key, address])
}

/// mint nullifier: Poseidon(chainId, auditor_pct[0..4])
pub fn nullifier_hash(
    chain_id: Fr,
    auditor_ciphertext: &[Fr; cipher::CIPHERTEXT_LEN],
) -> Result<Fr> {
    let mut inputs = Vec::with_capacity(1 + cipher::CIPHERTEXT_LEN);
    inputs.push(chain_id);
    inputs.extend_from_slice(auditor_ciphertext);
    hash(&inputs)
}
