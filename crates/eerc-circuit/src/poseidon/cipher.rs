//! poseidon sponge encryption keyed by a babyjubjub shared point
//!
//! the message is absorbed three elements at a time into a width-4 state
//! seeded with `[0, key.x, key.y, nonce + len * 2^128]`; every block emits
//! three ciphertext elements and a final squeeze emits the authentication
//! tag. a ciphertext for `len` elements carries `ceil(len / 3) * 3 + 1`
//! elements.

use std::cmp::Ordering;

use ark_ff::{MontFp, PrimeField, Zero};
use ark_r1cs_std::{
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
};
use ark_relations::r1cs::SynthesisError;

use super::{PoseidonGadget, PoseidonParams};
use crate::babyjub::PointVar;
use crate::error::{Error, Result};
use crate::field::Fr;
use crate::types::Point;

/// elements of a single-value ciphertext (one block + tag)
pub const CIPHERTEXT_LEN: usize = 4;

const RATE: usize = 3;
const WIDTH: usize = RATE + 1;

/// 2^128, the length domain separator and exclusive nonce bound
pub const TWO_POW_128: Fr = MontFp!("340282366920938463463374607431768211456");

/// message length rounded up to whole blocks
pub fn padded_len(length: usize) -> usize {
    length.div_ceil(RATE) * RATE
}

fn initial_state(key: &Point, nonce: Fr, length: usize) -> [Fr; WIDTH] {
    [
        Fr::zero(),
        key.x,
        key.y,
        nonce + Fr::from(length as u64) * TWO_POW_128,
    ]
}

fn check_params(params: &PoseidonParams) -> Result<()> {
    if params.width != WIDTH {
        return Err(Error::MalformedInput(format!(
            "cipher needs a width-{} permutation, got width {}",
            WIDTH, params.width
        )));
    }
    Ok(())
}

fn check_nonce(nonce: &Fr) -> Result<()> {
    if nonce.into_bigint() >= TWO_POW_128.into_bigint() {
        return Err(Error::MalformedInput("nonce must be below 2^128".into()));
    }
    Ok(())
}

pub fn encrypt(params: &PoseidonParams, message: &[Fr], key: &Point, nonce: Fr) -> Result<Vec<Fr>> {
    check_params(params)?;
    check_nonce(&nonce)?;
    seal(params, message, key, nonce)
}

fn seal(params: &PoseidonParams, message: &[Fr], key: &Point, nonce: Fr) -> Result<Vec<Fr>> {
    let padded = padded_len(message.len());
    let mut state = initial_state(key, nonce, message.len());
    let mut ciphertext = Vec::with_capacity(padded + 1);

    for block in 0..padded / RATE {
        params.permute(&mut state)?;
        for j in 0..RATE {
            let m = message.get(block * RATE + j).copied().unwrap_or_default();
            state[j + 1] += m;
            ciphertext.push(state[j + 1]);
        }
    }

    params.permute(&mut state)?;
    ciphertext.push(state[1]);
    Ok(ciphertext)
}

/// inverse of `encrypt`; fails on a wrong key, nonce, length or tag
pub fn decrypt(
    params: &PoseidonParams,
    ciphertext: &[Fr],
    key: &Point,
    nonce: Fr,
    length: usize,
) -> Result<Vec<Fr>> {
    check_params(params)?;
    check_nonce(&nonce)?;

    let padded = padded_len(length);
    if ciphertext.len() != padded + 1 {
        return Err(Error::MalformedInput(format!(
            "ciphertext for {} elements must have {} entries, got {}",
            length,
            padded + 1,
            ciphertext.len()
        )));
    }

    let mut state = initial_state(key, nonce, length);
    let mut message = Vec::with_capacity(padded);

    for block in ciphertext[..padded].chunks(RATE) {
        params.permute(&mut state)?;
        for j in 0..RATE {
            message.push(block[j] - state[j + 1]);
            state[j + 1] = block[j];
        }
    }

    if message[length..].iter().any(|m| !m.is_zero()) {
        return Err(Error::Decryption("non-zero padding"));
    }

    params.permute(&mut state)?;
    if state[1] != ciphertext[padded] {
        return Err(Error::Decryption("authentication tag mismatch"));
    }

    message.truncate(length);
    Ok(message)
}

/// constrain the decryption of `ciphertext` and return the plaintext
///
/// enforces nonce <= 2^128 - 1, zero padding and the authentication tag.
pub fn decrypt_var(
    poseidon: &PoseidonGadget,
    key: &PointVar,
    nonce: &FpVar<Fr>,
    ciphertext: &[FpVar<Fr>],
    length: usize,
) -> std::result::Result<Vec<FpVar<Fr>>, SynthesisError> {
    debug_assert_eq!(poseidon.params().width, WIDTH);
    let padded = padded_len(length);
    debug_assert_eq!(ciphertext.len(), padded + 1);

    let max_nonce = FpVar::constant(TWO_POW_128 - Fr::from(1u64));
    nonce.enforce_cmp(&max_nonce, Ordering::Less, true)?;

    let domain = FpVar::constant(Fr::from(length as u64) * TWO_POW_128);
    let mut state = poseidon.permute(&[
        FpVar::zero(),
        key.x.clone(),
        key.y.clone(),
        nonce + domain,
    ])?;

    let mut message = Vec::with_capacity(padded);
    for block in ciphertext[..padded].chunks(RATE) {
        for j in 0..RATE {
            message.push(&block[j] - &state[j + 1]);
        }
        state = poseidon.permute(&[
            state[0].clone(),
            block[0].clone(),
            block[1].clone(),
            block[2].clone(),
        ])?;
    }

    for pad in &message[length..] {
        pad.enforce_equal(&FpVar::zero())?;
    }
    ciphertext[padded].enforce_equal(&state[1])?;

    message.truncate(length);
    Ok(message)
}
