//! native construction of complete witnesses, as a wallet would build them
//!
//! used by tests, benches and the cli `sample` command.

use ark_ff::{BigInteger, PrimeField, UniformRand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::babyjub::{mul_scalar, CurveParams};
use crate::circuits::{MintCircuit, RegistrationCircuit, TransferCircuit, WithdrawCircuit};
use crate::error::{Error, Result};
use crate::field::Fr;
use crate::params::Params;
use crate::poseidon::cipher::{self, CIPHERTEXT_LEN};
use crate::types::{
    Auditor, ElGamalCiphertext, MintNullifier, Point, PoseidonCiphertext, Receiver,
    RegistrationSender, Sender, WithdrawSender,
};
use crate::witness::{Operation, WitnessInput};

/// chain id used by the sample witnesses (avalanche c-chain)
pub const SAMPLE_CHAIN_ID: u64 = 43114;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub secret_key: Fr,
    pub public_key: Point,
}

impl Account {
    pub fn from_secret(curve: &CurveParams, secret_key: Fr) -> Self {
        Self {
            secret_key,
            public_key: curve.derive_public_key(&secret_key),
        }
    }

    pub fn generate<R: Rng + ?Sized>(curve: &CurveParams, rng: &mut R) -> Self {
        Self::from_secret(curve, random_scalar(rng))
    }
}

/// uniform scalar in `0..order`
pub fn random_scalar<R: Rng + ?Sized>(rng: &mut R) -> Fr {
    let s = ark_ed_on_bn254::Fr::rand(rng);
    Fr::from_le_bytes_mod_order(&s.into_bigint().to_bytes_le())
}

/// random nonce below 2^128
pub fn random_nonce<R: Rng + ?Sized>(rng: &mut R) -> Fr {
    Fr::from(rng.gen::<u128>())
}

/// elgamal encryption of `value * Base8`, returning the randomness used
pub fn encrypt_value<R: Rng + ?Sized>(
    curve: &CurveParams,
    rng: &mut R,
    public_key: &Point,
    value: u64,
) -> (ElGamalCiphertext, Fr) {
    let random = random_scalar(rng);
    let ct = curve.elgamal_encrypt(public_key, &curve.encode_value(value), &random);
    (ct, random)
}

/// poseidon ciphertext of `value` for `recipient`
pub fn pct<R: Rng + ?Sized>(
    params: &Params,
    rng: &mut R,
    recipient: &Point,
    value: u64,
) -> Result<PoseidonCiphertext> {
    let random = random_scalar(rng);
    let nonce = random_nonce(rng);
    let shared = mul_scalar(recipient, &random);

    let ciphertext: [Fr; CIPHERTEXT_LEN] =
        cipher::encrypt(&params.poseidon_t4, &[Fr::from(value)], &shared, nonce)?
            .try_into()
            .map_err(|ct: Vec<Fr>| {
                Error::Backend(format!("single-value ciphertext has {} elements", ct.len()))
            })?;

    Ok(PoseidonCiphertext {
        ciphertext,
        auth_key: params.curve.mul_base(&random),
        nonce,
        random,
    })
}

pub fn receiver<R: Rng + ?Sized>(
    params: &Params,
    rng: &mut R,
    public_key: &Point,
    value: u64,
) -> Result<Receiver> {
    let (value_ct, value_random) = encrypt_value(&params.curve, rng, public_key, value);
    Ok(Receiver {
        public_key: *public_key,
        value_ct,
        value_random,
        pct: pct(params, rng, public_key, value)?,
    })
}

pub fn auditor<R: Rng + ?Sized>(
    params: &Params,
    rng: &mut R,
    public_key: &Point,
    value: u64,
) -> Result<Auditor> {
    Ok(Auditor {
        public_key: *public_key,
        pct: pct(params, rng, public_key, value)?,
    })
}

pub fn registration(
    params: &Params,
    account: &Account,
    chain_id: Fr,
    address: Fr,
) -> Result<RegistrationCircuit> {
    let registration_hash = params
        .poseidon_t4
        .hash(&[chain_id, account.secret_key, address])?;
    Ok(RegistrationCircuit {
        sender: RegistrationSender {
            secret_key: account.secret_key,
            public_key: account.public_key,
            address,
            chain_id,
            registration_hash,
        },
    })
}

pub fn mint<R: Rng + ?Sized>(
    params: &Params,
    rng: &mut R,
    receiver_key: &Point,
    auditor_key: &Point,
    chain_id: Fr,
    value: u64,
) -> Result<MintCircuit> {
    let receiver = receiver(params, rng, receiver_key, value)?;
    let auditor = auditor(params, rng, auditor_key, value)?;

    let mut nullifier_inputs = vec![chain_id];
    nullifier_inputs.extend_from_slice(&auditor.pct.ciphertext);
    let nullifier_hash = params.poseidon_t6.hash(&nullifier_inputs)?;

    Ok(MintCircuit {
        receiver,
        auditor,
        nullifier: MintNullifier {
            chain_id,
            nullifier_hash,
        },
        value: Fr::from(value),
    })
}

/// transfer of `value` out of an encrypted `balance`
///
/// `value > balance` is accepted here so callers can build failing witnesses.
pub fn transfer<R: Rng + ?Sized>(
    params: &Params,
    rng: &mut R,
    sender: &Account,
    balance: u64,
    receiver_key: &Point,
    auditor_key: &Point,
    value: u64,
) -> Result<TransferCircuit> {
    let curve = &params.curve;
    let (balance_ct, _) = encrypt_value(curve, rng, &sender.public_key, balance);
    let (value_ct, _) = encrypt_value(curve, rng, &sender.public_key, value);

    Ok(TransferCircuit {
        sender: Sender {
            secret_key: sender.secret_key,
            public_key: sender.public_key,
            balance: Fr::from(balance),
            balance_ct,
            value_ct,
        },
        receiver: receiver(params, rng, receiver_key, value)?,
        auditor: auditor(params, rng, auditor_key, value)?,
        value: Fr::from(value),
    })
}

pub fn withdraw<R: Rng + ?Sized>(
    params: &Params,
    rng: &mut R,
    sender: &Account,
    balance: u64,
    auditor_key: &Point,
    value: u64,
) -> Result<WithdrawCircuit> {
    let (balance_ct, _) = encrypt_value(&params.curve, rng, &sender.public_key, balance);

    Ok(WithdrawCircuit {
        sender: WithdrawSender {
            secret_key: sender.secret_key,
            public_key: sender.public_key,
            balance: Fr::from(balance),
            balance_ct,
        },
        auditor: auditor(params, rng, auditor_key, value)?,
        value: Fr::from(value),
    })
}

/// deterministic, satisfiable witness json for `operation`
pub fn witness_for(params: &Params, operation: Operation, seed: u64) -> Result<WitnessInput> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let curve = &params.curve;

    let user = Account::generate(curve, &mut rng);
    let other = Account::generate(curve, &mut rng);
    let auditor_account = Account::generate(curve, &mut rng);
    let chain_id = Fr::from(SAMPLE_CHAIN_ID);

    let input = match operation {
        Operation::Register => {
            let address = Fr::from_le_bytes_mod_order(&rng.gen::<[u8; 20]>());
            WitnessInput::from_circuit(&registration(params, &user, chain_id, address)?)
        }
        Operation::Mint => WitnessInput::from_circuit(&mint(
            params,
            &mut rng,
            &user.public_key,
            &auditor_account.public_key,
            chain_id,
            1_000,
        )?),
        Operation::Transfer => WitnessInput::from_circuit(&transfer(
            params,
            &mut rng,
            &user,
            1_000,
            &other.public_key,
            &auditor_account.public_key,
            250,
        )?),
        Operation::Withdraw => WitnessInput::from_circuit(&withdraw(
            params,
            &mut rng,
            &user,
            1_000,
            &auditor_account.public_key,
            400,
        )?),
    };
    Ok(input)
}
