//! statement-level satisfiability tests

use ark_ff::One;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::circuits::{
    CircuitDefinition, MintCircuit, RegistrationCircuit, TransferCircuit, WithdrawCircuit,
};
use crate::error::Error;
use crate::field::{parse_decimal, Fr};
use crate::params::Params;
use crate::poseidon;
use crate::prover::check_satisfied;
use crate::sample::{self, Account};
use crate::witness::{Operation, WitnessInput};

struct Fixture {
    params: Params,
    rng: ChaCha20Rng,
    user: Account,
    other: Account,
    auditor: Account,
}

fn fixture(seed: u64) -> Fixture {
    let params = Params::new().unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let user = Account::generate(&params.curve, &mut rng);
    let other = Account::generate(&params.curve, &mut rng);
    let auditor = Account::generate(&params.curve, &mut rng);
    Fixture {
        params,
        rng,
        user,
        other,
        auditor,
    }
}

fn assert_unsatisfied<C: CircuitDefinition>(params: &Params, circuit: &C) {
    match check_satisfied(params, circuit) {
        Err(Error::UnsatisfiableWitness { operation, .. }) => {
            assert_eq!(operation, C::OPERATION)
        }
        other => panic!("expected unsatisfiable {}, got {:?}", C::OPERATION, other),
    }
}

fn transfer(f: &mut Fixture, balance: u64, value: u64) -> TransferCircuit {
    sample::transfer(
        &f.params,
        &mut f.rng,
        &f.user,
        balance,
        &f.other.public_key,
        &f.auditor.public_key,
        value,
    )
    .unwrap()
}

#[test]
fn test_register_scenario() {
    let params = Params::new().unwrap();
    let account = Account::from_secret(&params.curve, Fr::from(7u64));
    let address = parse_decimal("546584486846459126461364135121053344201067465379").unwrap();
    let circuit = sample::registration(&params, &account, Fr::one(), address).unwrap();

    assert_eq!(
        circuit.sender.registration_hash,
        poseidon::registration_hash(Fr::one(), Fr::from(7u64), address).unwrap()
    );
    check_satisfied(&params, &circuit).unwrap();

    let mut altered = circuit;
    altered.sender.registration_hash += Fr::one();
    assert_unsatisfied(&params, &altered);
}

#[test]
fn test_register_wrong_secret_key() {
    let params = Params::new().unwrap();
    let account = Account::from_secret(&params.curve, Fr::from(7u64));
    let mut circuit = sample::registration(&params, &account, Fr::one(), Fr::from(99u64)).unwrap();

    // hash recomputed so only the key relation breaks
    circuit.sender.secret_key = Fr::from(8u64);
    circuit.sender.registration_hash =
        poseidon::registration_hash(Fr::one(), Fr::from(8u64), Fr::from(99u64)).unwrap();
    assert_unsatisfied(&params, &circuit);
}

#[test]
fn test_register_secret_key_out_of_range() {
    let params = Params::new().unwrap();
    // sk + order derives the same public key but is not a canonical scalar
    let sk = Fr::from(7u64) + params.curve.order;
    let account = Account::from_secret(&params.curve, sk);
    assert_eq!(
        account.public_key,
        params.curve.derive_public_key(&Fr::from(7u64))
    );

    let circuit = sample::registration(&params, &account, Fr::one(), Fr::from(1u64)).unwrap();
    assert_unsatisfied(&params, &circuit);
}

#[test]
fn test_transfer_valid() {
    let mut f = fixture(1);
    let circuit = transfer(&mut f, 100, 40);
    check_satisfied(&f.params, &circuit).unwrap();

    // spending the whole balance is allowed
    let circuit = transfer(&mut f, 100, 100);
    check_satisfied(&f.params, &circuit).unwrap();
}

#[test]
fn test_transfer_over_balance() {
    let mut f = fixture(2);
    let circuit = transfer(&mut f, 100, 150);
    assert_unsatisfied(&f.params, &circuit);
}

#[test]
fn test_transfer_balance_mismatch() {
    let mut f = fixture(3);
    let mut circuit = transfer(&mut f, 100, 40);
    circuit.sender.balance = Fr::from(101u64);
    assert_unsatisfied(&f.params, &circuit);
}

#[test]
fn test_transfer_foreign_balance_ciphertext() {
    let mut f = fixture(4);
    let mut circuit = transfer(&mut f, 100, 40);
    let (foreign, _) =
        sample::encrypt_value(&f.params.curve, &mut f.rng, &f.other.public_key, 100);
    circuit.sender.balance_ct = foreign;
    assert_unsatisfied(&f.params, &circuit);
}

#[test]
fn test_transfer_receiver_value_mismatch() {
    let mut f = fixture(5);
    let mut circuit = transfer(&mut f, 100, 40);
    let (other_ct, other_random) =
        sample::encrypt_value(&f.params.curve, &mut f.rng, &f.other.public_key, 41);
    circuit.receiver.value_ct = other_ct;
    circuit.receiver.value_random = other_random;
    assert_unsatisfied(&f.params, &circuit);
}

#[test]
fn test_transfer_tampered_summaries() {
    let mut f = fixture(6);
    let circuit = transfer(&mut f, 100, 40);

    for i in 0..4 {
        let mut tampered = circuit;
        tampered.auditor.pct.ciphertext[i] += Fr::one();
        assert_unsatisfied(&f.params, &tampered);
    }

    let mut tampered = circuit;
    tampered.receiver.pct.nonce += Fr::one();
    assert_unsatisfied(&f.params, &tampered);

    let mut tampered = circuit;
    tampered.receiver.pct.auth_key = f.params.curve.mul_base(&Fr::from(3u64));
    assert_unsatisfied(&f.params, &tampered);
}

#[test]
fn test_transfer_summary_for_wrong_recipient() {
    let mut f = fixture(7);
    let mut circuit = transfer(&mut f, 100, 40);
    circuit.auditor.pct = sample::pct(&f.params, &mut f.rng, &f.other.public_key, 40).unwrap();
    assert_unsatisfied(&f.params, &circuit);
}

#[test]
fn test_mint_valid_and_nullifier() {
    let mut f = fixture(8);
    let chain_id = Fr::from(sample::SAMPLE_CHAIN_ID);
    let circuit = sample::mint(
        &f.params,
        &mut f.rng,
        &f.user.public_key,
        &f.auditor.public_key,
        chain_id,
        500,
    )
    .unwrap();
    check_satisfied(&f.params, &circuit).unwrap();

    assert_eq!(
        circuit.nullifier.nullifier_hash,
        poseidon::nullifier_hash(chain_id, &circuit.auditor.pct.ciphertext).unwrap()
    );

    let mut wrong_chain = circuit;
    wrong_chain.nullifier.chain_id = Fr::one();
    assert_unsatisfied(&f.params, &wrong_chain);

    let mut wrong_value = circuit;
    wrong_value.value = Fr::from(501u64);
    assert_unsatisfied(&f.params, &wrong_value);
}

#[test]
fn test_nullifier_sensitivity() {
    let chain_id = Fr::from(sample::SAMPLE_CHAIN_ID);
    let ct = [
        Fr::from(11u64),
        Fr::from(22u64),
        Fr::from(33u64),
        Fr::from(44u64),
    ];
    let base = poseidon::nullifier_hash(chain_id, &ct).unwrap();
    assert_eq!(base, poseidon::nullifier_hash(chain_id, &ct).unwrap());

    for i in 0..ct.len() {
        let mut changed = ct;
        changed[i] += Fr::one();
        assert_ne!(base, poseidon::nullifier_hash(chain_id, &changed).unwrap());
    }
}

#[test]
fn test_withdraw() {
    let mut f = fixture(9);
    let circuit = sample::withdraw(
        &f.params,
        &mut f.rng,
        &f.user,
        1_000,
        &f.auditor.public_key,
        1_000,
    )
    .unwrap();
    check_satisfied(&f.params, &circuit).unwrap();
    assert_eq!(circuit.public_inputs().last(), Some(&Fr::from(1_000u64)));

    let over = sample::withdraw(
        &f.params,
        &mut f.rng,
        &f.user,
        1_000,
        &f.auditor.public_key,
        1_001,
    )
    .unwrap();
    assert_unsatisfied(&f.params, &over);

    // public value no longer matches the auditor summary
    let mut mismatched = circuit;
    mismatched.value = Fr::from(999u64);
    assert_unsatisfied(&f.params, &mismatched);
}

#[test]
fn test_blank_circuits_unsatisfied() {
    let params = Params::new().unwrap();
    // all-zero points are off-curve
    assert_unsatisfied(&params, &TransferCircuit::default());
    assert_unsatisfied(&params, &WithdrawCircuit::default());
    assert_unsatisfied(&params, &MintCircuit::default());
    assert_unsatisfied(&params, &RegistrationCircuit::default());
}

fn sample_roundtrip<C: CircuitDefinition>(params: &Params, seed: u64) {
    let input = sample::witness_for(params, C::OPERATION, seed).unwrap();
    assert_eq!(input.public_inputs.len(), C::PUBLIC_INPUTS);
    assert_eq!(input.private_inputs.len(), C::PRIVATE_INPUTS);

    let json = input.to_json().unwrap();
    let parsed: C = WitnessInput::from_json(&json).unwrap().parse().unwrap();
    assert_eq!(WitnessInput::from_circuit(&parsed), input);
    check_satisfied(params, &parsed).unwrap();
}

#[test]
fn test_sample_witnesses_satisfy() {
    let params = Params::new().unwrap();
    sample_roundtrip::<RegistrationCircuit>(&params, 1);
    sample_roundtrip::<MintCircuit>(&params, 2);
    sample_roundtrip::<TransferCircuit>(&params, 3);
    sample_roundtrip::<WithdrawCircuit>(&params, 4);
}

#[test]
fn test_sample_is_deterministic() {
    let params = Params::new().unwrap();
    for op in Operation::ALL {
        assert_eq!(
            sample::witness_for(&params, op, 42).unwrap(),
            sample::witness_for(&params, op, 42).unwrap()
        );
    }
}

#[test]
fn test_out_of_field_input_rejected() {
    let params = Params::new().unwrap();
    let mut input = sample::witness_for(&params, Operation::Register, 5).unwrap();
    input.public_inputs[0] =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617".into();
    assert!(matches!(
        input.parse::<RegistrationCircuit>(),
        Err(Error::MalformedInput(_))
    ));
}
