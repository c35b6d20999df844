//! end-to-end groth16: setup, prove, json export, key persistence and
//! verification against the public-input layout of each statement

use eerc_circuit::prover::{self, load_proving_key, load_verifying_key, save_keys};
use eerc_circuit::sample::{self, Account};
use eerc_circuit::{
    CircuitDefinition, Error, Fr, Operation, Params, ProofOutput, RegistrationCircuit,
    WithdrawCircuit, WitnessInput,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn test_register_prove_verify() {
    let params = Params::new().unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(2024);

    let account = Account::generate(&params.curve, &mut rng);
    let circuit =
        sample::registration(&params, &account, Fr::from(1u64), Fr::from(0xabcdefu64)).unwrap();

    let (pk, vk) = prover::setup::<RegistrationCircuit, _>(&params, &mut rng).unwrap();
    let proof = prover::prove(&params, &pk, &circuit, &mut rng).unwrap();

    let public = circuit.public_inputs();
    assert_eq!(public.len(), RegistrationCircuit::PUBLIC_INPUTS);
    assert!(prover::verify::<RegistrationCircuit>(&vk, &public, &proof).unwrap());

    // another address must not verify
    let mut wrong = public.clone();
    wrong[0] += Fr::from(1u64);
    assert!(!prover::verify::<RegistrationCircuit>(&vk, &wrong, &proof).unwrap());

    // json export is 8 decimal strings and parses back to the same proof
    let output = ProofOutput::from_proof(&proof);
    assert_eq!(output.proof.len(), 8);
    let json = output.to_json().unwrap();
    assert!(json.starts_with("{\"proof\":["));
    let reparsed: ProofOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed.to_proof().unwrap(), proof);

    // keys survive a save / load cycle
    let dir = tempfile::tempdir().unwrap();
    let (pk_path, vk_path) = save_keys(dir.path(), Operation::Register, &pk, &vk).unwrap();
    assert!(pk_path.ends_with("REGISTER.pk"));
    let pk_loaded = load_proving_key(&pk_path).unwrap();
    let vk_loaded = load_verifying_key(&vk_path).unwrap();
    assert_eq!(vk_loaded, vk);

    let proof2 = prover::prove(&params, &pk_loaded, &circuit, &mut rng).unwrap();
    assert!(prover::verify::<RegistrationCircuit>(&vk_loaded, &public, &proof2).unwrap());
}

#[test]
fn test_withdraw_prove_verify() {
    let params = Params::new().unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(99);

    let sender = Account::generate(&params.curve, &mut rng);
    let auditor = Account::generate(&params.curve, &mut rng);
    let circuit =
        sample::withdraw(&params, &mut rng, &sender, 1_000, &auditor.public_key, 400).unwrap();

    let (pk, vk) = prover::setup::<WithdrawCircuit, _>(&params, &mut rng).unwrap();
    let proof = prover::prove(&params, &pk, &circuit, &mut rng).unwrap();

    // sender.pk, sender.balance_ct, auditor.pk, auditor.pct, value
    let public = circuit.public_inputs();
    assert_eq!(public.len(), WithdrawCircuit::PUBLIC_INPUTS);
    assert_eq!(public[0], sender.public_key.x);
    assert_eq!(public[6], auditor.public_key.x);
    assert_eq!(public[15], Fr::from(400u64));
    assert!(prover::verify::<WithdrawCircuit>(&vk, &public, &proof).unwrap());

    // a different burned amount must not verify
    let mut wrong_value = public.clone();
    wrong_value[15] = Fr::from(401u64);
    assert!(!prover::verify::<WithdrawCircuit>(&vk, &wrong_value, &proof).unwrap());

    // nor a different auditor summary
    let mut wrong_pct = public.clone();
    wrong_pct[8] += Fr::from(1u64);
    assert!(!prover::verify::<WithdrawCircuit>(&vk, &wrong_pct, &proof).unwrap());

    // the json witness carries the same public list
    let input = WitnessInput::from_circuit(&circuit);
    assert_eq!(input.public_fields::<WithdrawCircuit>().unwrap(), public);
}

#[test]
fn test_unsatisfiable_witness_never_proves() {
    let params = Params::new().unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    let (pk, _vk) = prover::setup::<RegistrationCircuit, _>(&params, &mut rng).unwrap();

    let input = sample::witness_for(&params, Operation::Register, 3).unwrap();
    let mut circuit: RegistrationCircuit = input.parse().unwrap();
    circuit.sender.registration_hash += Fr::from(1u64);

    match prover::prove(&params, &pk, &circuit, &mut rng) {
        Err(Error::UnsatisfiableWitness { operation, .. }) => {
            assert_eq!(operation, Operation::Register)
        }
        other => panic!("expected unsatisfiable witness, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_witness_rejected_before_synthesis() {
    let input = WitnessInput {
        public_inputs: vec!["1".into(), "2".into()],
        private_inputs: vec!["3".into(), "4".into(), "5".into()],
    };
    assert!(matches!(
        input.parse::<RegistrationCircuit>(),
        Err(Error::MalformedInput(_))
    ));

    let vk_input = WitnessInput {
        public_inputs: vec!["not-a-number".into(), "2".into(), "3".into()],
        private_inputs: vec![],
    };
    assert!(vk_input.public_fields::<RegistrationCircuit>().is_err());
}
