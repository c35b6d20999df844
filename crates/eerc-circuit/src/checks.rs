//! reusable relations shared by the four statements
//!
//! every check only adds constraints; an invalid witness leaves the
//! constraint system unsatisfied rather than failing synthesis.

use std::cmp::Ordering;

use ark_r1cs_std::{eq::EqGadget, fields::fp::FpVar};
use ark_relations::r1cs::SynthesisError;

use crate::babyjub::BabyJubGadget;
use crate::field::Fr;
use crate::poseidon::{cipher, PoseidonGadget};
use crate::types::{
    AuditorVar, BalanceHolder, KeyHolder, MintNullifierVar, PctRecipient, ReceiverVar,
    RegistrationSenderVar, SenderVar,
};

type Result<T> = std::result::Result<T, SynthesisError>;

/// a <= b over canonical integers (both operands must be below (p-1)/2)
pub fn assert_le(a: &FpVar<Fr>, b: &FpVar<Fr>) -> Result<()> {
    a.enforce_cmp(b, Ordering::Less, true)
}

/// scalar within `0..=order-1`
pub fn assert_scalar(babyjub: &BabyJubGadget, scalar: &FpVar<Fr>) -> Result<()> {
    assert_le(scalar, &babyjub.max_scalar())
}

/// sk in range and sk * Base8 == pk
pub fn check_public_key<K: KeyHolder>(babyjub: &BabyJubGadget, holder: &K) -> Result<()> {
    assert_scalar(babyjub, holder.secret_key())?;
    let derived = babyjub.mul_with_base_point(holder.secret_key())?;
    babyjub.assert_point_equal(&derived, holder.public_key())
}

/// elgamal balance ciphertext decrypts to balance * Base8
pub fn check_balance<S: BalanceHolder>(babyjub: &BabyJubGadget, sender: &S) -> Result<()> {
    assert_scalar(babyjub, sender.balance())?;

    let ct = sender.balance_ct();
    let decrypted = babyjub.elgamal_decrypt(&ct.c1, &ct.c2, sender.secret_key())?;
    let expected = babyjub.mul_with_base_point(sender.balance())?;
    babyjub.assert_point_equal(&decrypted, &expected)
}

/// sender's value ciphertext decrypts to value * Base8
pub fn check_positive_value(
    babyjub: &BabyJubGadget,
    sender: &SenderVar,
    value: &FpVar<Fr>,
) -> Result<()> {
    assert_scalar(babyjub, value)?;

    let ct = &sender.value_ct;
    let decrypted = babyjub.elgamal_decrypt(&ct.c1, &ct.c2, &sender.secret_key)?;
    let expected = babyjub.mul_with_base_point(value)?;
    babyjub.assert_point_equal(&decrypted, &expected)
}

/// receiver's value ciphertext is exactly Enc(pk, value * Base8; value_random)
pub fn check_value(
    babyjub: &BabyJubGadget,
    receiver: &ReceiverVar,
    value: &FpVar<Fr>,
) -> Result<()> {
    assert_scalar(babyjub, value)?;
    assert_scalar(babyjub, &receiver.value_random)?;

    let encoded = babyjub.mul_with_base_point(value)?;
    let (c1, c2) =
        babyjub.elgamal_encrypt(&receiver.public_key, &encoded, &receiver.value_random)?;
    babyjub.assert_point_equal(&c1, &receiver.value_ct.c1)?;
    babyjub.assert_point_equal(&c2, &receiver.value_ct.c2)
}

/// poseidon ciphertext is keyed to the recipient and opens to `value`
pub fn check_pct<R: PctRecipient>(
    babyjub: &BabyJubGadget,
    poseidon: &PoseidonGadget,
    recipient: &R,
    value: &FpVar<Fr>,
) -> Result<()> {
    let pct = recipient.pct();
    assert_scalar(babyjub, &pct.random)?;

    let auth_key = babyjub.mul_with_base_point(&pct.random)?;
    babyjub.assert_point_equal(&auth_key, &pct.auth_key)?;

    let shared = babyjub.mul_with_scalar(recipient.recipient_key(), &pct.random)?;
    let plaintext = cipher::decrypt_var(poseidon, &shared, &pct.nonce, &pct.ciphertext, 1)?;
    plaintext[0].enforce_equal(value)
}

pub fn check_pct_receiver(
    babyjub: &BabyJubGadget,
    poseidon: &PoseidonGadget,
    receiver: &ReceiverVar,
    value: &FpVar<Fr>,
) -> Result<()> {
    check_pct(babyjub, poseidon, receiver, value)
}

pub fn check_pct_auditor(
    babyjub: &BabyJubGadget,
    poseidon: &PoseidonGadget,
    auditor: &AuditorVar,
    value: &FpVar<Fr>,
) -> Result<()> {
    check_pct(babyjub, poseidon, auditor, value)
}

/// Poseidon(chainId, sk, address) == registrationHash
pub fn check_registration_hash(
    poseidon: &PoseidonGadget,
    sender: &RegistrationSenderVar,
) -> Result<()> {
    let hash = poseidon.hash(&[
        sender.chain_id.clone(),
        sender.secret_key.clone(),
        sender.address.clone(),
    ])?;
    hash.enforce_equal(&sender.registration_hash)
}

/// Poseidon(chainId, auditor ciphertext) == nullifierHash
///
/// `poseidon` must be the width-6 permutation.
pub fn check_nullifier_hash(
    poseidon: &PoseidonGadget,
    auditor: &AuditorVar,
    nullifier: &MintNullifierVar,
) -> Result<()> {
    let mut inputs = Vec::with_capacity(1 + auditor.pct.ciphertext.len());
    inputs.push(nullifier.chain_id.clone());
    inputs.extend(auditor.pct.ciphertext.iter().cloned());

    let hash = poseidon.hash(&inputs)?;
    hash.enforce_equal(&nullifier.nullifier_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::babyjub::CurveParams;
    use crate::poseidon::PoseidonParams;
    use crate::types::alloc_scalar;
    use crate::{sample, Params};
    use ark_r1cs_std::alloc::AllocationMode;
    use ark_relations::r1cs::ConstraintSystem;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_assert_le() {
        for (a, b, ok) in [(5u64, 10u64, true), (10, 10, true), (11, 10, false), (0, 0, true)] {
            let cs = ConstraintSystem::<Fr>::new_ref();
            let a = alloc_scalar(&cs, Fr::from(a), AllocationMode::Witness).unwrap();
            let b = alloc_scalar(&cs, Fr::from(b), AllocationMode::Witness).unwrap();
            assert_le(&a, &b).unwrap();
            assert_eq!(cs.is_satisfied().unwrap(), ok);
        }
    }

    #[test]
    fn test_scalar_bound() {
        let curve = CurveParams::babyjub();
        let babyjub = BabyJubGadget::new(&curve);

        let cs = ConstraintSystem::<Fr>::new_ref();
        let max = alloc_scalar(&cs, curve.max_scalar(), AllocationMode::Witness).unwrap();
        assert_scalar(&babyjub, &max).unwrap();
        assert!(cs.is_satisfied().unwrap());

        let cs = ConstraintSystem::<Fr>::new_ref();
        let over = alloc_scalar(&cs, curve.order, AllocationMode::Witness).unwrap();
        assert_scalar(&babyjub, &over).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_receiver_checks() {
        let params = Params::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let receiver_account = sample::Account::generate(&params.curve, &mut rng);
        let receiver =
            sample::receiver(&params, &mut rng, &receiver_account.public_key, 25).unwrap();

        let run = |value: u64| {
            let cs = ConstraintSystem::<Fr>::new_ref();
            let babyjub = BabyJubGadget::new(&params.curve);
            let poseidon = PoseidonGadget::new(&params.poseidon_t4);
            let receiver_var = ReceiverVar::alloc(&cs, &receiver).unwrap();
            let value = alloc_scalar(&cs, Fr::from(value), AllocationMode::Witness).unwrap();
            check_value(&babyjub, &receiver_var, &value).unwrap();
            check_pct_receiver(&babyjub, &poseidon, &receiver_var, &value).unwrap();
            cs.is_satisfied().unwrap()
        };

        assert!(run(25));
        assert!(!run(26));
    }

    #[test]
    fn test_width_six_for_nullifier() {
        let params = PoseidonParams::for_width(6).unwrap();
        assert_eq!(params.arity(), 1 + cipher::CIPHERTEXT_LEN);
    }
}
