//! participant records and their circuit-variable counterparts
//!
//! every record knows how to read itself from the ordered public / private
//! witness lists, write itself back, and allocate its variables. public
//! values are allocated as instance variables in declaration order, which
//! fixes the public-input layout of each statement.

use ark_r1cs_std::{
    alloc::{AllocVar, AllocationMode},
    fields::fp::FpVar,
};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::babyjub::PointVar;
use crate::error::Result;
use crate::field::{FieldReader, Fr};
use crate::poseidon::cipher::CIPHERTEXT_LEN;

/// babyjubjub affine point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Fr,
    pub y: Fr,
}

impl Point {
    pub const fn new(x: Fr, y: Fr) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElGamalCiphertext {
    pub c1: Point,
    pub c2: Point,
}

/// poseidon ciphertext of one value plus the material needed to re-derive it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoseidonCiphertext {
    /// one block + authentication tag (public)
    pub ciphertext: [Fr; CIPHERTEXT_LEN],
    /// random * Base8 (public)
    pub auth_key: Point,
    /// below 2^128 (public)
    pub nonce: Fr,
    /// sender-chosen randomness (private)
    pub random: Fr,
}

/// spender in a transfer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sender {
    pub secret_key: Fr,
    pub public_key: Point,
    pub balance: Fr,
    pub balance_ct: ElGamalCiphertext,
    pub value_ct: ElGamalCiphertext,
}

/// spender in a withdrawal (no value ciphertext)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawSender {
    pub secret_key: Fr,
    pub public_key: Point,
    pub balance: Fr,
    pub balance_ct: ElGamalCiphertext,
}

/// account being registered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrationSender {
    pub secret_key: Fr,
    /// private witness, unlike every other public key
    pub public_key: Point,
    pub address: Fr,
    pub chain_id: Fr,
    pub registration_hash: Fr,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Receiver {
    pub public_key: Point,
    pub value_ct: ElGamalCiphertext,
    /// elgamal randomness for `value_ct` (private)
    pub value_random: Fr,
    pub pct: PoseidonCiphertext,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Auditor {
    pub public_key: Point,
    pub pct: PoseidonCiphertext,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintNullifier {
    pub chain_id: Fr,
    pub nullifier_hash: Fr,
}

/// ordered serialization against the public / private witness lists
pub trait WitnessRecord: Sized {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self>;
    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>);
}

fn read_point(reader: &mut FieldReader<'_>) -> Result<Point> {
    let [x, y] = reader.next_array::<2>()?;
    Ok(Point::new(x, y))
}

fn write_point(p: &Point, out: &mut Vec<Fr>) {
    out.extend_from_slice(&[p.x, p.y]);
}

fn read_elgamal(reader: &mut FieldReader<'_>) -> Result<ElGamalCiphertext> {
    Ok(ElGamalCiphertext {
        c1: read_point(reader)?,
        c2: read_point(reader)?,
    })
}

fn write_elgamal(ct: &ElGamalCiphertext, out: &mut Vec<Fr>) {
    write_point(&ct.c1, out);
    write_point(&ct.c2, out);
}

impl WitnessRecord for PoseidonCiphertext {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            ciphertext: public.next_array()?,
            auth_key: read_point(public)?,
            nonce: public.next()?,
            random: private.next()?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        public.extend_from_slice(&self.ciphertext);
        write_point(&self.auth_key, public);
        public.push(self.nonce);
        private.push(self.random);
    }
}

impl WitnessRecord for Sender {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            secret_key: private.next()?,
            public_key: read_point(public)?,
            balance: private.next()?,
            balance_ct: read_elgamal(public)?,
            value_ct: read_elgamal(public)?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        private.push(self.secret_key);
        write_point(&self.public_key, public);
        private.push(self.balance);
        write_elgamal(&self.balance_ct, public);
        write_elgamal(&self.value_ct, public);
    }
}

impl WitnessRecord for WithdrawSender {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            secret_key: private.next()?,
            public_key: read_point(public)?,
            balance: private.next()?,
            balance_ct: read_elgamal(public)?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        private.push(self.secret_key);
        write_point(&self.public_key, public);
        private.push(self.balance);
        write_elgamal(&self.balance_ct, public);
    }
}

impl WitnessRecord for RegistrationSender {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            secret_key: private.next()?,
            public_key: read_point(private)?,
            address: public.next()?,
            chain_id: public.next()?,
            registration_hash: public.next()?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        private.push(self.secret_key);
        write_point(&self.public_key, private);
        public.extend_from_slice(&[self.address, self.chain_id, self.registration_hash]);
    }
}

impl WitnessRecord for Receiver {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            public_key: read_point(public)?,
            value_ct: read_elgamal(public)?,
            value_random: private.next()?,
            pct: PoseidonCiphertext::read(public, private)?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        write_point(&self.public_key, public);
        write_elgamal(&self.value_ct, public);
        private.push(self.value_random);
        self.pct.write(public, private);
    }
}

impl WitnessRecord for Auditor {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            public_key: read_point(public)?,
            pct: PoseidonCiphertext::read(public, private)?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        write_point(&self.public_key, public);
        self.pct.write(public, private);
    }
}

impl WitnessRecord for MintNullifier {
    fn read(public: &mut FieldReader<'_>, _private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            chain_id: public.next()?,
            nullifier_hash: public.next()?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, _private: &mut Vec<Fr>) {
        public.extend_from_slice(&[self.chain_id, self.nullifier_hash]);
    }
}

// circuit variables

pub(crate) fn alloc_scalar(
    cs: &ConstraintSystemRef<Fr>,
    value: Fr,
    mode: AllocationMode,
) -> std::result::Result<FpVar<Fr>, SynthesisError> {
    FpVar::new_variable(cs.clone(), || Ok(value), mode)
}

/// allocate raw coordinates; curve membership is asserted by the caller
pub(crate) fn alloc_point(
    cs: &ConstraintSystemRef<Fr>,
    p: &Point,
    mode: AllocationMode,
) -> std::result::Result<PointVar, SynthesisError> {
    Ok(PointVar::new(
        alloc_scalar(cs, p.x, mode)?,
        alloc_scalar(cs, p.y, mode)?,
    ))
}

#[derive(Clone)]
pub struct ElGamalCiphertextVar {
    pub c1: PointVar,
    pub c2: PointVar,
}

impl ElGamalCiphertextVar {
    fn alloc_input(
        cs: &ConstraintSystemRef<Fr>,
        ct: &ElGamalCiphertext,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            c1: alloc_point(cs, &ct.c1, AllocationMode::Input)?,
            c2: alloc_point(cs, &ct.c2, AllocationMode::Input)?,
        })
    }
}

#[derive(Clone)]
pub struct PoseidonCiphertextVar {
    pub ciphertext: Vec<FpVar<Fr>>,
    pub auth_key: PointVar,
    pub nonce: FpVar<Fr>,
    pub random: FpVar<Fr>,
}

impl PoseidonCiphertextVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        pct: &PoseidonCiphertext,
    ) -> std::result::Result<Self, SynthesisError> {
        let ciphertext = pct
            .ciphertext
            .iter()
            .map(|c| alloc_scalar(cs, *c, AllocationMode::Input))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            ciphertext,
            auth_key: alloc_point(cs, &pct.auth_key, AllocationMode::Input)?,
            nonce: alloc_scalar(cs, pct.nonce, AllocationMode::Input)?,
            random: alloc_scalar(cs, pct.random, AllocationMode::Witness)?,
        })
    }
}

#[derive(Clone)]
pub struct SenderVar {
    pub secret_key: FpVar<Fr>,
    pub public_key: PointVar,
    pub balance: FpVar<Fr>,
    pub balance_ct: ElGamalCiphertextVar,
    pub value_ct: ElGamalCiphertextVar,
}

impl SenderVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        sender: &Sender,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            secret_key: alloc_scalar(cs, sender.secret_key, AllocationMode::Witness)?,
            public_key: alloc_point(cs, &sender.public_key, AllocationMode::Input)?,
            balance: alloc_scalar(cs, sender.balance, AllocationMode::Witness)?,
            balance_ct: ElGamalCiphertextVar::alloc_input(cs, &sender.balance_ct)?,
            value_ct: ElGamalCiphertextVar::alloc_input(cs, &sender.value_ct)?,
        })
    }
}

#[derive(Clone)]
pub struct WithdrawSenderVar {
    pub secret_key: FpVar<Fr>,
    pub public_key: PointVar,
    pub balance: FpVar<Fr>,
    pub balance_ct: ElGamalCiphertextVar,
}

impl WithdrawSenderVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        sender: &WithdrawSender,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            secret_key: alloc_scalar(cs, sender.secret_key, AllocationMode::Witness)?,
            public_key: alloc_point(cs, &sender.public_key, AllocationMode::Input)?,
            balance: alloc_scalar(cs, sender.balance, AllocationMode::Witness)?,
            balance_ct: ElGamalCiphertextVar::alloc_input(cs, &sender.balance_ct)?,
        })
    }
}

#[derive(Clone)]
pub struct RegistrationSenderVar {
    pub secret_key: FpVar<Fr>,
    pub public_key: PointVar,
    pub address: FpVar<Fr>,
    pub chain_id: FpVar<Fr>,
    pub registration_hash: FpVar<Fr>,
}

impl RegistrationSenderVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        sender: &RegistrationSender,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            secret_key: alloc_scalar(cs, sender.secret_key, AllocationMode::Witness)?,
            public_key: alloc_point(cs, &sender.public_key, AllocationMode::Witness)?,
            address: alloc_scalar(cs, sender.address, AllocationMode::Input)?,
            chain_id: alloc_scalar(cs, sender.chain_id, AllocationMode::Input)?,
            registration_hash: alloc_scalar(cs, sender.registration_hash, AllocationMode::Input)?,
        })
    }
}

#[derive(Clone)]
pub struct ReceiverVar {
    pub public_key: PointVar,
    pub value_ct: ElGamalCiphertextVar,
    pub value_random: FpVar<Fr>,
    pub pct: PoseidonCiphertextVar,
}

impl ReceiverVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        receiver: &Receiver,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            public_key: alloc_point(cs, &receiver.public_key, AllocationMode::Input)?,
            value_ct: ElGamalCiphertextVar::alloc_input(cs, &receiver.value_ct)?,
            value_random: alloc_scalar(cs, receiver.value_random, AllocationMode::Witness)?,
            pct: PoseidonCiphertextVar::alloc(cs, &receiver.pct)?,
        })
    }
}

#[derive(Clone)]
pub struct AuditorVar {
    pub public_key: PointVar,
    pub pct: PoseidonCiphertextVar,
}

impl AuditorVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        auditor: &Auditor,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            public_key: alloc_point(cs, &auditor.public_key, AllocationMode::Input)?,
            pct: PoseidonCiphertextVar::alloc(cs, &auditor.pct)?,
        })
    }
}

#[derive(Clone)]
pub struct MintNullifierVar {
    pub chain_id: FpVar<Fr>,
    pub nullifier_hash: FpVar<Fr>,
}

impl MintNullifierVar {
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        nullifier: &MintNullifier,
    ) -> std::result::Result<Self, SynthesisError> {
        Ok(Self {
            chain_id: alloc_scalar(cs, nullifier.chain_id, AllocationMode::Input)?,
            nullifier_hash: alloc_scalar(cs, nullifier.nullifier_hash, AllocationMode::Input)?,
        })
    }
}

/// holder of a key pair inside a circuit
pub trait KeyHolder {
    fn secret_key(&self) -> &FpVar<Fr>;
    fn public_key(&self) -> &PointVar;
}

/// key holder that also proves knowledge of an encrypted balance
pub trait BalanceHolder: KeyHolder {
    fn balance(&self) -> &FpVar<Fr>;
    fn balance_ct(&self) -> &ElGamalCiphertextVar;
}

/// recipient of a poseidon ciphertext (receiver or auditor)
pub trait PctRecipient {
    fn recipient_key(&self) -> &PointVar;
    fn pct(&self) -> &PoseidonCiphertextVar;
}

macro_rules! impl_key_holder {
    ($($ty:ty),*) => {$(
        impl KeyHolder for $ty {
            fn secret_key(&self) -> &FpVar<Fr> {
                &self.secret_key
            }
            fn public_key(&self) -> &PointVar {
                &self.public_key
            }
        }
    )*};
}

impl_key_holder!(SenderVar, WithdrawSenderVar, RegistrationSenderVar);

impl BalanceHolder for SenderVar {
    fn balance(&self) -> &FpVar<Fr> {
        &self.balance
    }
    fn balance_ct(&self) -> &ElGamalCiphertextVar {
        &self.balance_ct
    }
}

impl BalanceHolder for WithdrawSenderVar {
    fn balance(&self) -> &FpVar<Fr> {
        &self.balance
    }
    fn balance_ct(&self) -> &ElGamalCiphertextVar {
        &self.balance_ct
    }
}

impl PctRecipient for ReceiverVar {
    fn recipient_key(&self) -> &PointVar {
        &self.public_key
    }
    fn pct(&self) -> &PoseidonCiphertextVar {
        &self.pct
    }
}

impl PctRecipient for AuditorVar {
    fn recipient_key(&self) -> &PointVar {
        &self.public_key
    }
    fn pct(&self) -> &PoseidonCiphertextVar {
        &self.pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: u64) -> Fr {
        Fr::from(v)
    }

    fn pt(a: u64) -> Point {
        Point::new(f(a), f(a + 1))
    }

    #[test]
    fn test_receiver_order() {
        let receiver = Receiver {
            public_key: pt(1),
            value_ct: ElGamalCiphertext { c1: pt(3), c2: pt(5) },
            value_random: f(100),
            pct: PoseidonCiphertext {
                ciphertext: [f(7), f(8), f(9), f(10)],
                auth_key: pt(11),
                nonce: f(13),
                random: f(101),
            },
        };

        let (mut public, mut private) = (Vec::new(), Vec::new());
        receiver.write(&mut public, &mut private);
        assert_eq!(public, (1..=13).map(f).collect::<Vec<_>>());
        assert_eq!(private, vec![f(100), f(101)]);

        let mut pub_reader = FieldReader::new(&public);
        let mut priv_reader = FieldReader::new(&private);
        let parsed = Receiver::read(&mut pub_reader, &mut priv_reader).unwrap();
        pub_reader.finish().unwrap();
        priv_reader.finish().unwrap();
        assert_eq!(parsed, receiver);
    }

    #[test]
    fn test_registration_key_is_private() {
        let sender = RegistrationSender {
            secret_key: f(1),
            public_key: pt(2),
            address: f(10),
            chain_id: f(11),
            registration_hash: f(12),
        };
        let (mut public, mut private) = (Vec::new(), Vec::new());
        sender.write(&mut public, &mut private);
        assert_eq!(public, vec![f(10), f(11), f(12)]);
        assert_eq!(private, vec![f(1), f(2), f(3)]);
    }

    #[test]
    fn test_short_input_rejected() {
        let public = vec![f(1); 5];
        let private = vec![f(1); 2];
        let mut pub_reader = FieldReader::new(&public);
        let mut priv_reader = FieldReader::new(&private);
        assert!(Sender::read(&mut pub_reader, &mut priv_reader).is_err());
    }
}
