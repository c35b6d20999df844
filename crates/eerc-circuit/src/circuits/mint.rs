use ark_r1cs_std::alloc::AllocationMode;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::CircuitDefinition;
use crate::babyjub::BabyJubGadget;
use crate::checks::{check_nullifier_hash, check_pct_auditor, check_pct_receiver, check_value};
use crate::error::Result;
use crate::field::{FieldReader, Fr};
use crate::params::Params;
use crate::poseidon::PoseidonGadget;
use crate::types::{
    alloc_scalar, Auditor, AuditorVar, MintNullifier, MintNullifierVar, Receiver, ReceiverVar,
    WitnessRecord,
};
use crate::witness::Operation;

/// private mint: new encrypted value for the receiver, summaries for receiver
/// and auditor, and a nullifier over the auditor ciphertext
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintCircuit {
    pub receiver: Receiver,
    pub auditor: Auditor,
    pub nullifier: MintNullifier,
    /// private
    pub value: Fr,
}

impl WitnessRecord for MintCircuit {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            receiver: Receiver::read(public, private)?,
            auditor: Auditor::read(public, private)?,
            nullifier: MintNullifier::read(public, private)?,
            value: private.next()?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        self.receiver.write(public, private);
        self.auditor.write(public, private);
        self.nullifier.write(public, private);
        private.push(self.value);
    }
}

impl CircuitDefinition for MintCircuit {
    const OPERATION: Operation = Operation::Mint;
    const PUBLIC_INPUTS: usize = 24;
    const PRIVATE_INPUTS: usize = 4;

    fn define(
        &self,
        cs: ConstraintSystemRef<Fr>,
        params: &Params,
    ) -> std::result::Result<(), SynthesisError> {
        let receiver = ReceiverVar::alloc(&cs, &self.receiver)?;
        let auditor = AuditorVar::alloc(&cs, &self.auditor)?;
        let nullifier = MintNullifierVar::alloc(&cs, &self.nullifier)?;
        let value = alloc_scalar(&cs, self.value, AllocationMode::Witness)?;

        let babyjub = BabyJubGadget::new(&params.curve);
        let poseidon = PoseidonGadget::new(&params.poseidon_t4);
        let poseidon_nullifier = PoseidonGadget::new(&params.poseidon_t6);

        check_value(&babyjub, &receiver, &value)?;
        check_nullifier_hash(&poseidon_nullifier, &auditor, &nullifier)?;
        check_pct_receiver(&babyjub, &poseidon, &receiver, &value)?;
        check_pct_auditor(&babyjub, &poseidon, &auditor, &value)
    }
}
