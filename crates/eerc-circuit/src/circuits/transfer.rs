use ark_r1cs_std::alloc::AllocationMode;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::CircuitDefinition;
use crate::babyjub::BabyJubGadget;
use crate::checks::{
    assert_le, check_balance, check_pct_auditor, check_pct_receiver, check_positive_value,
    check_public_key, check_value,
};
use crate::error::Result;
use crate::field::{FieldReader, Fr};
use crate::params::Params;
use crate::poseidon::PoseidonGadget;
use crate::types::{
    alloc_scalar, Auditor, AuditorVar, Receiver, ReceiverVar, Sender, SenderVar, WitnessRecord,
};
use crate::witness::Operation;

/// confidential transfer of `value` from sender to receiver
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferCircuit {
    pub sender: Sender,
    pub receiver: Receiver,
    pub auditor: Auditor,
    /// private
    pub value: Fr,
}

impl WitnessRecord for TransferCircuit {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            sender: Sender::read(public, private)?,
            receiver: Receiver::read(public, private)?,
            auditor: Auditor::read(public, private)?,
            value: private.next()?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        self.sender.write(public, private);
        self.receiver.write(public, private);
        self.auditor.write(public, private);
        private.push(self.value);
    }
}

impl CircuitDefinition for TransferCircuit {
    const OPERATION: Operation = Operation::Transfer;
    const PUBLIC_INPUTS: usize = 32;
    const PRIVATE_INPUTS: usize = 6;

    fn define(
        &self,
        cs: ConstraintSystemRef<Fr>,
        params: &Params,
    ) -> std::result::Result<(), SynthesisError> {
        let sender = SenderVar::alloc(&cs, &self.sender)?;
        let receiver = ReceiverVar::alloc(&cs, &self.receiver)?;
        let auditor = AuditorVar::alloc(&cs, &self.auditor)?;
        let value = alloc_scalar(&cs, self.value, AllocationMode::Witness)?;

        let babyjub = BabyJubGadget::new(&params.curve);
        let poseidon = PoseidonGadget::new(&params.poseidon_t4);

        assert_le(&value, &sender.balance)?;
        check_public_key(&babyjub, &sender)?;
        check_balance(&babyjub, &sender)?;
        check_positive_value(&babyjub, &sender, &value)?;
        check_value(&babyjub, &receiver, &value)?;
        check_pct_receiver(&babyjub, &poseidon, &receiver, &value)?;
        check_pct_auditor(&babyjub, &poseidon, &auditor, &value)
    }
}
