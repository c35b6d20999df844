use ark_r1cs_std::alloc::AllocationMode;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::CircuitDefinition;
use crate::babyjub::BabyJubGadget;
use crate::checks::{assert_le, check_balance, check_pct_auditor, check_public_key};
use crate::error::Result;
use crate::field::{FieldReader, Fr};
use crate::params::Params;
use crate::poseidon::PoseidonGadget;
use crate::types::{
    alloc_scalar, Auditor, AuditorVar, WithdrawSender, WithdrawSenderVar, WitnessRecord,
};
use crate::witness::Operation;

/// burn of a public `value` out of the sender's encrypted balance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawCircuit {
    pub sender: WithdrawSender,
    pub auditor: Auditor,
    /// public
    pub value: Fr,
}

impl WitnessRecord for WithdrawCircuit {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            sender: WithdrawSender::read(public, private)?,
            auditor: Auditor::read(public, private)?,
            value: public.next()?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        self.sender.write(public, private);
        self.auditor.write(public, private);
        public.push(self.value);
    }
}

impl CircuitDefinition for WithdrawCircuit {
    const OPERATION: Operation = Operation::Withdraw;
    const PUBLIC_INPUTS: usize = 16;
    const PRIVATE_INPUTS: usize = 3;

    fn define(
        &self,
        cs: ConstraintSystemRef<Fr>,
        params: &Params,
    ) -> std::result::Result<(), SynthesisError> {
        let sender = WithdrawSenderVar::alloc(&cs, &self.sender)?;
        let auditor = AuditorVar::alloc(&cs, &self.auditor)?;
        let value = alloc_scalar(&cs, self.value, AllocationMode::Input)?;

        let babyjub = BabyJubGadget::new(&params.curve);
        let poseidon = PoseidonGadget::new(&params.poseidon_t4);

        assert_le(&value, &sender.balance)?;
        check_public_key(&babyjub, &sender)?;
        check_balance(&babyjub, &sender)?;
        check_pct_auditor(&babyjub, &poseidon, &auditor, &value)
    }
}
