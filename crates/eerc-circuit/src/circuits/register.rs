use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::CircuitDefinition;
use crate::babyjub::BabyJubGadget;
use crate::checks::{check_public_key, check_registration_hash};
use crate::error::Result;
use crate::field::{FieldReader, Fr};
use crate::params::Params;
use crate::poseidon::PoseidonGadget;
use crate::types::{RegistrationSender, RegistrationSenderVar, WitnessRecord};
use crate::witness::Operation;

/// binds a babyjubjub key pair to (chain id, address)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrationCircuit {
    pub sender: RegistrationSender,
}

impl WitnessRecord for RegistrationCircuit {
    fn read(public: &mut FieldReader<'_>, private: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            sender: RegistrationSender::read(public, private)?,
        })
    }

    fn write(&self, public: &mut Vec<Fr>, private: &mut Vec<Fr>) {
        self.sender.write(public, private);
    }
}

impl CircuitDefinition for RegistrationCircuit {
    const OPERATION: Operation = Operation::Register;
    const PUBLIC_INPUTS: usize = 3;
    const PRIVATE_INPUTS: usize = 3;

    fn define(
        &self,
        cs: ConstraintSystemRef<Fr>,
        params: &Params,
    ) -> std::result::Result<(), SynthesisError> {
        let sender = RegistrationSenderVar::alloc(&cs, &self.sender)?;

        let babyjub = BabyJubGadget::new(&params.curve);
        let poseidon = PoseidonGadget::new(&params.poseidon_t4);

        check_public_key(&babyjub, &sender)?;
        check_registration_hash(&poseidon, &sender)
    }
}
