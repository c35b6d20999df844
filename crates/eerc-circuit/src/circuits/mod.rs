//! the four eerc statements
//!
//! each statement is a plain data record implementing `CircuitDefinition`;
//! `Synthesizer` pairs it with the protocol params to feed arkworks.

mod mint;
mod register;
mod transfer;
mod withdraw;

pub use mint::MintCircuit;
pub use register::RegistrationCircuit;
pub use transfer::TransferCircuit;
pub use withdraw::WithdrawCircuit;

use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::error::{Error, Result};
use crate::field::{FieldReader, Fr};
use crate::params::Params;
use crate::types::WitnessRecord;
use crate::witness::Operation;

pub trait CircuitDefinition: WitnessRecord + Default + Clone + Send + Sync {
    const OPERATION: Operation;
    const PUBLIC_INPUTS: usize;
    const PRIVATE_INPUTS: usize;

    /// allocate variables in declaration order and append every check
    fn define(
        &self,
        cs: ConstraintSystemRef<Fr>,
        params: &Params,
    ) -> std::result::Result<(), SynthesisError>;

    /// build from ordered public / private values, checking arity first
    fn from_inputs(public: &[Fr], private: &[Fr]) -> Result<Self> {
        if public.len() != Self::PUBLIC_INPUTS || private.len() != Self::PRIVATE_INPUTS {
            return Err(Error::MalformedInput(format!(
                "{} expects {} public and {} private inputs, got {} and {}",
                Self::OPERATION,
                Self::PUBLIC_INPUTS,
                Self::PRIVATE_INPUTS,
                public.len(),
                private.len()
            )));
        }

        let mut public_reader = FieldReader::new(public);
        let mut private_reader = FieldReader::new(private);
        let circuit = Self::read(&mut public_reader, &mut private_reader)?;
        public_reader.finish()?;
        private_reader.finish()?;
        Ok(circuit)
    }

    /// public inputs in verifier order
    fn public_inputs(&self) -> Vec<Fr> {
        self.inputs().0
    }

    fn private_inputs(&self) -> Vec<Fr> {
        self.inputs().1
    }

    fn inputs(&self) -> (Vec<Fr>, Vec<Fr>) {
        let mut public = Vec::with_capacity(Self::PUBLIC_INPUTS);
        let mut private = Vec::with_capacity(Self::PRIVATE_INPUTS);
        self.write(&mut public, &mut private);
        (public, private)
    }
}

/// statement bound to params, consumed by setup and proving
pub struct Synthesizer<'a, C> {
    params: &'a Params,
    circuit: C,
}

impl<'a, C: CircuitDefinition> Synthesizer<'a, C> {
    pub fn new(params: &'a Params, circuit: C) -> Self {
        Self { params, circuit }
    }

    /// all-zero witness of the right shape, for key generation
    pub fn blank(params: &'a Params) -> Self {
        Self::new(params, C::default())
    }
}

impl<'a, C: CircuitDefinition> ConstraintSynthesizer<Fr> for Synthesizer<'a, C> {
    fn generate_constraints(
        self,
        cs: ConstraintSystemRef<Fr>,
    ) -> std::result::Result<(), SynthesisError> {
        self.circuit.define(cs, self.params)
    }
}
