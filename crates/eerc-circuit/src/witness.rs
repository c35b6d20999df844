//! operation selector and the json witness exchanged with contract tooling

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuits::{
    CircuitDefinition, MintCircuit, RegistrationCircuit, TransferCircuit, WithdrawCircuit,
};
use crate::error::{Error, Result};
use crate::field::{parse_decimals, to_decimal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Register,
    Mint,
    Transfer,
    Withdraw,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Register,
        Operation::Mint,
        Operation::Transfer,
        Operation::Withdraw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Register => "REGISTER",
            Operation::Mint => "MINT",
            Operation::Transfer => "TRANSFER",
            Operation::Withdraw => "WITHDRAW",
        }
    }

    /// (public, private) input counts
    pub fn arity(&self) -> (usize, usize) {
        match self {
            Operation::Register => (
                RegistrationCircuit::PUBLIC_INPUTS,
                RegistrationCircuit::PRIVATE_INPUTS,
            ),
            Operation::Mint => (MintCircuit::PUBLIC_INPUTS, MintCircuit::PRIVATE_INPUTS),
            Operation::Transfer => (
                TransferCircuit::PUBLIC_INPUTS,
                TransferCircuit::PRIVATE_INPUTS,
            ),
            Operation::Withdraw => (
                WithdrawCircuit::PUBLIC_INPUTS,
                WithdrawCircuit::PRIVATE_INPUTS,
            ),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::MalformedInput(format!(
                    "unknown operation '{}', expected one of REGISTER, MINT, TRANSFER, WITHDRAW",
                    s
                ))
            })
    }
}

/// `{"publicInputs": [...], "privateInputs": [...]}` with decimal strings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessInput {
    pub public_inputs: Vec<String>,
    pub private_inputs: Vec<String>,
}

impl WitnessInput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_circuit<C: CircuitDefinition>(circuit: &C) -> Self {
        let (public, private) = circuit.inputs();
        Self {
            public_inputs: public.iter().map(to_decimal).collect(),
            private_inputs: private.iter().map(to_decimal).collect(),
        }
    }

    /// decode into a statement; arity and field range are checked before any
    /// value is assigned
    pub fn parse<C: CircuitDefinition>(&self) -> Result<C> {
        if self.public_inputs.len() != C::PUBLIC_INPUTS
            || self.private_inputs.len() != C::PRIVATE_INPUTS
        {
            return Err(Error::MalformedInput(format!(
                "{} expects {} public and {} private inputs, got {} and {}",
                C::OPERATION,
                C::PUBLIC_INPUTS,
                C::PRIVATE_INPUTS,
                self.public_inputs.len(),
                self.private_inputs.len()
            )));
        }

        let public = parse_decimals(&self.public_inputs)?;
        let private = parse_decimals(&self.private_inputs)?;
        C::from_inputs(&public, &private)
    }

    /// public inputs only, for verification
    pub fn public_fields<C: CircuitDefinition>(&self) -> Result<Vec<crate::field::Fr>> {
        if self.public_inputs.len() != C::PUBLIC_INPUTS {
            return Err(Error::MalformedInput(format!(
                "{} expects {} public inputs, got {}",
                C::OPERATION,
                C::PUBLIC_INPUTS,
                self.public_inputs.len()
            )));
        }
        parse_decimals(&self.public_inputs)
    }
}
