use ark_r1cs_std::fields::{fp::FpVar, FieldVar};
use ark_relations::r1cs::SynthesisError;

use super::PoseidonParams;
use crate::field::Fr;

/// poseidon permutation as r1cs constraints
///
/// round constants are folded in as circuit constants; each s-box costs three
/// multiplication constraints.
pub struct PoseidonGadget<'a> {
    params: &'a PoseidonParams,
}

impl<'a> PoseidonGadget<'a> {
    pub fn new(params: &'a PoseidonParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PoseidonParams {
        self.params
    }

    pub fn permute(&self, state: &[FpVar<Fr>]) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
        let width = self.params.width;
        debug_assert_eq!(state.len(), width);

        let mut state = state.to_vec();
        for round in 0..self.params.rounds() {
            for (i, lane) in state.iter_mut().enumerate() {
                *lane += self.params.ark[round * width + i];
            }

            if self.params.is_full_round(round) {
                for lane in state.iter_mut() {
                    *lane = sbox(lane)?;
                }
            } else {
                state[0] = sbox(&state[0])?;
            }

            state = self
                .params
                .mds
                .iter()
                .map(|row| {
                    row.iter()
                        .zip(state.iter())
                        .fold(FpVar::zero(), |acc, (m, s)| acc + s * *m)
                })
                .collect();
        }
        Ok(state)
    }

    /// lane 0 of `permute([0, inputs..])`
    pub fn hash(&self, inputs: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
        debug_assert_eq!(inputs.len(), self.params.arity());

        let mut state = Vec::with_capacity(self.params.width);
        state.push(FpVar::zero());
        state.extend_from_slice(inputs);
        let out = self.permute(&state)?;
        Ok(out[0].clone())
    }
}

fn sbox(x: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let x2 = x.square()?;
    let x4 = x2.square()?;
    Ok(x4 * x)
}
