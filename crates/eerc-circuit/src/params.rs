use crate::babyjub::CurveParams;
use crate::error::Result;
use crate::poseidon::PoseidonParams;

/// protocol constants shared by every statement
///
/// built once and borrowed by circuits, checks and the native helpers.
#[derive(Clone, Debug)]
pub struct Params {
    pub curve: CurveParams,
    /// three-input hash and the ciphertext sponge
    pub poseidon_t4: PoseidonParams,
    /// nullifier hash (chain id + four ciphertext elements)
    pub poseidon_t6: PoseidonParams,
}

impl Params {
    pub fn new() -> Result<Self> {
        Ok(Self {
            curve: CurveParams::babyjub(),
            poseidon_t4: PoseidonParams::for_width(4)?,
            poseidon_t6: PoseidonParams::for_width(6)?,
        })
    }
}
