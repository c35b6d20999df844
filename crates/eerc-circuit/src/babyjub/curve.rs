//! babyjubjub in the circomlib parameterization
//!
//! a = 168700, d = 168696 with `Base8` as generator. this is the form the
//! protocol contracts and circom circuits use; arkworks' `ed_on_bn254` is the
//! same group under a rescaled (a = 1) model, so its coordinates differ.

use ark_ec::{
    models::CurveConfig,
    twisted_edwards::{Affine, MontCurveConfig, TECurveConfig},
};
use ark_ff::MontFp;

use crate::field::Fr;

/// babyjubjub affine point (native arithmetic)
pub type BabyJubAffine = Affine<BabyJubConfig>;

/// order of the subgroup generated by Base8
pub const BASE_POINT_ORDER: Fr =
    MontFp!("2736030358979909402780800718157159386076813972158567259200215660948447373041");

pub(crate) const BASE8_X: Fr =
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553");
pub(crate) const BASE8_Y: Fr =
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BabyJubConfig;

impl CurveConfig for BabyJubConfig {
    type BaseField = Fr;
    /// prime field of order `BASE_POINT_ORDER`
    type ScalarField = ark_ed_on_bn254::Fr;

    const COFACTOR: &'static [u64] = &[8];

    /// 8^-1 mod BASE_POINT_ORDER
    const COFACTOR_INV: ark_ed_on_bn254::Fr =
        MontFp!("2394026564107420727433200628387514462817212225638746351800188703329891451411");
}

impl TECurveConfig for BabyJubConfig {
    const COEFF_A: Fr = MontFp!("168700");
    const COEFF_D: Fr = MontFp!("168696");

    const GENERATOR: BabyJubAffine = BabyJubAffine::new_unchecked(BASE8_X, BASE8_Y);

    type MontCurveConfig = BabyJubConfig;
}

/// birationally equivalent montgomery curve y^2 = x^3 + 168698 x^2 + x
impl MontCurveConfig for BabyJubConfig {
    const COEFF_A: Fr = MontFp!("168698");
    const COEFF_B: Fr = MontFp!("1");

    type TECurveConfig = BabyJubConfig;
}
