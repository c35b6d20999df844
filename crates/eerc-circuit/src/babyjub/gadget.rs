//! babyjubjub operations as r1cs constraints

use ark_ff::One;
use ark_r1cs_std::{
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    groups::{curves::twisted_edwards::AffineVar, CurveVar},
    ToBitsGadget,
};
use ark_relations::r1cs::SynthesisError;

use super::{BabyJubConfig, CurveParams};
use crate::field::Fr;

/// affine babyjubjub point with coordinates in the circuit field
pub type PointVar = AffineVar<BabyJubConfig, FpVar<Fr>>;

/// group operations over circuit variables
///
/// points are built from raw coordinates without the subgroup checks that
/// `AllocVar` would add; membership is asserted explicitly with
/// `assert_on_curve` wherever a point enters a relation.
pub struct BabyJubGadget<'a> {
    params: &'a CurveParams,
    base: PointVar,
}

impl<'a> BabyJubGadget<'a> {
    pub fn new(params: &'a CurveParams) -> Self {
        let base = PointVar::new(
            FpVar::constant(params.base.x),
            FpVar::constant(params.base.y),
        );
        Self { params, base }
    }

    pub fn params(&self) -> &CurveParams {
        self.params
    }

    /// order - 1 as a circuit constant
    pub fn max_scalar(&self) -> FpVar<Fr> {
        FpVar::constant(self.params.max_scalar())
    }

    /// enforce a*x^2 + y^2 = 1 + d*x^2*y^2
    pub fn assert_on_curve(&self, p: &PointVar) -> Result<(), SynthesisError> {
        let x2 = p.x.square()?;
        let y2 = p.y.square()?;
        let lhs = &x2 * self.params.a + &y2;
        let rhs = (x2 * &y2) * self.params.d + Fr::one();
        lhs.enforce_equal(&rhs)
    }

    /// scalar * Base8
    pub fn mul_with_base_point(&self, scalar: &FpVar<Fr>) -> Result<PointVar, SynthesisError> {
        let bits = scalar.to_bits_le()?;
        self.base.scalar_mul_le(bits.iter())
    }

    /// scalar * point, result asserted on-curve
    pub fn mul_with_scalar(
        &self,
        point: &PointVar,
        scalar: &FpVar<Fr>,
    ) -> Result<PointVar, SynthesisError> {
        let bits = scalar.to_bits_le()?;
        let result = point.scalar_mul_le(bits.iter())?;
        self.assert_on_curve(&result)?;
        Ok(result)
    }

    /// both points on-curve and coordinate-wise equal
    pub fn assert_point_equal(&self, p1: &PointVar, p2: &PointVar) -> Result<(), SynthesisError> {
        self.assert_on_curve(p1)?;
        self.assert_on_curve(p2)?;
        p1.x.enforce_equal(&p2.x)?;
        p1.y.enforce_equal(&p2.y)
    }

    /// (r * Base8, r * pk + msg)
    pub fn elgamal_encrypt(
        &self,
        public_key: &PointVar,
        msg: &PointVar,
        random: &FpVar<Fr>,
    ) -> Result<(PointVar, PointVar), SynthesisError> {
        let c1 = self.mul_with_base_point(random)?;
        let shared = self.mul_with_scalar(public_key, random)?;
        let c2 = shared + msg;
        Ok((c1, c2))
    }

    /// c2 - sk * c1
    pub fn elgamal_decrypt(
        &self,
        c1: &PointVar,
        c2: &PointVar,
        secret_key: &FpVar<Fr>,
    ) -> Result<PointVar, SynthesisError> {
        let shared = self.mul_with_scalar(c1, secret_key)?;
        let inverse = shared.negate()?;
        self.assert_on_curve(&inverse)?;

        let decrypted = inverse + c2;
        self.assert_on_curve(&decrypted)?;
        Ok(decrypted)
    }
}
