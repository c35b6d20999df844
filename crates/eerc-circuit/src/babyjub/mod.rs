//! babyjubjub group adapter
//!
//! twisted edwards curve a*x^2 + y^2 = 1 + d*x^2*y^2 over the bn254 scalar
//! field, with the protocol base point `Base8` generating the prime order
//! subgroup. the same base point is used for key derivation, value encoding,
//! elgamal ephemeral keys and poseidon-ciphertext authentication keys.
//!
//! values are never recovered from points: equality is always checked against
//! an independently computed `value * Base8`.

pub mod curve;
pub mod gadget;

use ark_ec::{twisted_edwards::TECurveConfig, AffineRepr, CurveGroup};
use ark_ff::{Field, One, PrimeField, Zero};

use crate::field::Fr;
use crate::types::{ElGamalCiphertext, Point};

pub use curve::{BabyJubAffine, BabyJubConfig, BASE_POINT_ORDER};
pub use gadget::{BabyJubGadget, PointVar};

use curve::{BASE8_X, BASE8_Y};

/// immutable curve configuration, built once and passed by reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParams {
    /// edwards coefficient a
    pub a: Fr,
    /// edwards coefficient d
    pub d: Fr,
    /// distinguished base point (Base8)
    pub base: Point,
    /// order of the subgroup generated by `base`
    pub order: Fr,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::babyjub()
    }
}

impl CurveParams {
    /// babyjubjub as deployed by the protocol contracts
    pub fn babyjub() -> Self {
        Self {
            a: <BabyJubConfig as TECurveConfig>::COEFF_A,
            d: <BabyJubConfig as TECurveConfig>::COEFF_D,
            base: Point::new(BASE8_X, BASE8_Y),
            order: BASE_POINT_ORDER,
        }
    }

    /// largest valid private key / randomness / encoded value
    pub fn max_scalar(&self) -> Fr {
        self.order - Fr::one()
    }

    /// true when `scalar` is within `0..=order-1`
    pub fn is_valid_scalar(&self, scalar: &Fr) -> bool {
        scalar.into_bigint() < self.order.into_bigint()
    }

    pub fn is_on_curve(&self, p: &Point) -> bool {
        let x2 = p.x.square();
        let y2 = p.y.square();
        self.a * x2 + y2 == Fr::one() + self.d * x2 * y2
    }

    /// scalar * base
    pub fn mul_base(&self, scalar: &Fr) -> Point {
        mul_scalar(&self.base, scalar)
    }

    /// public key for a private key
    pub fn derive_public_key(&self, sk: &Fr) -> Point {
        self.mul_base(sk)
    }

    /// encode a plaintext amount as `value * Base8`
    pub fn encode_value(&self, value: u64) -> Point {
        self.mul_base(&Fr::from(value))
    }

    /// elgamal: c1 = r * Base8, c2 = r * pk + msg
    pub fn elgamal_encrypt(&self, pk: &Point, msg: &Point, r: &Fr) -> ElGamalCiphertext {
        let c1 = self.mul_base(r);
        let c2 = add(&mul_scalar(pk, r), msg);
        ElGamalCiphertext { c1, c2 }
    }

    /// elgamal: msg = c2 - sk * c1
    pub fn elgamal_decrypt(&self, ct: &ElGamalCiphertext, sk: &Fr) -> Point {
        let shared = mul_scalar(&ct.c1, sk);
        add(&ct.c2, &neg(&shared))
    }
}

/// scalar multiplication by the canonical integer of `scalar`
///
/// the scalar is not reduced modulo the subgroup order, matching the
/// bit-decomposition used in-circuit.
pub fn mul_scalar(point: &Point, scalar: &Fr) -> Point {
    point
        .to_affine()
        .mul_bigint(scalar.into_bigint())
        .into_affine()
        .into()
}

pub fn add(a: &Point, b: &Point) -> Point {
    (a.to_affine().into_group() + b.to_affine())
        .into_affine()
        .into()
}

pub fn neg(p: &Point) -> Point {
    Point::new(-p.x, p.y)
}

impl Point {
    /// neutral element (0, 1)
    pub fn identity() -> Self {
        Self::new(Fr::zero(), Fr::one())
    }

    pub(crate) fn to_affine(self) -> BabyJubAffine {
        BabyJubAffine::new_unchecked(self.x, self.y)
    }
}

impl From<BabyJubAffine> for Point {
    fn from(p: BabyJubAffine) -> Self {
        if p.is_zero() {
            return Point::identity();
        }
        Point::new(p.x, p.y)
    }
}
