//! groth16 over bn254: key generation, witness precheck, proving,
//! verification and key persistence

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSystem, SynthesisError, SynthesisMode};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::circuits::{CircuitDefinition, Synthesizer};
use crate::error::{Error, Result};
use crate::field::{parse_field, to_decimal, Fr};
use crate::params::Params;
use crate::witness::Operation;

/// circuit-specific keys from a blank witness of the statement's shape
pub fn setup<C: CircuitDefinition, R: RngCore + CryptoRng>(
    params: &Params,
    rng: &mut R,
) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>)> {
    info!("running groth16 setup for {}", C::OPERATION);
    let start = Instant::now();

    let keys = Groth16::<Bn254>::circuit_specific_setup(Synthesizer::<C>::blank(params), rng)?;

    info!(
        "{} keys generated in {:.2}s",
        C::OPERATION,
        start.elapsed().as_secs_f64()
    );
    Ok(keys)
}

/// synthesize the witness and report the first failing constraint
pub fn check_satisfied<C: CircuitDefinition>(params: &Params, circuit: &C) -> Result<()> {
    let cs = ConstraintSystem::<Fr>::new_ref();

    match circuit.define(cs.clone(), params) {
        Ok(()) => {}
        Err(SynthesisError::Unsatisfiable) | Err(SynthesisError::DivisionByZero) => {
            warn!("{} witness rejected during synthesis", C::OPERATION);
            return Err(Error::UnsatisfiableWitness {
                operation: C::OPERATION,
                constraint: "synthesis".into(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    debug!(
        "{}: {} constraints, {} public inputs, {} witnesses",
        C::OPERATION,
        cs.num_constraints(),
        cs.num_instance_variables() - 1,
        cs.num_witness_variables()
    );

    if !cs.is_satisfied()? {
        let constraint = cs
            .which_is_unsatisfied()?
            .unwrap_or_else(|| "unknown".into());
        warn!(
            "{} witness is unsatisfiable at {}",
            C::OPERATION,
            constraint
        );
        return Err(Error::UnsatisfiableWitness {
            operation: C::OPERATION,
            constraint,
        });
    }
    Ok(())
}

/// prove a satisfied witness; unsatisfiable witnesses never reach groth16
pub fn prove<C: CircuitDefinition, R: RngCore + CryptoRng>(
    params: &Params,
    pk: &ProvingKey<Bn254>,
    circuit: &C,
    rng: &mut R,
) -> Result<Proof<Bn254>> {
    check_satisfied(params, circuit)?;

    info!("generating {} proof", C::OPERATION);
    let start = Instant::now();

    let proof = Groth16::<Bn254>::prove(pk, Synthesizer::new(params, circuit.clone()), rng)?;

    info!(
        "{} proof generated in {:.2}s",
        C::OPERATION,
        start.elapsed().as_secs_f64()
    );
    Ok(proof)
}

pub fn verify<C: CircuitDefinition>(
    vk: &VerifyingKey<Bn254>,
    public_inputs: &[Fr],
    proof: &Proof<Bn254>,
) -> Result<bool> {
    if public_inputs.len() != C::PUBLIC_INPUTS {
        return Err(Error::MalformedInput(format!(
            "{} expects {} public inputs, got {}",
            C::OPERATION,
            C::PUBLIC_INPUTS,
            public_inputs.len()
        )));
    }
    if vk.gamma_abc_g1.len() != public_inputs.len() + 1 {
        return Err(Error::MalformedInput(format!(
            "verifying key is for {} public inputs, not {}",
            vk.gamma_abc_g1.len().saturating_sub(1),
            C::OPERATION
        )));
    }

    let pvk = Groth16::<Bn254>::process_vk(vk)?;
    let valid = Groth16::<Bn254>::verify_with_processed_vk(&pvk, public_inputs, proof)?;
    debug!("{} proof valid: {}", C::OPERATION, valid);
    Ok(valid)
}

/// r1cs size of a statement
pub fn constraint_count<C: CircuitDefinition>(params: &Params) -> Result<usize> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_mode(SynthesisMode::Setup);
    C::default().define(cs.clone(), params)?;
    Ok(cs.num_constraints())
}

/// proof as decimal strings:
/// `[a.x, a.y, b.x.c1, b.x.c0, b.y.c1, b.y.c0, c.x, c.y]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOutput {
    pub proof: Vec<String>,
}

impl ProofOutput {
    pub fn from_proof(proof: &Proof<Bn254>) -> Self {
        let mut out = Vec::with_capacity(8);
        push_g1(&proof.a, &mut out);
        push_g2(&proof.b, &mut out);
        push_g1(&proof.c, &mut out);
        Self { proof: out }
    }

    pub fn to_proof(&self) -> Result<Proof<Bn254>> {
        if self.proof.len() != 8 {
            return Err(Error::MalformedInput(format!(
                "proof must have 8 elements, got {}",
                self.proof.len()
            )));
        }
        let f = self
            .proof
            .iter()
            .map(|s| parse_field::<Fq>(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(Proof {
            a: g1_from(f[0], f[1])?,
            b: g2_from(Fq2::new(f[3], f[2]), Fq2::new(f[5], f[4]))?,
            c: g1_from(f[6], f[7])?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_json()?.as_bytes())?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

fn push_g1(p: &G1Affine, out: &mut Vec<String>) {
    match p.xy() {
        Some((x, y)) => out.extend([to_decimal(x), to_decimal(y)]),
        None => out.extend(["0".to_string(), "0".to_string()]),
    }
}

fn push_g2(p: &G2Affine, out: &mut Vec<String>) {
    match p.xy() {
        Some((x, y)) => out.extend([
            to_decimal(&x.c1),
            to_decimal(&x.c0),
            to_decimal(&y.c1),
            to_decimal(&y.c0),
        ]),
        None => out.extend(std::iter::repeat("0".to_string()).take(4)),
    }
}

fn g1_from(x: Fq, y: Fq) -> Result<G1Affine> {
    if x == Fq::from(0u64) && y == Fq::from(0u64) {
        return Ok(G1Affine::zero());
    }
    let p = G1Affine::new_unchecked(x, y);
    if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::MalformedInput("proof point not on bn254 g1".into()));
    }
    Ok(p)
}

fn g2_from(x: Fq2, y: Fq2) -> Result<G2Affine> {
    if x == Fq2::from(0u64) && y == Fq2::from(0u64) {
        return Ok(G2Affine::zero());
    }
    let p = G2Affine::new_unchecked(x, y);
    if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::MalformedInput("proof point not on bn254 g2".into()));
    }
    Ok(p)
}

/// `<dir>/<OPERATION>.pk` and `<dir>/<OPERATION>.vk`
pub fn key_paths(dir: &Path, operation: Operation) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{}.pk", operation)),
        dir.join(format!("{}.vk", operation)),
    )
}

pub fn save_keys(
    dir: &Path,
    operation: Operation,
    pk: &ProvingKey<Bn254>,
    vk: &VerifyingKey<Bn254>,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let (pk_path, vk_path) = key_paths(dir, operation);
    save_proving_key(&pk_path, pk)?;
    save_verifying_key(&vk_path, vk)?;
    info!("saved {} keys to {}", operation, dir.display());
    Ok((pk_path, vk_path))
}

pub fn save_proving_key(path: &Path, pk: &ProvingKey<Bn254>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    pk.serialize_uncompressed(&mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn save_verifying_key(path: &Path, vk: &VerifyingKey<Bn254>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    vk.serialize_uncompressed(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// loads without subgroup checks
pub fn load_proving_key(path: &Path) -> Result<ProvingKey<Bn254>> {
    debug!("loading proving key from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(ProvingKey::deserialize_uncompressed_unchecked(reader)?)
}

pub fn load_verifying_key(path: &Path) -> Result<VerifyingKey<Bn254>> {
    debug!("loading verifying key from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(VerifyingKey::deserialize_uncompressed_unchecked(reader)?)
}
