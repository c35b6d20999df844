use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use eerc_circuit::{
    prover, sample, CircuitDefinition, MintCircuit, Operation, Params, ProofOutput,
    RegistrationCircuit, TransferCircuit, WithdrawCircuit, WitnessInput,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "eerc-prove")]
#[command(about = "groth16 prover for encrypted erc statements", long_about = None)]
struct Cli {
    /// Directory holding <OPERATION>.pk / <OPERATION>.vk
    #[arg(long, global = true, env = "EERC_KEYS_DIR", default_value = ".")]
    keys_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prove a witness and write the proof json
    Prove(ProveArgs),

    /// Verify a proof json against the public inputs of a witness
    Verify(VerifyArgs),

    /// Print a valid sample witness json
    Sample {
        /// REGISTER, MINT, TRANSFER or WITHDRAW
        #[arg(long)]
        operation: Operation,

        /// Seed for the deterministic sample values
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Generate and save proving / verifying keys
    Setup {
        #[arg(long)]
        operation: Operation,
    },

    /// Print constraint counts
    Info {
        /// Single operation (default: all)
        #[arg(long)]
        operation: Option<Operation>,
    },
}

#[derive(Args, Debug)]
struct ProveArgs {
    /// REGISTER, MINT, TRANSFER or WITHDRAW
    #[arg(long)]
    operation: Operation,

    /// Witness json: {"publicInputs": [...], "privateInputs": [...]}
    #[arg(long)]
    input: String,

    /// Proof output file
    #[arg(long, default_value = "output.json")]
    output: PathBuf,

    /// Proving key (default: <keys-dir>/<OPERATION>.pk)
    #[arg(long, conflicts_with = "new")]
    pk: Option<PathBuf>,

    /// Run a fresh setup instead of loading a proving key
    #[arg(long)]
    new: bool,

    /// Save the fresh keys to --keys-dir
    #[arg(long, requires = "new")]
    extract: bool,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    #[arg(long)]
    operation: Operation,

    /// Witness json; only publicInputs is read
    #[arg(long)]
    input: String,

    /// Proof json written by `prove`
    #[arg(long)]
    proof: PathBuf,

    /// Verifying key (default: <keys-dir>/<OPERATION>.vk)
    #[arg(long)]
    vk: Option<PathBuf>,
}

/// monomorphize `$f` for the statement selected by `$op`
macro_rules! with_circuit {
    ($op:expr, $f:ident ( $($arg:expr),* )) => {
        match $op {
            Operation::Register => $f::<RegistrationCircuit>($($arg),*),
            Operation::Mint => $f::<MintCircuit>($($arg),*),
            Operation::Transfer => $f::<TransferCircuit>($($arg),*),
            Operation::Withdraw => $f::<WithdrawCircuit>($($arg),*),
        }
    };
}

fn main() -> Result<()> {
    // stdout is reserved for json output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eerc_prove=info,eerc_circuit=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let params = Params::new()?;

    match &cli.command {
        Command::Prove(args) => {
            with_circuit!(args.operation, prove_cmd(&params, &cli.keys_dir, args))?;
        }
        Command::Verify(args) => {
            let valid = with_circuit!(args.operation, verify_cmd(&cli.keys_dir, args))?;
            if !valid {
                bail!("{} proof is invalid", args.operation);
            }
            info!("{} proof is valid", args.operation);
        }
        Command::Sample { operation, seed } => {
            let witness = sample::witness_for(&params, *operation, *seed)?;
            println!("{}", witness.to_json()?);
        }
        Command::Setup { operation } => {
            let (pk, vk) = with_circuit!(*operation, setup_cmd(&params, &cli.keys_dir))?;
            info!("proving key: {}", pk.display());
            info!("verifying key: {}", vk.display());
        }
        Command::Info { operation } => {
            let ops = match operation {
                Some(op) => vec![*op],
                None => Operation::ALL.to_vec(),
            };
            for op in ops {
                let (public, private) = op.arity();
                let constraints = with_circuit!(op, constraint_cmd(&params))?;
                println!(
                    "{:<8}  public {:>2}  private {:>2}  constraints {}",
                    op, public, private, constraints
                );
            }
        }
    }

    Ok(())
}

fn prove_cmd<C: CircuitDefinition>(
    params: &Params,
    keys_dir: &Path,
    args: &ProveArgs,
) -> Result<ProofOutput> {
    let witness = WitnessInput::from_json(&args.input)?;
    let circuit: C = witness.parse()?;
    let mut rng = rand::thread_rng();

    let pk = if args.new {
        warn!("generating throwaway {} keys, proofs only verify against this setup", C::OPERATION);
        let (pk, vk) = prover::setup::<C, _>(params, &mut rng)?;
        if args.extract {
            prover::save_keys(keys_dir, C::OPERATION, &pk, &vk)?;
        }
        pk
    } else {
        let path = args
            .pk
            .clone()
            .unwrap_or_else(|| prover::key_paths(keys_dir, C::OPERATION).0);
        prover::load_proving_key(&path)
            .with_context(|| format!("loading proving key {}", path.display()))?
    };

    let proof = prover::prove(params, &pk, &circuit, &mut rng)?;
    let output = ProofOutput::from_proof(&proof);
    output
        .write(&args.output)
        .with_context(|| format!("writing proof to {}", args.output.display()))?;

    info!("wrote {} proof to {}", C::OPERATION, args.output.display());
    Ok(output)
}

fn verify_cmd<C: CircuitDefinition>(keys_dir: &Path, args: &VerifyArgs) -> Result<bool> {
    let vk_path = args
        .vk
        .clone()
        .unwrap_or_else(|| prover::key_paths(keys_dir, C::OPERATION).1);
    let vk = prover::load_verifying_key(&vk_path)
        .with_context(|| format!("loading verifying key {}", vk_path.display()))?;

    let proof = ProofOutput::read(&args.proof)
        .with_context(|| format!("reading proof {}", args.proof.display()))?
        .to_proof()?;
    let public = WitnessInput::from_json(&args.input)?.public_fields::<C>()?;

    Ok(prover::verify::<C>(&vk, &public, &proof)?)
}

fn setup_cmd<C: CircuitDefinition>(params: &Params, keys_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let mut rng = rand::thread_rng();
    let (pk, vk) = prover::setup::<C, _>(params, &mut rng)?;
    Ok(prover::save_keys(keys_dir, C::OPERATION, &pk, &vk)?)
}

fn constraint_cmd<C: CircuitDefinition>(params: &Params) -> Result<usize> {
    Ok(prover::constraint_count::<C>(params)?)
}
