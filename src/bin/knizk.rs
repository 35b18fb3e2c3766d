use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use knizk::{Challenge, Credential, Knizk, KnizkConfig, Proof};
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "knizk")]
#[command(about = "Knizk zero-knowledge proof of secret knowledge", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a credential for a secret
    Credential {
        #[arg(short, long, env = "KNIZK_SECRET")]
        secret: String,
    },

    /// Issue a challenge for a stored credential
    Challenge {
        #[arg(short, long, help = "Path to a credential JSON file")]
        credential: PathBuf,
    },

    /// Prove knowledge of a secret against a challenge
    Prove {
        #[arg(short, long, env = "KNIZK_SECRET")]
        secret: String,

        #[arg(short, long, help = "Path to a challenge JSON file")]
        challenge: PathBuf,
    },

    /// Verify a proof against a challenge
    Verify {
        #[arg(short, long, help = "Path to a proof JSON file")]
        proof: PathBuf,

        #[arg(short, long, help = "Path to a challenge JSON file")]
        challenge: PathBuf,

        #[arg(
            long,
            help = "Stored credential; the challenge's public point must match it"
        )]
        credential: Option<PathBuf>,
    },
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

fn run(knizk: &Knizk, command: Commands) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Credential { secret } => {
            let credential = knizk.credential_from_secret(secret)?;
            println!("{}", credential.to_json()?);
        }

        Commands::Challenge { credential } => {
            let credential = Credential::from_json(&read(&credential)?)?;
            let challenge = knizk.challenge_from_credential(&credential)?;
            println!("{}", challenge.to_json()?);
        }

        Commands::Prove { secret, challenge } => {
            let challenge = Challenge::from_json(&read(&challenge)?)?;
            let proof = knizk.proof_from_secret_and_challenge(secret, &challenge)?;
            println!("{}", proof.to_json()?);
        }

        Commands::Verify {
            proof,
            challenge,
            credential,
        } => {
            let proof = Proof::from_json(&read(&proof)?)?;
            let challenge = Challenge::from_json(&read(&challenge)?)?;

            if let Some(path) = credential {
                let stored = Credential::from_json(&read(&path)?)?;
                if stored.public_point() != challenge.public_point() {
                    warn!("challenge was not issued for the stored credential");
                    return Ok(false);
                }
            }

            match knizk.verifiable_from_proof_and_challenge(&proof, &challenge) {
                Ok(verified) => {
                    info!("proof verified");
                    println!("{}", verified.to_json()?);
                }
                Err(e) if e.is_verification_failure() => {
                    warn!("proof rejected");
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = KnizkConfig::from_env().unwrap_or_else(|e| {
        error!("Failed to load configuration: {e}");
        warn!("Using default configuration");
        KnizkConfig::default()
    });

    let knizk = match Knizk::new(config) {
        Ok(knizk) => knizk,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(&knizk, cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}
