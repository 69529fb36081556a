//! sqlauth command-line tool
//!
//! Hashes passwords, generates salts and checks credentials and capabilities
//! against a SQLite credential database.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlauth_core::{PasswordEncoder, DEFAULT_BCRYPT_COST};

/// sqlauth command-line tool
#[derive(Parser, Debug)]
#[command(name = "sqlauth")]
#[command(version, about = "Password hashing and SQL credential checks")]
pub struct Args {
    /// JSON file with authenticator options (queries, role prefix, algorithm)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the stored form of a password
    Hash {
        /// Plaintext password
        password: String,

        /// Salt; required for HMAC and BCrypt algorithms
        #[arg(short, long)]
        salt: Option<String>,

        /// Algorithm name (overrides the config file)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Output encoder, hex or base64 (overrides the config file)
        #[arg(short, long)]
        encoder: Option<PasswordEncoder>,
    },

    /// Generate a random salt
    GenSalt {
        /// Generate a bcrypt salt instead of a base64 salt
        #[arg(long)]
        bcrypt: bool,

        /// Bcrypt cost factor
        #[arg(long, default_value_t = DEFAULT_BCRYPT_COST)]
        cost: u32,
    },

    /// List supported password algorithms
    Algorithms,

    /// Verify a username and password against a database
    Authenticate {
        /// SQLite database file
        #[arg(short, long)]
        database: PathBuf,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Authenticate, then check capabilities (`role:<name>` or a permission)
    Authorize {
        /// SQLite database file
        #[arg(short, long)]
        database: PathBuf,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// Capabilities to check
        #[arg(required = true)]
        capabilities: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlauth=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match commands::run(args).await {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if !outcome.success {
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
