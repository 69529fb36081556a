//! Subcommand handling.

use std::path::Path;
use std::sync::Arc;

use sqlauth_core::{
    generate_bcrypt_salt, generate_salt, AlgorithmRegistry, AuthOptions, Credentials,
    PasswordStrategy, Principal, SqlAuthenticator,
};
use sqlauth_sqlite::SqliteExecutor;

use crate::{Args, Command};

type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Text to print and whether the command succeeded.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }
}

/// Execute a parsed command line.
pub async fn run(args: Args) -> CommandResult<Outcome> {
    let options = load_options(args.config.as_deref())?;

    match args.command {
        Command::Hash {
            password,
            salt,
            algorithm,
            encoder,
        } => {
            let mut options = options;
            if let Some(algorithm) = algorithm {
                options.password_algorithm = algorithm;
            }
            if let Some(encoder) = encoder {
                options.password_encoder = encoder;
            }
            let strategy = options.password_strategy()?;
            Ok(Outcome::ok(strategy.compute(&password, salt.as_deref())?))
        }

        Command::GenSalt { bcrypt, cost } => {
            if bcrypt {
                Ok(Outcome::ok(generate_bcrypt_salt(cost)))
            } else {
                Ok(Outcome::ok(generate_salt()))
            }
        }

        Command::Algorithms => Ok(Outcome::ok(
            AlgorithmRegistry::global().names().join("\n"),
        )),

        Command::Authenticate {
            database,
            username,
            password,
        } => {
            let principal = authenticate(&database, options, &username, &password).await?;
            tracing::info!(username = principal.username(), "authenticated");
            Ok(Outcome::ok(format!("authenticated {}", principal.username())))
        }

        Command::Authorize {
            database,
            username,
            password,
            capabilities,
        } => {
            let principal = authenticate(&database, options, &username, &password).await?;
            authorize(&principal, &capabilities).await
        }
    }
}

fn load_options(path: Option<&Path>) -> CommandResult<AuthOptions> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
            Ok(AuthOptions::from_json(&json)?)
        }
        None => Ok(AuthOptions::default()),
    }
}

async fn authenticate(
    database: &Path,
    options: AuthOptions,
    username: &str,
    password: &str,
) -> CommandResult<Principal> {
    let executor = Arc::new(SqliteExecutor::open_existing(database)?);
    let authenticator = SqlAuthenticator::from_options(executor, options)?;
    Ok(authenticator
        .authenticate(&Credentials::new(username, password))
        .await?)
}

async fn authorize(principal: &Principal, capabilities: &[String]) -> CommandResult<Outcome> {
    let mut lines = Vec::with_capacity(capabilities.len());
    let mut success = true;

    for capability in capabilities {
        let granted = principal.is_authorized(capability).await?;
        success &= granted;
        lines.push(format!(
            "{}: {}",
            capability,
            if granted { "granted" } else { "denied" }
        ));
    }

    Ok(Outcome {
        output: lines.join("\n"),
        success,
    })
}
