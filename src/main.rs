use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};

use gridlogin::auth::{LoginOrchestrator, PortalClient};
use gridlogin::config::ResolvedConfig;
use gridlogin::models::{Account, Matrix, MATRIX_COLUMNS, MATRIX_ROWS};
use gridlogin::report::CliReporter;
use gridlogin::storage::{AccountStore, JsonFileStore, MatrixStore};

#[derive(Parser)]
#[command(name = "gridlogin")]
#[command(about = "Automated login for the GetAccess portal with matrix OTP")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "gridlogin.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one login attempt with the stored account and matrix
    Login,
    /// Interactively store the account and answer matrix
    Configure,
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = ResolvedConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Login => login(&config).await,
        Command::Configure => configure(&config).await,
        Command::Config => {
            println!("Config file: {}", cli.config.display());
            println!("Data directory: {}", config.data_dir.display());
            println!("Portal base URL: {}", config.portal_base_url);
            Ok(())
        }
    }
}

async fn login(config: &ResolvedConfig) -> Result<()> {
    let store = Arc::new(JsonFileStore::new(&config.data_dir));
    let client = PortalClient::with_base_url(&config.portal_base_url)?;
    let orchestrator = LoginOrchestrator::new(
        store.clone(),
        store,
        client,
        Arc::new(CliReporter),
    );

    if orchestrator.run().await.is_err() {
        // The reporter has already described the failure.
        std::process::exit(1);
    }
    Ok(())
}

async fn configure(config: &ResolvedConfig) -> Result<()> {
    let store = JsonFileStore::new(&config.data_dir);

    let id: String = Input::new().with_prompt("Account id").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    AccountStore::set(&store, &Account::new(id, password)).await?;

    println!("Enter the answer matrix column by column (columns A-J, {MATRIX_ROWS} characters each, top to bottom).");
    let mut cells = Vec::with_capacity(MATRIX_COLUMNS);
    for letter in 'A'..='J' {
        let column: String = Input::new()
            .with_prompt(format!("Column {letter}"))
            .validate_with(|input: &String| -> Result<(), String> {
                if input.chars().count() == MATRIX_ROWS {
                    Ok(())
                } else {
                    Err(format!("enter exactly {MATRIX_ROWS} characters"))
                }
            })
            .interact_text()?;
        cells.push(column.chars().map(String::from).collect());
    }
    MatrixStore::set(&store, &Matrix::new(cells)).await?;

    println!("Saved account and matrix to {}", config.data_dir.display());
    Ok(())
}
