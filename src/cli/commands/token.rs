use clap::Subcommand;
use serde_json::json;

use crate::api::TokenResponse;
use crate::auth::{CredentialStore, TokenService};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Verify credentials and print a bearer token")]
    Issue {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
    },
}

pub async fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { username, password } => {
            let (username, password) = (username.trim(), password.trim());
            let pool = DatabaseManager::connect(&config.database).await?;
            let valid = CredentialStore::new(pool.clone())
                .verify(username, password)
                .await?;
            pool.close().await;

            if !valid {
                anyhow::bail!("Invalid credentials");
            }

            let issued = TokenService::new(config.jwt.clone()).issue(username)?;
            match output_format {
                OutputFormat::Text => {
                    println!("{}", issued.access_token);
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    &output_format,
                    "Issued token",
                    Some(json!(TokenResponse::from(issued))),
                ),
            }
        }
    }
}
