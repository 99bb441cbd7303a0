use clap::Subcommand;
use serde_json::json;

use crate::auth::CredentialStore;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Add a user who can request tokens")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, default_value = "admin", help = "Role recorded for the user")]
        role: String,
    },
}

pub async fn handle(cmd: UserCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { username, password, role } => {
            let username = username.trim().to_string();
            let password = password.trim().to_string();
            if username.is_empty() || password.is_empty() {
                anyhow::bail!("username and password must not be empty");
            }

            let pool = DatabaseManager::connect(&config.database).await?;
            let user = CredentialStore::new(pool.clone())
                .create_user(&username, &password, &role)
                .await?;
            pool.close().await;

            output_success(
                &output_format,
                &format!("Created user {}", user.username),
                Some(json!({ "user": user })),
            )
        }
    }
}
