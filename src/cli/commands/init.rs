use clap::Args;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{seed, DatabaseManager};

#[derive(Args)]
pub struct InitArgs {
    #[arg(long, help = "Admin username to seed (defaults to ADMIN_USERNAME or 'admin')")]
    pub admin_username: Option<String>,

    #[arg(long, help = "Admin password to seed (defaults to ADMIN_PASSWORD or 'password')")]
    pub admin_password: Option<String>,
}

pub async fn handle(args: InitArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut seed_config = config.seed.clone();
    if let Some(username) = args.admin_username {
        seed_config.admin_username = username;
    }
    if let Some(password) = args.admin_password {
        seed_config.admin_password = password;
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    let admin_created = seed::seed_admin_user(&pool, &seed_config).await?;
    let assets_created = seed::seed_assets(&pool).await?;
    pool.close().await;

    output_success(
        &output_format,
        &format!("Initialized database {}", config.database.path.display()),
        Some(json!({
            "admin_created": admin_created,
            "assets_created": assets_created,
        })),
    )
}
