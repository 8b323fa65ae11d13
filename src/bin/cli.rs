use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use dusys::cli::{
    AdminAccount, TokenRequest, create_admin, init_roles, issue_auto_login_token, render_config,
};
use dusys::identity::{IdentityStore, PgIdentityStore};
use dusys_config::Settings;
use dusys_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "dusys-cli")]
#[command(about = "Dusys CLI - Administrative tools for the Dusys gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and create the built-in roles
    Init,
    /// Create an administrator account
    CreateAdmin {
        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Print an auto-login token signed with the configured secret
    IssueToken {
        #[arg(short = 'u', long)]
        username: String,

        #[arg(short = 'e', long)]
        email: String,

        /// JSON literal or plain string
        #[arg(short = 'c', long)]
        company_id: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Token lifetime in seconds; omit for a token without expiry
        #[arg(long)]
        ttl: Option<i64>,
    },
    /// Print the effective configuration with secrets masked
    ShowConfig,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dusys=info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Init => {
            let identity = connect(&settings).await?;
            let roles = init_roles(identity.as_ref(), &settings.auth)
                .await
                .map_err(|e| e.error)?;
            println!("✅ {} roles ready", roles.len());
        }
        Commands::CreateAdmin {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let account = AdminAccount {
                username: value_or_prompt(username, "Username")?,
                email: value_or_prompt(email, "Email address")?,
                first_name: value_or_prompt(first_name, "First name")?,
                last_name: value_or_prompt(last_name, "Last name")?,
                password: match password {
                    Some(password) => password,
                    None => Password::new()
                        .with_prompt("Password")
                        .with_confirmation("Confirm password", "Passwords don't match")
                        .interact()?,
                },
            };

            let identity = connect(&settings).await?;
            let user = create_admin(identity.as_ref(), &settings.auth, account)
                .await
                .map_err(|e| e.error)?;

            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", user.username);
            println!("   Email: {}", user.email);
            println!("   Name: {}", user.full_name());
        }
        Commands::IssueToken {
            username,
            email,
            company_id,
            first_name,
            last_name,
            ttl,
        } => {
            let token = issue_auto_login_token(
                &settings,
                TokenRequest {
                    username,
                    email,
                    company_id,
                    first_name,
                    last_name,
                    ttl_secs: ttl,
                },
            )?;
            println!("{}", token);
        }
        Commands::ShowConfig => {
            print!("{}", render_config(&settings)?);
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> anyhow::Result<Arc<dyn IdentityStore>> {
    let pool = init_db_pool(&settings.database)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool).await?;
    Ok(Arc::new(PgIdentityStore::new(pool)))
}

fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}
