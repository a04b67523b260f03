//! ProStore CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! ps-cli migrate
//!
//! # Load the sample catalog
//! ps-cli seed products
//!
//! # Give a user the admin role
//! ps-cli admin set-role -e admin@example.com -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed products` - Insert products from a YAML file
//! - `admin set-role` - Change a user's role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(author, version, about = "ProStore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage user roles
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert catalog products from a YAML file
    Products {
        /// Path to the products file
        #[arg(short, long, default_value = commands::seed::DEFAULT_PRODUCTS_FILE)]
        file: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Set the role of an existing user
    SetRole {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// Role (`user`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::SetRole { email, role } => {
                commands::admin::set_role(&email, &role).await?;
            }
        },
    }
    Ok(())
}
