use blogshare::config::Config;
use blogshare::models::db_operations::{auth_db_operations, SupabaseClient};
use blogshare::setup::db_setup::{self, CheckOutcome};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for preparing the hosted posts table and admin account.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Print the SQL for the posts table and its access policies.
    Schema,
    /// Read the posts table once and report what the front end would show.
    Check,
    /// Insert the built-in fallback posts into the table.
    Seed {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// Register an admin account with the auth service.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

fn connect(config: &Config) -> Result<SupabaseClient, String> {
    let creds = config.backend.as_ref().ok_or_else(|| {
        "No backend credentials resolved. Set SUPABASE_URL and SUPABASE_ANON_KEY in your .env file.".to_string()
    })?;
    SupabaseClient::new(creds, config.http_timeout_secs).map_err(|e| format!("Could not build backend client: {}", e))
}

async fn run(cli: Cli, config: Config) -> Result<(), String> {
    match cli.command {
        Commands::Db { action: DbAction::Schema } => {
            println!("{}", db_setup::POSTS_SCHEMA_SQL);
        }
        Commands::Db { action: DbAction::Check } => {
            let client = match &config.backend {
                Some(_) => Some(connect(&config)?),
                None => None,
            };
            match db_setup::check_connection(client.as_ref()).await {
                Ok(CheckOutcome::Live(n)) => println!("✅ Backend reachable at {}: {} post(s).", client_base(&client), n),
                Ok(CheckOutcome::Fallback(n)) => {
                    println!("ℹ️ No rows available; the site would serve {} fallback post(s).", n)
                }
                Err(e) => return Err(format!("Backend check failed: {}", e)),
            }
        }
        Commands::Db { action: DbAction::Seed { email, password } } => {
            let client = connect(&config)?;
            let inserted = db_setup::seed_posts(&client, &email, &password)
                .await
                .map_err(|e| format!("Seeding failed: {}", e))?;
            println!("✅ Inserted {} post(s).", inserted);
        }
        Commands::Admin { action: AdminAction::Signup { email, password } } => {
            let client = connect(&config)?;
            auth_db_operations::sign_up(&client, &email, &password)
                .await
                .map_err(|e| format!("Sign-up failed: {}", e))?;
            println!("✅ Account '{}' registered. Confirm it from the email the service sends.", email);
        }
    }
    Ok(())
}

fn client_base(client: &Option<SupabaseClient>) -> String {
    client.as_ref().map(|c| c.base_url().to_string()).unwrap_or_default()
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env(&cli.env_file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("❌ {}", message);
            ExitCode::FAILURE
        }
    }
}
