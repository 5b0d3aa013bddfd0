use anyhow::Result;
use clap::{Parser, Subcommand};
use foodgram::cli;
use validator::Validate;

/// foodgram - recipe sharing platform
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipe sharing platform API", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Change the role of an existing user
    SetRole {
        email: String,

        #[arg(value_enum)]
        role: cli::user::Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = foodgram::config::Config::load(cli.config.clone())?;
    config.validate()?;

    // Initialize tracing + logging
    foodgram::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::server::migrate(config).await,
        Commands::Reset => cli::server::reset(config).await,
        Commands::User { command } => match command {
            UserCommands::SetRole { email, role } => cli::user::set_role(config, email, role).await,
        },
    }
}
