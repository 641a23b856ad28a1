use anyhow::Context;
use clap::{Parser, Subcommand};
use ecoreborn::adapter::mongo::MongoConnector;
use ecoreborn::app::{self, tracing::init_tracing};
use ecoreborn::check_db;
use ecoreborn::config::{Environment, Settings, load_dotenv};
use ecoreborn::doctor::{CheckContext, Doctor};
use ecoreborn::error::DiagnosticError;
use ecoreborn::shim;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "EcoReborn web service and project diagnostics", long_about = None)]
struct Cli {
    /// Project root holding templates/, static/ and .env
    #[arg(long, global = true, env = "ECOREBORN_ROOT", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the web application (default)
    Serve,
    /// Check environment, database, models, forms, routes, app, files and dependencies
    Doctor,
    /// Inspect the MongoDB database contents
    CheckDb,
    /// Probe the local /v1/health endpoint (for container healthchecks)
    Healthcheck,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    // Handled before anything else so distroless images need no shell.
    if command == Command::Healthcheck {
        return Ok(match ecoreborn::healthcheck().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        });
    }

    let dotenv = load_dotenv(&cli.root);

    match command {
        Command::Serve => {
            init_tracing(Level::INFO);
            if let Some(path) = dotenv {
                info!("Loaded environment from {}", path.display());
            }
            let settings = Settings::from_env(&Environment::capture(), &cli.root)
                .context("Failed to load settings")?;
            info!(settings = ?settings, "Loaded settings");
            let app = shim::application(settings)?;
            app::run(app).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Doctor => {
            let ctx = CheckContext {
                env: Environment::capture(),
                root: cli.root,
                connector: Arc::new(MongoConnector),
            };
            let report = Doctor::standard()
                .run(&ctx, &mut io::stdout())
                .await
                .context("Failed to write report")?;
            Ok(ExitCode::from(report.exit_code()))
        }
        Command::CheckDb => {
            match check_db::run(&Environment::capture(), &MongoConnector, &mut io::stdout()).await {
                Ok(diagnosis) => Ok(ExitCode::from(diagnosis.exit_code())),
                Err(DiagnosticError::Output(e)) => Err(e).context("Failed to write report"),
                // Already explained in the report.
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Command::Healthcheck => Ok(ExitCode::SUCCESS),
    }
}
