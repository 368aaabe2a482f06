//! ocean-watch CLI
//!
//! Browse the static listings and drive the login and signup flows from a
//! terminal.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use ocean_forms::{FormState, FormValues, SubmitOutcome};
use ocean_watch::{App, AppConfig, Catalog, Intensity};

/// Coastal hazard listings and mock account flows.
#[derive(Parser)]
#[command(name = "ocean-watch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding hazards.json and safeZones.json.
    #[arg(short, long, env = "OCEAN_WATCH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Simulated service delay in milliseconds.
    #[arg(long, env = "OCEAN_WATCH_LATENCY_MS")]
    latency_ms: Option<u64>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List reported hazards, most recent first.
    Hazards {
        /// Only show hazards of this intensity (low, medium, high).
        #[arg(short, long)]
        intensity: Option<Intensity>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List safe zones.
    SafeZones {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Log in with the mock service.
    Login {
        /// Email address.
        #[arg(short, long, default_value = "")]
        email: String,

        /// Password.
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Create an account with the mock service.
    Signup {
        /// Display name.
        #[arg(short, long, default_value = "")]
        name: String,

        /// Email address.
        #[arg(short, long, default_value = "")]
        email: String,

        /// Password.
        #[arg(short, long, default_value = "")]
        password: String,

        /// Password confirmation.
        #[arg(short, long, default_value = "")]
        confirm_password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AppConfig::new(cli.data_dir);
    if let Some(ms) = cli.latency_ms {
        config = config.with_latency(Duration::from_millis(ms));
    }
    let app = App::new(config);

    match cli.command {
        Commands::Hazards { intensity, json } => {
            let catalog = load_catalog(&app).await?;
            let hazards = match intensity {
                Some(intensity) => catalog.hazards_with_intensity(intensity),
                None => catalog.recent_hazards(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&hazards)?);
            } else if hazards.is_empty() {
                println!("No hazards reported.");
            } else {
                for hazard in hazards {
                    println!(
                        "[{}] {} at {} ({})",
                        hazard.intensity,
                        hazard.disaster_type,
                        hazard.location,
                        hazard.formatted_timestamp()
                    );
                    println!("    {}", hazard.description);
                }
            }
        }

        Commands::SafeZones { json } => {
            let catalog = load_catalog(&app).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog.safe_zones)?);
            } else {
                for zone in &catalog.safe_zones {
                    println!(
                        "{} - {} (capacity {})",
                        zone.name, zone.location, zone.capacity
                    );
                    if !zone.facilities.is_empty() {
                        println!("    Facilities: {}", zone.facilities.join(", "));
                    }
                }
                println!("Total capacity: {}", catalog.total_capacity());
            }
        }

        Commands::Login { email, password } => {
            let page = app.login_page();
            page.change("email", &email)?;
            page.change("password", &password)?;

            match page.submit().await {
                Ok(SubmitOutcome::Submitted(response)) => {
                    info!("Logged in as {}", response.user.email);
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                Ok(SubmitOutcome::Invalid(_)) => report_invalid(&page.state()),
                Err(err) => warn!("Login failed: {}", page.error().unwrap_or_else(|| err.to_string())),
            }
        }

        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let page = app.signup_page();
            page.change("name", &name)?;
            page.change("email", &email)?;
            page.change("password", &password)?;
            page.change("confirm_password", &confirm_password)?;

            match page.submit().await {
                Ok(SubmitOutcome::Submitted(response)) => {
                    info!("Account created for {}", response.user.email);
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                Ok(SubmitOutcome::Invalid(_)) => report_invalid(&page.state()),
                Err(err) => warn!("Signup failed: {}", page.error().unwrap_or_else(|| err.to_string())),
            }
        }
    }

    if let Some(route) = app.navigator().current() {
        info!("Next page: {route}");
    }

    Ok(())
}

async fn load_catalog(app: &App) -> anyhow::Result<Catalog> {
    match app.dashboard().await {
        Ok(dashboard) => Ok(dashboard.into_catalog()),
        Err(err) => {
            eprintln!("{}", err.user_message());
            Err(err.into())
        }
    }
}

fn report_invalid<T: FormValues>(state: &FormState<T>) {
    for field in state.values.field_names() {
        if let Some(message) = state.visible_error(&field) {
            warn!("{field}: {message}");
        }
    }
}
