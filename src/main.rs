use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchday_forecast::config::EngineConfig;
use matchday_forecast::predictor::MatchPredictor;
use matchday_forecast::provider::StatsProvider;
use matchday_forecast::report::{
    export_predictions_xlsx, predictions_to_json, render_injury_report, render_prediction,
    render_team_form,
};
use matchday_forecast::seed::{clear_all, seed_sample_league};
use matchday_forecast::store::{SqliteProvider, default_db_path, open_db};

#[derive(Parser)]
#[command(name = "forecast")]
#[command(about = "Pre-match outcome probabilities from recent form, squads and injuries")]
#[command(version)]
struct Cli {
    /// SQLite database path
    #[arg(long)]
    db: Option<PathBuf>,

    /// JSON engine configuration (weights, windows, draw heuristic)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wipe the database and fill it with a sample league
    Seed {
        /// RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Predict a single match between two team ids
    Predict {
        #[arg(long)]
        home: i64,
        #[arg(long)]
        away: i64,
        #[arg(long)]
        json: bool,
    },
    /// Predict every fixture scheduled on a date
    Daily {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
        /// Also write the predictions to an xlsx workbook
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },
    /// Recent form and active injuries per team
    Teams {
        /// Only this team id
        #[arg(long)]
        team: Option<i64>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.json_logs);

    let db_path = match cli.db.clone() {
        Some(path) => path,
        None => default_db_path().context("no database path given and HOME is not set")?,
    };

    match cli.command {
        Commands::Seed { seed } => {
            let conn = open_db(&db_path)?;
            clear_all(&conn)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let summary = seed_sample_league(&conn, &mut rng, Local::now().date_naive())?;
            println!(
                "Seeded {} teams, {} players, {} finished matches and {} fixtures into {}",
                summary.teams.len(),
                summary.players,
                summary.finished_matches,
                summary.fixtures.len(),
                db_path.display()
            );
            for (id, name) in &summary.teams {
                println!("  {id:>3}  {name}");
            }
        }
        Commands::Predict { home, away, json } => {
            let config = load_config(cli.config.as_deref())?;
            let provider = SqliteProvider::open(&db_path)?;
            let predictor = MatchPredictor::new(&provider, config);
            let result = predictor
                .predict_match(home, away)
                .with_context(|| format!("predict {home} vs {away}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render_prediction(&result, &config.weights));
            }
        }
        Commands::Daily { date, json, xlsx } => {
            let config = load_config(cli.config.as_deref())?;
            let provider = SqliteProvider::open(&db_path)?;
            let date = date.unwrap_or_else(|| provider.today());
            let predictor = MatchPredictor::new(&provider, config);
            let results = predictor
                .predict_all_scheduled(date)
                .with_context(|| format!("predict fixtures on {date}"))?;

            if json {
                println!("{}", predictions_to_json(&results)?);
            } else if results.is_empty() {
                println!("No fixtures scheduled for {date}");
            } else {
                for (idx, result) in results.iter().enumerate() {
                    if idx > 0 {
                        println!();
                    }
                    println!("{}", render_prediction(result, &config.weights));
                }
            }

            if let Some(path) = xlsx {
                export_predictions_xlsx(&path, &results)?;
                info!(path = %path.display(), rows = results.len(), "workbook written");
            }
        }
        Commands::Teams { team } => {
            let config = load_config(cli.config.as_deref())?;
            let provider = SqliteProvider::open(&db_path)?;
            let teams = match team {
                Some(id) => vec![(id, provider.team_display_name(id)?)],
                None => provider.teams()?,
            };
            for (idx, (id, name)) in teams.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                let stats = provider.team_stats(*id, config.windows.team)?;
                let injuries = provider.active_injuries(*id)?;
                println!("{}", render_team_form(name, stats.as_ref()));
                println!("{}", render_injury_report(name, &injuries));
            }
        }
    }
    Ok(())
}

fn init_logging(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<EngineConfig> {
    let base = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(base.with_env_overrides())
}
