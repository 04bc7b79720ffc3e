use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use karbon_leaderboard::config::{
    DEFAULT_AVATAR, DEFAULT_BASELINE_SCORE, DEFAULT_MASK_CHAR, DEFAULT_REMAINDER_LIMIT,
};
use karbon_leaderboard::models::UserRecord;
use karbon_leaderboard::{
    build_leaderboard, db, report, source, Direction, IdentityId, LeaderboardConfig,
    LeaderboardRequest, LeaderboardView, WindowSpec,
};

#[derive(Parser)]
#[command(name = "karbon-leaderboard")]
#[command(about = "Privacy-masked carbon footprint leaderboard", long_about = None)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo participants and logs
    Seed,
    /// Import emission logs from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Build the leaderboard for a viewer and print it
    Build {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Rows listed below the podium in markdown output
        #[arg(long, default_value_t = DEFAULT_REMAINDER_LIMIT)]
        limit: usize,
    },
    /// Write a markdown leaderboard report
    Report {
        #[command(flatten)]
        query: QueryArgs,
        /// Rows listed below the podium
        #[arg(long, default_value_t = DEFAULT_REMAINDER_LIMIT)]
        limit: usize,
        #[arg(long, default_value = "leaderboard.md")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("window")
        .args(["month", "from", "since_days"])
        .multiple(false)
))]
struct QueryArgs {
    /// Participant snapshot as JSON; reads the database when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Identity of the signed-in viewer
    #[arg(long)]
    viewer: Option<String>,
    #[arg(long, value_enum, default_value_t = Direction::Ascending)]
    direction: Direction,
    /// Calendar month as YYYY-MM; defaults to the current month
    #[arg(long)]
    month: Option<String>,
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    #[arg(long)]
    since_days: Option<i64>,
    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct EngineArgs {
    /// Score for participants with no logs in the window
    #[arg(long, env = "KARBON_BASELINE_SCORE", default_value_t = DEFAULT_BASELINE_SCORE)]
    baseline_score: f64,
    #[arg(long, env = "KARBON_MASK_CHAR", default_value_t = DEFAULT_MASK_CHAR)]
    mask_char: char,
    #[arg(long, env = "KARBON_DEFAULT_AVATAR", default_value = DEFAULT_AVATAR)]
    default_avatar: String,
}

impl QueryArgs {
    fn window(&self, today: NaiveDate) -> anyhow::Result<WindowSpec> {
        let window = match (&self.month, self.from, self.to, self.since_days) {
            (Some(month), ..) => WindowSpec::parse_month(month)?,
            (None, Some(from), Some(to), _) => WindowSpec::new(from, to)?,
            (None, _, _, Some(days)) => WindowSpec::trailing_days(today, days)?,
            _ => WindowSpec::month_of(today),
        };
        Ok(window)
    }

    fn config(&self) -> anyhow::Result<LeaderboardConfig> {
        Ok(LeaderboardConfig::new(
            self.engine.baseline_score,
            self.engine.mask_char,
            self.engine.default_avatar.clone(),
        )?)
    }
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<PgPool> {
    let database_url =
        database_url.context("DATABASE_URL must be set to a production Postgres instance")?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn fetch(database_url: Option<&str>, query: &QueryArgs) -> anyhow::Result<Vec<UserRecord>> {
    match &query.input {
        Some(path) => source::load_users(path),
        None => {
            let pool = connect(database_url).await?;
            db::fetch_users(&pool).await
        }
    }
}

async fn leaderboard(database_url: Option<&str>, query: &QueryArgs) -> anyhow::Result<LeaderboardView> {
    let config = query.config()?;
    let request = LeaderboardRequest {
        viewer: query.viewer.as_deref().map(IdentityId::new),
        window: query.window(Utc::now().date_naive())?,
        direction: query.direction,
    };
    let users = fetch(database_url, query).await?;
    Ok(build_leaderboard(&users, &request, &config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&connect(database_url).await?).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&connect(database_url).await?).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&connect(database_url).await?, &csv).await?;
            println!("Inserted {inserted} logs from {}.", csv.display());
        }
        Commands::Build {
            query,
            format,
            limit,
        } => {
            let view = leaderboard(database_url, &query).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Markdown => print!("{}", report::build_report(&view, limit)),
            }
        }
        Commands::Report { query, limit, out } => {
            let view = leaderboard(database_url, &query).await?;
            std::fs::write(&out, report::build_report(&view, limit))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
