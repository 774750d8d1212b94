use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use banlist_core::CardDatabase;
use banlist_store::{SnapshotStore, ValueRule, validate_tree};
use banlist_sync::sources::{
    AsiaEnglish, AsiaNames, Format, Genesys, HongKong, MasterDuel, Region, SimplifiedChinese,
};
use banlist_sync::{DEFAULT_TIMEOUT, ExtractContext, FetchClient, Source, SyncError};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "banlist",
    about = "Fetch forbidden & limited lists and write dated snapshots",
    version
)]
struct Cli {
    /// Directory for snapshots, pointers and raw artifacts
    #[arg(long, global = true, env = "BANLIST_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "BANLIST_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Genesys points list; writes only when the content changed
    Genesys,
    /// Asia-English list
    AsiaAe {
        /// Reference card database (JSON array)
        cards: PathBuf,
    },
    /// Asia OCG and AE lists as unresolved name files
    AsiaNames,
    /// Convert `<date>.name.json` files in the output directory
    MasterDuel { cards: PathBuf },
    /// Hong Kong lists (Japanese or Asia-English names)
    Hk {
        cards: PathBuf,
        /// Only the two most recent months
        #[arg(long)]
        recent: bool,
        #[arg(long, value_enum, default_value_t = RegionArg::Jp)]
        region: RegionArg,
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
    },
    /// Simplified Chinese lists
    Sc { cards: PathBuf },
    /// Check every `YYYY-MM-DD.vector.json` under the output directory
    Validate {
        /// Accept any non-negative value (points lists)
        #[arg(long)]
        points: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RegionArg {
    Jp,
    Ae,
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Jp => Region::Jp,
            RegionArg::Ae => Region::Ae,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Html,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Format::Csv,
            FormatArg::Html => Format::Html,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("banlist v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            let code = e.downcast_ref::<SyncError>().map_or(1, SyncError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let (source, cards): (Box<dyn Source>, Option<PathBuf>) = match cli.command {
        Commands::Validate { points } => return validate(&cli.out_dir, points),
        Commands::Genesys => (Box::new(Genesys::default()), None),
        Commands::AsiaAe { cards } => (Box::new(AsiaEnglish::default()), Some(cards)),
        Commands::AsiaNames => (Box::new(AsiaNames::default()), None),
        Commands::MasterDuel { cards } => (Box::new(MasterDuel), Some(cards)),
        Commands::Hk {
            cards,
            recent,
            region,
            format,
        } => (
            Box::new(HongKong::new(region.into(), format.into(), recent)),
            Some(cards),
        ),
        Commands::Sc { cards } => (Box::new(SimplifiedChinese::default()), Some(cards)),
    };

    let cards = match cards {
        Some(path) => Some(load_cards(&path).await?),
        None => None,
    };
    let store = SnapshotStore::open(&cli.out_dir)
        .await
        .with_context(|| format!("opening output directory {}", cli.out_dir.display()))?;
    let client = FetchClient::new(Duration::from_secs(cli.timeout)).context("building HTTP client")?;
    let ctx = ExtractContext {
        client: &client,
        store: &store,
        today: chrono::Local::now().date_naive(),
    };

    let report = banlist_sync::run(source.as_ref(), &ctx, cards.as_ref())
        .await
        .with_context(|| format!("running {}", source.id()))?;

    if report.unchanged {
        tracing::info!(source = source.id(), "no changes");
    }
    if let Some(pointers) = report.pointers {
        tracing::info!(
            current = ?pointers.current,
            upcoming = ?pointers.upcoming,
            "pointers updated"
        );
    }
    tracing::info!(
        source = source.id(),
        written = report.written.len(),
        unresolved = report.unresolved,
        "done"
    );
    Ok(0)
}

async fn load_cards(path: &Path) -> anyhow::Result<CardDatabase> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading card database {}", path.display()))?;
    let db = CardDatabase::from_json(&json)
        .with_context(|| format!("parsing card database {}", path.display()))?;
    tracing::info!(cards = db.len(), path = %path.display(), "card database loaded");
    Ok(db)
}

fn validate(root: &Path, points: bool) -> anyhow::Result<u8> {
    let rule = if points {
        ValueRule::Points
    } else {
        ValueRule::Levels
    };
    let report = validate_tree(root, rule)
        .with_context(|| format!("scanning {}", root.display()))?;
    tracing::info!(
        checked = report.checked,
        failed = report.failures.len(),
        "validation finished"
    );
    Ok(if report.is_ok() { 0 } else { 1 })
}
