use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use riskwise_advisory::{AdvisoryContext, AnswerStyle};
use riskwise_core::PsEstimator;
use riskwise_storage::{CorpusKind, IndexBuilder, IndexFiles, SqliteStore};

/// Risk scoring and advisory engine for construction project registers
#[derive(Parser, Debug)]
#[command(name = "riskwise")]
#[command(about = "Risk scoring and advisory engine", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the search index from the register
    Build {
        /// Path to the register database
        #[arg(long)]
        db: PathBuf,

        /// Corpus sources
        #[arg(long, value_enum, default_value_t = KindArg::Both)]
        kind: KindArg,

        /// Minimum text length to index
        #[arg(long, default_value_t = 5)]
        min_len: usize,

        /// Include the built-in literature cards
        #[arg(long)]
        paper_facts: bool,

        /// Skip the sentence bank file
        #[arg(long)]
        no_sentence_bank: bool,

        /// Index directory; overrides AI_DATA_DIR
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print the Markdown advisory for a risk
    Advise {
        /// Path to the register database
        #[arg(long)]
        db: PathBuf,

        /// Risk id in the register
        #[arg(long)]
        risk_id: i64,

        /// Index directory; overrides AI_DATA_DIR
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Deadline base date (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print the P/S hint for a category as JSON
    Suggest {
        /// Path to the register database
        #[arg(long)]
        db: PathBuf,

        /// Risk category; omit for the global estimate
        #[arg(long)]
        category: Option<String>,

        /// Priors file; overrides PS_PRIORS_PATH
        #[arg(long)]
        priors: Option<PathBuf>,
    },

    /// Search the index
    Search {
        /// Query text
        #[arg(long)]
        query: String,

        /// Number of hits
        #[arg(short, default_value_t = 5)]
        k: usize,

        /// Index directory; overrides AI_DATA_DIR
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print a grouped digest for a prompt
    Ask {
        /// Prompt text
        #[arg(long)]
        query: String,

        /// Number of hits to digest
        #[arg(short, default_value_t = 5)]
        k: usize,

        /// Digest shape
        #[arg(long, value_enum, default_value_t = StyleArg::Full)]
        style: StyleArg,

        /// Index directory; overrides AI_DATA_DIR
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Suggestions,
    Risks,
    Both,
}

impl From<KindArg> for CorpusKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Suggestions => CorpusKind::Suggestions,
            KindArg::Risks => CorpusKind::Risks,
            KindArg::Both => CorpusKind::Both,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Full,
    Mini,
}

impl From<StyleArg> for AnswerStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Full => AnswerStyle::Full,
            StyleArg::Mini => AnswerStyle::Mini,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("riskwise v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Build {
            db,
            kind,
            min_len,
            paper_facts,
            no_sentence_bank,
            data_dir,
        } => {
            let store = SqliteStore::open(&db)?;
            let files = index_files(data_dir);
            info!("building index from {:?} into {:?}", db, files.dir());
            let n = IndexBuilder::new(kind.into())
                .with_min_len(min_len)
                .with_paper_facts(paper_facts)
                .with_sentence_bank(!no_sentence_bank)
                .build(&store, &files)?;
            println!("indexed {} records", n);
        }
        Command::Advise {
            db,
            risk_id,
            data_dir,
            today,
        } => {
            let store = Arc::new(SqliteStore::open(&db)?);
            let ctx = AdvisoryContext::open(store, index_files(data_dir), resolve_today(today));
            println!("{}", ctx.compose(risk_id));
        }
        Command::Suggest {
            db,
            category,
            priors,
        } => {
            let store = SqliteStore::open(&db)?;
            let mut estimator = PsEstimator::default();
            match priors.as_deref() {
                Some(path) => estimator.fit_with_priors(&store, Some(path))?,
                None => estimator.fit(&store)?,
            }
            let hint = estimator.suggest(category.as_deref());
            println!("{}", serde_json::to_string_pretty(&hint)?);
        }
        Command::Search { query, k, data_dir } => {
            let index = index_files(data_dir).load()?;
            for (rank, hit) in index.search(&query, k).iter().enumerate() {
                println!("{:>2}. {:.4}  [{}] {}", rank + 1, hit.score, hit.label, hit.text);
            }
        }
        Command::Ask {
            query,
            k,
            style,
            data_dir,
        } => {
            let index = index_files(data_dir).load()?;
            println!("{}", riskwise_advisory::answer(&index, &query, k, style.into()));
        }
    }

    Ok(())
}

fn index_files(data_dir: Option<PathBuf>) -> IndexFiles {
    match data_dir {
        Some(dir) => IndexFiles::new(dir),
        None => IndexFiles::from_env(),
    }
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}
