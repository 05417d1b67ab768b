use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tech_sniffer::utils::parse_date_argument;
use tech_sniffer::{
    run_analysis, AnalyzerConfig, DocumentSortOrder, Error, DEFAULT_MAX_FLUSH_ATTEMPTS,
    DEFAULT_PERSISTENCE_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL, DEFAULT_TOP_K,
};

/// Counts technology mentions and view totals in a forum post dump.
#[derive(Parser, Debug)]
#[command(name = "tech-sniffer-cli", author, version, about, long_about = None)]
struct Args {
    /// Path to the post dump (Posts.xml, optionally gzip-compressed)
    #[arg(long)]
    posts: PathBuf,

    /// Path to the technology list (CSV with a `Name` column)
    #[arg(long)]
    stacks: PathBuf,

    /// Output CSV path
    #[arg(long)]
    out: PathBuf,

    /// Rows to scan before stopping (0 = no limit)
    #[arg(long, default_value_t = 0)]
    limit: u64,

    /// Log progress every N rows (0 = never)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress: u64,

    /// Add the most-viewed posts of each technology to the output
    #[arg(long)]
    include_top_posts: bool,

    /// Number of most-viewed posts kept per technology
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Also write the ranked posts of this single technology
    #[arg(long)]
    detail_tech: Option<String>,

    /// Output path of the detail extract (default: next to --out)
    #[arg(long)]
    detail_out: Option<PathBuf>,

    /// Persist matched posts and associations to the store
    #[arg(long)]
    persist: bool,

    /// SQLite store path used with --persist
    #[arg(long)]
    store: Option<PathBuf>,

    /// Matched posts written per transaction
    #[arg(long, default_value_t = DEFAULT_PERSISTENCE_BATCH_SIZE)]
    batch_size: usize,

    /// Attempts per batch before the run is aborted
    #[arg(long, default_value_t = DEFAULT_MAX_FLUSH_ATTEMPTS)]
    flush_attempts: u32,

    /// Export every post that passed the filters
    #[arg(long)]
    filtered_out: Option<PathBuf>,

    /// Sort order of the filtered export: views or date
    #[arg(long)]
    sort: Option<String>,

    /// Write one row per (technology, post) mention as it is found
    #[arg(long)]
    matches_out: Option<PathBuf>,

    /// Write daily mention counts and shares per technology
    #[arg(long)]
    trends_out: Option<PathBuf>,

    /// First day of the date window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    from: Option<String>,

    /// Last day of the date window (YYYY-MM-DD, inclusive, default: today)
    #[arg(long)]
    to: Option<String>,

    /// Only the last N days, ending today
    #[arg(long)]
    days: Option<u32>,
}

impl Args {
    fn into_config(self) -> Result<AnalyzerConfig, Error> {
        let mut config = AnalyzerConfig::new(&self.posts, &self.stacks, &self.out);

        config.row_limit = self.limit;
        config.progress_interval = self.progress;
        config.include_top_posts = self.include_top_posts;
        config.top_k = self.top_k;
        config.detail_technology = self.detail_tech;
        config.detail_output_path = self.detail_out;
        config.persist = self.persist;
        config.store_path = self.store;
        config.batch_size = self.batch_size;
        config.max_flush_attempts = self.flush_attempts;
        config.filtered_output_path = self.filtered_out;
        config.filtered_sort = self
            .sort
            .as_deref()
            .map(str::parse::<DocumentSortOrder>)
            .transpose()?;
        config.matches_output_path = self.matches_out;
        config.trends_output_path = self.trends_out;
        config.date_from = self
            .from
            .as_deref()
            .map(|raw| parse_date_argument("--from", raw))
            .transpose()?;
        config.date_to = self
            .to
            .as_deref()
            .map(|raw| parse_date_argument("--to", raw))
            .transpose()?;
        config.days = self.days;

        Ok(config)
    }
}

fn main() {
    // Initialize the logger
    env_logger::init();

    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match run_analysis(&config) {
        Ok(summary) => {
            info!(
                "Finished: scanned={} processed={} matched={} anomalies={} output={}",
                summary.scanned,
                summary.processed,
                summary.matched,
                summary.anomalies,
                config.output_path.display()
            );
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
