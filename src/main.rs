//! history-harvester: download a Reddit account's posts and comments into text files.
//!
//! Identities come from positional arguments, `--inputfile`, or the configured
//! default list. State files in the working directory make repeated runs resumable.

use anyhow::{bail, Result};
use clap::Parser;
use history_harvester::config::{
    load_identities_from_file, parse_optional_bound, HarvestFileConfig, RedditCredentials,
};
use history_harvester::harvest::{HarvestSettings, HarvestState, Harvester, TimeWindow};
use history_harvester::lang::{LanguageClassifier, LanguageFilterSettings};
use history_harvester::reddit::RedditClient;
use history_harvester::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "history-harvester")]
#[command(version)]
#[command(about = "Download a Reddit user's posts and comments into text files")]
struct Cli {
    /// Reddit username(s) (with or without the u/ prefix)
    usernames: Vec<String>,

    /// File with one username per line
    #[arg(long)]
    inputfile: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Lower time bound (epoch seconds, YYYY-MM-DD, or ISO datetime)
    #[arg(long)]
    after: Option<String>,

    /// Upper time bound (epoch seconds, YYYY-MM-DD, or ISO datetime)
    #[arg(long)]
    before: Option<String>,

    /// Max posts to save (0 = no cap)
    #[arg(long)]
    limit_posts: Option<usize>,

    /// Max comments to save (0 = no cap)
    #[arg(long)]
    limit_comments: Option<usize>,

    /// Skip posts
    #[arg(long)]
    no_posts: bool,

    /// Skip comments
    #[arg(long)]
    no_comments: bool,

    /// Pause between items, in seconds
    #[arg(long)]
    sleep: Option<f64>,

    /// Only test authentication and exit
    #[arg(long)]
    auth_test: bool,

    /// Ignore the processed-identities file for this run
    #[arg(long)]
    reset_visited: bool,

    /// Keep only items whose language score reaches THRESHOLD (0..=1)
    #[arg(long, value_name = "THRESHOLD")]
    filter_lang: Option<f64>,

    /// Target language for --filter-lang (ISO 639-3 or 639-1, e.g. hun, hu)
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Harvest settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Compact logs by default; `HARVEST_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("history_harvester=info,harvest=info,lang=info,reddit=info,store=info,warn")
    });
    let json = std::env::var("HARVEST_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

fn item_delay(secs: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(d) => Ok(d),
        Err(_) => bail!("--sleep must be a non-negative number of seconds, got {secs}"),
    }
}

fn cap(limit: Option<usize>) -> Option<usize> {
    limit.filter(|n| *n > 0)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; silently ignored otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let file_cfg = HarvestFileConfig::load(cli.config.as_deref())?;

    let creds = RedditCredentials::from_env()?;
    let client = RedditClient::new(creds)?;
    client.smoke_test().await?;
    if cli.auth_test {
        return Ok(());
    }

    let after = parse_optional_bound(cli.after.as_deref())?;
    let before = parse_optional_bound(cli.before.as_deref())?;
    let window = TimeWindow::new(after, before);
    if window.is_degenerate() {
        warn!(target: "harvest", ?after, ?before, "time window is empty, nothing will be saved");
    }

    let classifier = match cli.filter_lang {
        Some(threshold) => Some(LanguageClassifier::from_settings(&LanguageFilterSettings {
            language: cli.lang.clone().unwrap_or_else(|| file_cfg.language.clone()),
            threshold,
            hunspell_aff: file_cfg.hunspell_aff.clone(),
            hunspell_dic: file_cfg.hunspell_dic.clone(),
            wordlist: file_cfg.wordlist.clone(),
        })?),
        None => None,
    };

    let identities = match &cli.inputfile {
        Some(path) => load_identities_from_file(path)?,
        None if !cli.usernames.is_empty() => cli.usernames.clone(),
        None => file_cfg.default_users.clone(),
    };
    if identities.iter().all(|u| u.trim().is_empty()) {
        return Err(ConfigError::NoIdentities("command line / default_users".to_string()).into());
    }

    let settings = HarvestSettings {
        out_dir: cli.out.clone().unwrap_or_else(|| file_cfg.out_dir.clone()),
        window,
        post_limit: cap(cli.limit_posts),
        comment_limit: cap(cli.limit_comments),
        include_posts: !cli.no_posts,
        include_comments: !cli.no_comments,
        item_delay: item_delay(cli.sleep.unwrap_or(file_cfg.sleep_secs))?,
        disregard_processed: cli.reset_visited,
    };
    if settings.disregard_processed {
        info!(target: "store", "reset-visited: processed identities are ignored for this run");
    }

    let mut state = HarvestState::open(&file_cfg.state)?;
    let harvester = Harvester::new(&client, settings, classifier.as_ref());
    let report = harvester.run_batch(&identities, &mut state).await;

    info!(
        target: "harvest",
        identities = identities.len(),
        completed = report.completed(),
        failed = report.failed(),
        out = %harvester.settings().out_dir.display(),
        "done"
    );
    Ok(())
}
