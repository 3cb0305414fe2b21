//! Seek command line client.
//!
//! Talks to a running search backend:
//! - `seek search <text>` prints matching files and webpages
//! - `seek download <path>` saves a file into the download directory
//! - `seek indexers` lists the indexers registered with the backend
//! - `seek interactive` reads queries from stdin with search-as-you-type
//!
//! Lines starting with `:` in interactive mode change settings or act on the
//! current results (`:files off`, `:webpages on`, `:all off`, `:max 10`,
//! `:get 1`).

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use seek::backend::Backend;
use seek::download::{DirectorySaveHost, DownloadClient};
use seek::search::{
    Applied, Debouncer, DisplayResult, ResultsView, SearchClient, SearchOutcome, SearchQuery,
    SearchReply,
};
use seek::settings::{ClientConfig, Settings};
use seek::SeekError;

/// Sleep used by the interactive loop when no search is pending.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

#[derive(Parser, Debug)]
#[command(name = "seek", version, about = "Search client for a Seekourney backend")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search once and print the results
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
        /// Hide file results
        #[arg(long)]
        no_files: bool,
        /// Hide webpage results
        #[arg(long)]
        no_webpages: bool,
        /// Show at most this many results
        #[arg(long)]
        max: Option<NonZeroUsize>,
    },
    /// Download a file result by its backend path (webpage URLs are rejected)
    Download {
        path: String,
        /// Directory to save into
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// List indexers known to the backend
    Indexers,
    /// Read queries from stdin, searching as you type
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .context("Failed to load configuration")?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    let _guard = init_logging(&config);
    info!("Seek v{} using backend {}", env!("CARGO_PKG_VERSION"), config.endpoint);

    let backend = Backend::from_config(&config)?;

    match cli.command {
        Command::Search {
            terms,
            no_files,
            no_webpages,
            max,
        } => {
            let mut settings = config.settings.clone();
            if no_files {
                settings.set_show_files(false);
            }
            if no_webpages {
                settings.set_show_webpages(false);
            }
            if let Some(max) = max {
                settings.set_show_all_results(false);
                settings.set_max_results(max);
            }

            let query = SearchQuery::new(terms.join(" "));
            let outcome = SearchClient::new(backend).search(&query, &settings).await?;
            print_outcome(&outcome);
        }
        Command::Download { path, dest } => {
            let mut host = DirectorySaveHost::new(dest.unwrap_or(config.download_dir));
            let saved = DownloadClient::new(backend).download_path(&path, &mut host).await?;
            println!("{}", saved.display());
        }
        Command::Indexers => {
            let mut settings = config.settings.clone();
            settings.set_indexers(backend.indexers().await?);
            for indexer in settings.indexers() {
                println!("{:>4}  {:<24} port {}", indexer.id, indexer.name, indexer.port);
            }
        }
        Command::Interactive => interactive(config, backend).await?,
    }

    Ok(())
}

/// Initialize tracing: a daily rolling file when `log_dir` is set, stderr
/// otherwise. The returned guard must be held until exit to flush the file.
fn init_logging(config: &ClientConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("seek=info"));

    let Some(log_dir) = &config.log_dir else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "seek.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

fn print_rows(rows: &[DisplayResult]) {
    for (i, row) in rows.iter().enumerate() {
        match row {
            DisplayResult::File { path, label, score } => {
                println!("{:>3}. [file] {:<32} {:.2}  {}", i + 1, label, score, path);
            }
            DisplayResult::Webpage { url, score } => {
                println!("{:>3}. [web]  {:<32} {:.2}", i + 1, url, score);
            }
        }
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    match outcome.message() {
        Some(message) => println!("{}", message),
        None => print_rows(outcome.rows()),
    }
}

fn print_view(view: &ResultsView) {
    print_rows(view.rows());
    println!("-- {}", view.status());
}

/// Search-as-you-type over stdin. Each line replaces the query text.
async fn interactive(config: ClientConfig, backend: Backend) -> anyhow::Result<()> {
    let client = SearchClient::new(backend.clone());
    let downloads = DownloadClient::new(backend);
    let mut host = DirectorySaveHost::new(&config.download_dir);
    let mut settings = config.settings.clone();
    let mut view = ResultsView::new();
    let mut debouncer = Debouncer::new(config.debounce());
    let mut query = SearchQuery::new("");

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<SearchReply>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type to search. :files/:webpages/:all on|off, :max N, :get N");

    loop {
        let wait = debouncer.remaining(Instant::now()).unwrap_or(IDLE_WAIT);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                if let Some(command) = line.strip_prefix(':') {
                    let result =
                        run_command(command, &mut settings, &view, &downloads, &mut host).await;
                    if let Err(e) = result {
                        println!("!! {}", e);
                    }
                    continue;
                }

                query = SearchQuery::new(line);
                if query.is_blank() {
                    debouncer.cancel();
                    client.sequencer().invalidate();
                    view.clear();
                    print_view(&view);
                } else {
                    debouncer.touch(Instant::now());
                }
            }
            Some(reply) = reply_rx.recv() => {
                if view.apply(reply, client.sequencer(), &settings) == Applied::Updated {
                    print_view(&view);
                }
            }
            _ = tokio::time::sleep(wait) => {
                if !debouncer.poll(Instant::now()) {
                    continue;
                }
                match client.fetch(&query) {
                    Ok(request) => {
                        view.mark_searching(&query);
                        let tx = reply_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(request.await);
                        });
                    }
                    Err(SeekError::EmptyQuery) => view.clear(),
                    Err(e) => warn!("Search not sent: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Handle a `:command` line in interactive mode.
async fn run_command(
    command: &str,
    settings: &mut Settings,
    view: &ResultsView,
    downloads: &DownloadClient,
    host: &mut DirectorySaveHost,
) -> anyhow::Result<()> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default();

    let switch = |arg: &str| -> anyhow::Result<bool> {
        match arg {
            "on" => Ok(true),
            "off" => Ok(false),
            other => anyhow::bail!("expected on or off, got {:?}", other),
        }
    };

    match name {
        "files" => settings.set_show_files(switch(arg)?),
        "webpages" => settings.set_show_webpages(switch(arg)?),
        "all" => settings.set_show_all_results(switch(arg)?),
        "max" => {
            let max: NonZeroUsize = arg.parse().context("max must be a positive integer")?;
            settings.set_max_results(max);
        }
        "get" => {
            let index: usize = arg.parse().context("get takes a result number")?;
            let row = index
                .checked_sub(1)
                .and_then(|i| view.rows().get(i))
                .with_context(|| format!("no result number {}", index))?;
            let saved = downloads.download(row, host).await?;
            println!("saved {}", saved.display());
            return Ok(());
        }
        other => anyhow::bail!("unknown command {:?}", other),
    }

    println!("settings updated; applies to the next search");
    Ok(())
}
