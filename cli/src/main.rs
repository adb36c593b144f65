use anyhow::Result;
use clap::{Parser, Subcommand};
use search_cli::{build_server, load_config, load_documents, read_queries, render_pages};
use search_core::{
    process_queries, process_queries_joined, remove_duplicates, DocId, DocumentStatus, ExecutionPolicy, RequestQueue,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    /// Documents: a JSON/JSONL file or a directory of them
    #[arg(long)]
    docs: PathBuf,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// JSON engine config (worker_threads, accumulator_shards)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Worker threads for parallel evaluation, overrides the config file
    #[arg(long)]
    threads: Option<usize>,
    /// Accumulator shards, overrides the config file
    #[arg(long)]
    shards: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents against one query
    Search {
        #[arg(long, allow_hyphen_values = true)]
        query: String,
        /// Only documents with this status (default ACTUAL)
        #[arg(long)]
        status: Option<DocumentStatus>,
        #[arg(long, default_value_t = false)]
        parallel: bool,
        #[arg(long, default_value_t = 2)]
        page_size: usize,
    },
    /// Rank every query of a file (one per line)
    Batch {
        #[arg(long)]
        queries: PathBuf,
        /// Print one flat list instead of one list per query
        #[arg(long, default_value_t = false)]
        joined: bool,
    },
    /// Remove documents with identical word sets
    Dedup,
    /// Feed queries through the request window and report empty results
    Replay {
        #[arg(long)]
        queries: PathBuf,
    },
    /// Show which query words a document contains
    Match {
        #[arg(long, allow_hyphen_values = true)]
        query: String,
        #[arg(long, allow_hyphen_values = true)]
        id: DocId,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
}

fn policy(parallel: bool) -> ExecutionPolicy {
    if parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(threads) = cli.threads { config = config.with_worker_threads(threads); }
    if let Some(shards) = cli.shards { config = config.with_accumulator_shards(shards); }

    let start = Instant::now();
    let docs = load_documents(&cli.docs)?;
    let (mut server, _rejected) = build_server(&cli.stop_words, config, &docs)?;
    tracing::info!(took_s = start.elapsed().as_secs_f64(), "index ready");

    let start = Instant::now();
    match cli.command {
        Commands::Search { query, status, parallel, page_size } => {
            let status = status.unwrap_or_default();
            let results =
                server.find_top_documents_in(policy(parallel), &query, move |_, doc_status, _| doc_status == status)?;
            println!("{} result(s) for {query:?}", results.len());
            for (i, page) in render_pages(&results, page_size).iter().enumerate() {
                println!("page {}: {page}", i + 1);
            }
        }
        Commands::Batch { queries, joined } => {
            let queries = read_queries(&queries)?;
            if joined {
                for doc in process_queries_joined(&server, &queries)? {
                    println!("{doc}");
                }
            } else {
                for (query, results) in queries.iter().zip(process_queries(&server, &queries)?) {
                    println!("{query:?}: {} result(s)", results.len());
                    for doc in results {
                        println!("  {doc}");
                    }
                }
            }
        }
        Commands::Dedup => {
            let before = server.document_count();
            for id in remove_duplicates(&mut server)? {
                println!("Found duplicate document id {id}");
            }
            println!("{} of {before} document(s) left", server.document_count());
        }
        Commands::Replay { queries } => {
            let queries = read_queries(&queries)?;
            let mut queue = RequestQueue::new(&server);
            for query in &queries {
                if let Err(err) = queue.add_find_request(query) {
                    tracing::warn!(%err, query = %query, "request rejected");
                }
            }
            println!("Total empty requests: {}", queue.no_result_requests());
        }
        Commands::Match { query, id, parallel } => {
            let (words, status) = server.match_document_in(policy(parallel), &query, id)?;
            println!("{{ document_id = {id}, status = {status}, words = {} }}", words.join(" "));
        }
    }
    tracing::info!(took_s = start.elapsed().as_secs_f64(), "command complete");
    Ok(())
}
