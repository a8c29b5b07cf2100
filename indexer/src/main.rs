use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use searchcore::{
    log_duration, paginate, process_queries_joined, remove_duplicates, DocId, Document, DocumentStatus, ExecutionPolicy,
    RequestQueue, SearchIndex,
};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::{Path, PathBuf};

mod input;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    /// Input path (file or directory of .json/.jsonl documents)
    #[arg(long, global = true, default_value = "./sample_data")]
    input: PathBuf,
    /// Space-separated stop words
    #[arg(long, global = true, default_value = "")]
    stop_words: String,
    /// Use the parallel execution policy where one exists
    #[arg(long, global = true, default_value_t = false)]
    parallel: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
        /// Documents per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Print one JSON object per document instead of pages
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the query words found in one document
    Match {
        #[arg(long)]
        query: String,
        #[arg(long, allow_hyphen_values = true)]
        id: DocId,
    },
    /// Remove documents with identical word sets
    Dedup,
    /// Remove the given documents, all or none
    Remove {
        #[arg(long, num_args = 1.., required = true, allow_hyphen_values = true)]
        id: Vec<DocId>,
    },
    /// Run a file of queries (one per line) against the index
    Batch {
        #[arg(long)]
        queries: PathBuf,
    },
    /// Print document count and word frequencies per document
    Stats,
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    id: DocId,
    status: DocumentStatus,
    words: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let policy = if cli.parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };
    let mut index = SearchIndex::new(&cli.stop_words)?;
    {
        log_duration!("load");
        input::load_index(&cli.input, &mut index)?;
    }

    match cli.command {
        Commands::Search { query, status, page_size, json } => search(&index, policy, &query, status.into(), page_size, json),
        Commands::Match { query, id } => {
            let (words, status) = index.match_document_with(policy, &query, id)?;
            println!("{}", serde_json::to_string(&MatchOutput { id, status, words })?);
            Ok(())
        }
        Commands::Dedup => {
            let removed = remove_duplicates(&mut index)?;
            for id in &removed {
                println!("Found duplicate document id {id}");
            }
            println!("{} documents remain", index.document_count());
            Ok(())
        }
        Commands::Remove { id } => {
            log_duration!("remove");
            index.remove_documents(policy, &id)?;
            println!("{} documents remain", index.document_count());
            Ok(())
        }
        Commands::Batch { queries } => batch(&index, &queries),
        Commands::Stats => {
            println!("{} documents", index.document_count());
            for id in &index {
                println!("{id}: {}", serde_json::to_string(index.word_frequencies(id))?);
            }
            Ok(())
        }
    }
}

fn search(index: &SearchIndex, policy: ExecutionPolicy, query: &str, status: DocumentStatus, page_size: usize, json: bool) -> Result<()> {
    let found: Vec<Document> = {
        log_duration!("search");
        index.find_top_documents_with(policy, query, |_, document_status, _| document_status == status)?
    };
    if json {
        for doc in &found {
            println!("{}", serde_json::to_string(doc)?);
        }
        return Ok(());
    }
    for page in paginate(&found, page_size)? {
        println!("{page}");
        println!("Page break");
    }
    Ok(())
}

fn batch(index: &SearchIndex, queries_path: &Path) -> Result<()> {
    let text = fs::read_to_string(queries_path).with_context(|| format!("reading {}", queries_path.display()))?;
    let queries: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

    let joined = {
        log_duration!("process_queries_joined");
        process_queries_joined(index, &queries)?
    };
    for doc in &joined {
        println!("{doc}");
    }

    let mut requests = RequestQueue::new(index);
    for query in &queries {
        requests.add_find_request(query)?;
    }
    println!("Total empty requests: {}", requests.no_result_requests());
    Ok(())
}
