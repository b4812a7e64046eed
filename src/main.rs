use clap::Parser;
use clap::Subcommand;
use tanyarag::api::serve_api;
use tanyarag::config::AppConfig;
use tanyarag::corpus::Corpus;
use tanyarag::database::Database;
use tanyarag::embeddings::CorpusIndex;
use tanyarag::embeddings::EmbeddingCache;
use tanyarag::embeddings::EmbeddingClient;
use tanyarag::logging;
use tanyarag::rag::RagService;
use tanyarag::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "tanyarag")]
#[command(about = "Document question answering over a local model server")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind
        #[arg(short, long, default_value = "5000")]
        port: u16,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Load the corpus and build the embedding cache
    Ingest {
        /// Discard any cached embeddings and recompute
        #[arg(long)]
        refresh: bool,
    },
    /// Ask a single question and print the answer
    Ask {
        /// The question text
        question: String,
    },
    /// Print persisted conversation turns, oldest first
    History {
        /// Maximum number of turns to print
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    logging::init_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Serve { host, port, cors } => {
            serve_api(&config, host, port, cors).await?;
        }
        Commands::Ingest { refresh } => {
            let cache = EmbeddingCache::new(config.embeddings_dir());
            if refresh {
                cache.invalidate(config.corpus_name())?;
            }
            let client = EmbeddingClient::from_config(&config)?;
            let corpus = Corpus::load_dir(config.corpus_name(), config.data_dir())?;
            let index = CorpusIndex::build(corpus, &client, &cache).await?;
            info!("Ingested {} paragraphs", index.len());
        }
        Commands::Ask { question } => {
            let service = RagService::new(&config).await?;
            let answer = service.ask(&question).await?;
            println!("{answer}");
        }
        Commands::History { limit } => {
            let database = Database::from_config(&config).await?;
            let turns = database.list_chat_turns().await?;
            for turn in turns.iter().take(limit) {
                println!(
                    "[{}] {}: {}",
                    turn.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    turn.role.as_str(),
                    turn.message
                );
            }
        }
    }

    Ok(())
}
