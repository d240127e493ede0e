//! Forge SDK sample console.
//!
//! Lists buckets and objects, uploads files, and submits translation jobs.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use forge_sdk::config::api;
use forge_sdk::models::{BucketPolicy, BucketRegion};
use forge_sdk::{
    AuthenticationClient, Config, DataManagementClient, DerivativesClient, OAuthTokenProvider,
    StaticTokenProvider, TokenProvider,
};

#[derive(Parser, Debug)]
#[command(name = "forge-sdk")]
#[command(about = "Sample console for the Forge APIs")]
#[command(version)]
struct Cli {
    /// OAuth client ID
    #[arg(long, env = "FORGE_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "FORGE_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Use a token obtained elsewhere instead of the client-credentials grant
    #[arg(long, env = "FORGE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List buckets, each followed by its objects
    Buckets {
        /// Only show buckets with this retention policy
        #[arg(long)]
        policy: Option<BucketPolicy>,
    },
    /// List the objects of a bucket
    Objects { bucket: String },
    /// Create a bucket
    CreateBucket {
        bucket: String,
        #[arg(long, default_value = "transient")]
        policy: BucketPolicy,
        #[arg(long, default_value = "us")]
        region: BucketRegion,
    },
    /// Upload a local file, chunking it above 100 MiB
    Upload {
        bucket: String,
        object: String,
        file: PathBuf,
        /// Chunk size for resumable uploads, in MiB
        #[arg(long)]
        chunk_size_mb: Option<u64>,
    },
    /// Submit a translation job
    Translate {
        urn: String,
        /// Produce SVF2 instead of SVF
        #[arg(long)]
        svf2: bool,
        #[arg(long, default_value = "us")]
        region: BucketRegion,
    },
    /// Show translation progress
    Status {
        urn: String,
        #[arg(long, default_value = "us")]
        region: BucketRegion,
    },
    /// Print a client-credentials token, e.g. for a viewer
    Token {
        #[arg(long = "scope", default_value = "viewables:read")]
        scopes: Vec<String>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

fn token_provider(cli: &Cli, config: &Config) -> anyhow::Result<Arc<dyn TokenProvider>> {
    if let Some(token) = &cli.access_token {
        return Ok(Arc::new(StaticTokenProvider::new(token.clone())));
    }
    Ok(Arc::new(OAuthTokenProvider::from_config(config)?))
}

/// Convert `--chunk-size-mb` to bytes.
fn chunk_size_bytes(mb: u64) -> anyhow::Result<u64> {
    mb.checked_mul(api::MIB)
        .ok_or_else(|| anyhow::anyhow!("--chunk-size-mb {mb} does not fit in 64 bits of bytes"))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::new(cli.client_id.clone(), cli.client_secret.clone());
    let tokens = token_provider(&cli, &config)?;

    match cli.command {
        Command::Buckets { policy } => {
            let oss = DataManagementClient::new(tokens, &config)?;
            let mut buckets = std::pin::pin!(oss.enumerate_buckets());
            while let Some(bucket) = buckets.try_next().await? {
                if policy.is_some_and(|p| p.as_str() != bucket.policy_key) {
                    continue;
                }
                println!("Bucket: {}", bucket.bucket_key);
                let mut objects = std::pin::pin!(oss.enumerate_objects(&bucket.bucket_key));
                while let Some(object) = objects.try_next().await? {
                    println!("- {}", object.object_key);
                }
            }
        }
        Command::Objects { bucket } => {
            let oss = DataManagementClient::new(tokens, &config)?;
            for object in oss.list_objects(&bucket).await? {
                println!("{}\t{}\t{}", object.object_key, object.size, object.urn());
            }
        }
        Command::CreateBucket { bucket, policy, region } => {
            let oss = DataManagementClient::new(tokens, &config)?;
            let bucket = oss.create_bucket(&bucket, policy, region).await?;
            println!("{}", serde_json::to_string_pretty(&bucket)?);
        }
        Command::Upload { bucket, object, file, chunk_size_mb } => {
            if let Some(mb) = chunk_size_mb {
                config.chunk_size = chunk_size_bytes(mb)?;
            }
            let oss = DataManagementClient::new(tokens, &config)?;
            let uploaded = oss.upload_file(&bucket, &object, &file).await?;
            println!("{}", serde_json::to_string_pretty(&uploaded)?);
            println!("urn: {}", uploaded.urn());
        }
        Command::Translate { urn, svf2, region } => {
            let derivatives = DerivativesClient::new(tokens, &config)?;
            let views = ["2d", "3d"];
            let job = if svf2 {
                derivatives.translate_to_svf2(&urn, &views, region).await?
            } else {
                derivatives.translate_to_svf(&urn, &views, region).await?
            };
            println!("{}", serde_json::to_string_pretty(&job)?);
        }
        Command::Status { urn, region } => {
            let derivatives = DerivativesClient::new(tokens, &config)?;
            let status = derivatives.check_translation_status(&urn, region).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Token { scopes } => {
            let auth = AuthenticationClient::new(&config)?;
            let scopes: Vec<&str> = scopes.iter().map(String::as_str).collect();
            let token = auth
                .authenticate(
                    config.client_id.as_deref().unwrap_or_default(),
                    config.client_secret.as_deref().unwrap_or_default(),
                    &scopes,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), command = ?cli.command, "Starting");

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        return Err(e);
    }

    Ok(())
}
