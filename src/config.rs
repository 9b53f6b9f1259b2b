use crate::types::SortMode;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

pub const DEFAULT_NODE_URL: &str = "https://api.deathwing.me";
pub const DEFAULT_TAG: &str = "introduceyourself";

/// hivex - Hive discussion feed viewer
///
/// Browse a tag's discussions, find an account's first post, and read posts
/// with their comments, straight from a Hive API node.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "hivex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hive discussion feed viewer", long_about = None)]
pub struct CliArgs {
    /// Hive API node URL
    #[arg(long, global = true, env = "HIVE_NODE_URL")]
    pub node_url: Option<String>,

    /// RPC request timeout in milliseconds (1000-60000)
    #[arg(long, global = true, env = "RPC_TIMEOUT_MS")]
    pub rpc_timeout_ms: Option<u64>,

    /// Number of retry attempts for transient RPC failures (0-10)
    #[arg(long, global = true, env = "RPC_RETRIES")]
    pub rpc_retries: Option<u32>,

    /// Community tag for the feed (empty string for the unfiltered feed)
    #[arg(long, global = true, env = "HIVE_TAG")]
    pub tag: Option<String>,

    /// Posts per feed page (1-100)
    #[arg(long, global = true, env = "PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Page size used while searching for an account's first post (1-100)
    #[arg(long, global = true, env = "FIRST_POST_PAGE_SIZE")]
    pub first_post_page_size: Option<u32>,

    /// Maximum pages walked while searching for an account's first post (1-50)
    #[arg(long, global = true, env = "FIRST_POST_MAX_ROUNDS")]
    pub first_post_max_rounds: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List discussions for the configured tag
    Feed {
        /// Sort order: created, hot or trending
        #[arg(short, long, value_parser = clap::value_parser!(SortMode))]
        sort: Option<SortMode>,

        /// How many pages to walk ("load more" clicks + 1)
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Find the oldest post of an account
    FirstPost { username: String },
    /// Show one post and its direct comments
    Post { author: String, permlink: String },
    /// Show an account profile and its latest posts
    User {
        username: String,

        /// Number of latest posts to list
        #[arg(short, long, default_value_t = crate::profile::DEFAULT_BLOG_LIMIT)]
        limit: u32,
    },
    /// Open a deep link (hivex://v1/..., #/v1/..., /@author/permlink)
    Open { route: String },
}

impl Command {
    /// Range-check subcommand options the way [`Config::from_args`] checks globals.
    pub fn validated(self) -> Result<Command> {
        match self {
            Command::User { username, limit } => {
                let limit = validate_in_range(limit, 1, 100, "--limit")?;
                Ok(Command::User { username, limit })
            }
            other => Ok(other),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub node_url: String,
    pub rpc_timeout_ms: u64,
    pub rpc_retries: u32,
    pub tag: String,
    pub page_size: u32,
    pub first_post_page_size: u32,
    pub first_post_max_rounds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            rpc_timeout_ms: 8000,
            rpc_retries: 2,
            tag: DEFAULT_TAG.to_string(),
            page_size: 10,
            first_post_page_size: crate::first_post::DEFAULT_PAGE_SIZE,
            first_post_max_rounds: crate::first_post::DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl Config {
    /// Build a validated config from parsed arguments (env already folded in by clap).
    pub fn from_args(args: &CliArgs) -> Result<Config> {
        let d = Config::default();

        let node_url = args
            .node_url
            .clone()
            .map(|u| u.trim().to_string())
            .unwrap_or(d.node_url);
        validate_url(&node_url, "HIVE_NODE_URL")?;

        let rpc_timeout_ms = validate_in_range(
            args.rpc_timeout_ms.unwrap_or(d.rpc_timeout_ms),
            1000,
            60000,
            "RPC_TIMEOUT_MS",
        )?;
        let rpc_retries =
            validate_in_range(args.rpc_retries.unwrap_or(d.rpc_retries), 0, 10, "RPC_RETRIES")?;
        let page_size =
            validate_in_range(args.page_size.unwrap_or(d.page_size), 1, 100, "PAGE_SIZE")?;
        let first_post_page_size = validate_in_range(
            args.first_post_page_size.unwrap_or(d.first_post_page_size),
            1,
            100,
            "FIRST_POST_PAGE_SIZE",
        )?;
        let first_post_max_rounds = validate_in_range(
            args.first_post_max_rounds.unwrap_or(d.first_post_max_rounds),
            1,
            50,
            "FIRST_POST_MAX_ROUNDS",
        )?;

        let tag = args
            .tag
            .as_deref()
            .map(|t| t.trim().trim_start_matches('#').to_lowercase())
            .unwrap_or(d.tag);

        Ok(Config {
            node_url,
            rpc_timeout_ms,
            rpc_retries,
            tag,
            page_size,
            first_post_page_size,
            first_post_max_rounds,
        })
    }

    /// Print current configuration (useful for debugging)
    pub fn print_summary(&self) {
        eprintln!("hivex configuration:");
        eprintln!("  Node URL: {}", self.node_url);
        eprintln!("  RPC Timeout: {}ms", self.rpc_timeout_ms);
        eprintln!("  RPC Retries: {}", self.rpc_retries);
        if self.tag.is_empty() {
            eprintln!("  Tag: (all)");
        } else {
            eprintln!("  Tag: {}", self.tag);
        }
        eprintln!("  Page Size: {}", self.page_size);
        eprintln!(
            "  First Post Walk: {} x {}",
            self.first_post_max_rounds, self.first_post_page_size
        );
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<(Config, Command)> {
    let args = CliArgs::parse();
    let cfg = Config::from_args(&args)?;
    let command = args
        .command
        .unwrap_or(Command::Feed {
            sort: None,
            pages: 1,
        })
        .validated()?;
    Ok((cfg, command))
}
