use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use wg_core::{KnowledgeBase, Language, Result};
use wg_wiki::wikipedia::{DEFAULT_API_URL, DEFAULT_USER_AGENT};
use wg_wiki::{MemoryKnowledgeBase, WikipediaClient, WikipediaConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "JSON gateway in front of Wikipedia", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub upstream: UpstreamArgs,

    /// Also write logs to this file (rotated at startup once it exceeds 10 MB)
    #[arg(long, env = "WIKIGATE_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct UpstreamArgs {
    /// Default wiki language
    #[arg(long, env = "WIKIGATE_LANGUAGE", default_value = "ru", global = true)]
    pub language: Language,

    /// MediaWiki api.php endpoint, `{lang}` is replaced by the language code
    #[arg(long, env = "WIKIGATE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Overall timeout of upstream requests, in seconds
    #[arg(long, env = "WIKIGATE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    #[arg(long, env = "WIKIGATE_USER_AGENT", default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Serve a small built-in article set instead of calling Wikipedia
    #[arg(long, global = true)]
    pub offline: bool,
}

impl UpstreamArgs {
    pub fn wikipedia_config(&self) -> WikipediaConfig {
        WikipediaConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn knowledge_base(&self) -> Result<Arc<dyn KnowledgeBase>> {
        if self.offline {
            return Ok(Arc::new(MemoryKnowledgeBase::seeded()));
        }
        Ok(Arc::new(WikipediaClient::new(self.wikipedia_config())?))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "WIKIGATE_ADDR", default_value = "0.0.0.0:8000")]
        addr: String,
    },
    /// Search article titles
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Print the summary of an article
    Summary { title: String },
    /// Print the summary of a random article
    Random {
        /// Language of the random article, defaults to --language
        #[arg(long = "in")]
        language: Option<Language>,
    },
}
