use aw_client::config::{default_token_path, DEFAULT_BASE_URL};
use aw_client::ClientConfig;
use aw_core::{ArticleId, Result, TOPICS};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Log in and manage articles on an articles backend", long_about = None)]
pub struct Cli {
    /// Root URL of the articles backend
    #[arg(long, env = "AW_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,
    /// File the session token is kept in between runs
    #[arg(long, env = "AW_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,
    /// More logging (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn client_config(&self) -> Result<ClientConfig> {
        let token_path = self.token_file.clone().unwrap_or_else(default_token_path);
        Ok(ClientConfig::new(&self.base_url)?.with_token_path(token_path))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and keep the session token
    Login { username: String, password: String },
    /// Forget the session token
    Logout,
    /// List all articles
    List,
    /// Create an article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        #[arg(long, value_parser = PossibleValuesParser::new(TOPICS))]
        topic: String,
    },
    /// Change fields of an article
    Update {
        id: ArticleId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(TOPICS))]
        topic: Option<String>,
    },
    /// Delete an article
    Delete { id: ArticleId },
    /// Interactive terminal interface
    Tui,
    /// Run the in-memory articles backend
    Serve {
        #[arg(long, default_value = "127.0.0.1:9000")]
        addr: SocketAddr,
        /// Only accept this username (requires --password)
        #[arg(long, requires = "password")]
        username: Option<String>,
        /// Only accept this password (requires --username)
        #[arg(long, requires = "username")]
        password: Option<String>,
        /// Start without the sample articles
        #[arg(long)]
        empty: bool,
    },
}
