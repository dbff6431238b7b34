//! CLI commands and argument parsing

use crate::config::ACCESS_TOKEN_ENV;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shoebox picturebook CLI
#[derive(Parser, Debug)]
#[command(name = "shoebox-picturebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Access token for the collection API
    #[arg(long, global = true, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Bucket provider URI
    #[arg(long, global = true, default_value = "shoebox://")]
    pub source_uri: String,

    /// Captioner provider URI (defaults to the source URI)
    #[arg(long, global = true)]
    pub caption_uri: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Provider URI used for captions
    pub fn caption_uri(&self) -> &str {
        self.caption_uri.as_deref().unwrap_or(&self.source_uri)
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every resource in the shoebox
    Gather {
        /// Stop after this many resources
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every resource with its caption
    Captions {
        /// Stop after this many resources
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the caption for one resource
    Caption {
        /// Resource key
        key: String,
    },

    /// Print size and modification time of one media file
    Attributes {
        /// Media URI
        key: String,
    },

    /// Download one media file
    Fetch {
        /// Media URI
        key: String,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
}
