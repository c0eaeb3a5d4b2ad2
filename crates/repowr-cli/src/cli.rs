use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "repowr",
    about = "repOWR: validate transfer memos, resolve addresses, compute reputation",
    version
)]
pub struct Cli {
    /// TOML config file (defaults to ./repowr.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate one memo and print the outcome
    Validate {
        /// Memo text
        memo: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode an address and print its canonical key
    Address {
        /// Address in raw, friendly or unknown form
        address: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ingest a JSONL transfer export into the store
    Ingest {
        /// Path to transfers JSONL
        #[arg(long)]
        transfers: String,

        /// Path to store JSONL (overrides config)
        #[arg(long)]
        store: Option<String>,

        /// Only ingest the first N transfers
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show reputation and profile for an address
    Reputation {
        /// Address in any supported form
        address: String,

        /// Path to store JSONL (overrides config)
        #[arg(long)]
        store: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent ratings received and given by an address
    Reviews {
        /// Address in any supported form
        address: String,

        /// Path to store JSONL (overrides config)
        #[arg(long)]
        store: Option<String>,

        /// Ratings per list (overrides config)
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank addresses by reputation
    Top {
        /// Path to store JSONL (overrides config)
        #[arg(long)]
        store: Option<String>,

        /// Number of entries (overrides config)
        #[arg(long)]
        count: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
