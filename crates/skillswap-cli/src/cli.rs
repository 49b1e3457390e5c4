use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "skillswap",
    about = "Skillswap: replay swap-request event logs and inspect viewer dashboards",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay an event log and print the resulting requests
    Replay {
        /// Path to users JSONL
        #[arg(long)]
        users: String,

        /// Path to swap events JSONL
        #[arg(long)]
        events: String,

        /// Engine config TOML (defaults apply when omitted)
        #[arg(long)]
        config: Option<String>,

        /// Skip refused events instead of stopping at the first one
        #[arg(long)]
        lenient: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay an event log and print one viewer's received/sent dashboard
    View {
        /// Viewer user ID
        viewer_id: String,

        /// Path to users JSONL
        #[arg(long)]
        users: String,

        /// Path to swap events JSONL
        #[arg(long)]
        events: String,

        /// Engine config TOML (defaults apply when omitted)
        #[arg(long)]
        config: Option<String>,

        /// Only list requests in this status (summary counts stay complete)
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    #[value(name = "pending")]
    Pending,
    #[value(name = "accepted")]
    Accepted,
    #[value(name = "rejected")]
    Rejected,
    #[value(name = "completed")]
    Completed,
}
