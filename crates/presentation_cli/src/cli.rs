//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::{ItemId, ItemKind, MeetingId, ReviewMethod, ReviewStatus};

/// ReviewDesk CLI
#[derive(Debug, Parser)]
#[command(name = "reviewdesk-cli")]
#[command(author, version, about = "Review approval and meeting capacity workflow", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./reviewdesk.toml if present)
    #[arg(short, long, env = "REVIEWDESK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite state file, overriding the configured one
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Who is acting (default: review.default_actor from configuration)
    #[arg(short, long, global = true)]
    pub actor: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the state file and provision configured meetings
    Init,

    /// Print the effective configuration as TOML
    Config,

    /// Register a new item for review
    Register {
        /// Title of the item
        title: String,

        /// Kind of item (project, tracking-report, equipment-booking, reagent-request)
        #[arg(short, long, default_value = "project")]
        kind: ItemKind,
    },

    /// List items
    List {
        /// Only items in this status
        #[arg(short, long)]
        status: Option<ReviewStatus>,
    },

    /// Show meetings, earliest first, with remaining capacity
    Meetings,

    /// Print the meeting offered by default for the next approval
    SelectMeeting,

    /// Show an item and, while it is pending, the approval options
    Show {
        /// Item id
        item: ItemId,
    },

    /// Approve an item and route it through a meeting
    Approve {
        /// Item id
        item: ItemId,

        #[command(flatten)]
        routing: RoutingArgs,
    },

    /// Return an item with required changes
    Reject {
        /// Item id
        item: ItemId,

        /// Required changes
        #[arg(short = 'm', long)]
        comment: String,
    },

    /// Ask for a revision of an item
    RequestRevision {
        /// Item id
        item: ItemId,

        /// What to revise
        #[arg(short = 'm', long)]
        comment: String,
    },

    /// Re-open a decided item for a new review cycle
    Resubmit {
        /// Item id
        item: ItemId,

        /// Note on what changed
        #[arg(short = 'm', long, default_value = "")]
        comment: String,
    },

    /// Apply one decision to several items
    #[command(subcommand)]
    Batch(BatchAction),

    /// Show the audit trail of an item
    History {
        /// Item id
        item: ItemId,
    },
}

/// Lane and meeting for an approval
#[derive(Debug, Args)]
pub struct RoutingArgs {
    /// Review lane (quick or meeting)
    #[arg(long)]
    pub method: ReviewMethod,

    /// Meeting id
    #[arg(long, conflicts_with = "default_meeting")]
    pub meeting: Option<MeetingId>,

    /// Route through the default meeting instead of naming one
    #[arg(long)]
    pub default_meeting: bool,

    /// Optional comment
    #[arg(short = 'm', long)]
    pub comment: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum BatchAction {
    /// Approve every pending selected item
    Approve {
        #[command(flatten)]
        routing: RoutingArgs,

        /// Selected item ids
        #[arg(required = true)]
        items: Vec<ItemId>,
    },

    /// Return every pending selected item
    Reject {
        /// Required changes
        #[arg(short = 'm', long)]
        comment: String,

        /// Selected item ids
        #[arg(required = true)]
        items: Vec<ItemId>,
    },

    /// Ask for a revision of every pending selected item
    RequestRevision {
        /// What to revise
        #[arg(short = 'm', long)]
        comment: String,

        /// Selected item ids
        #[arg(required = true)]
        items: Vec<ItemId>,
    },
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero_keeps_configured_filter() {
        assert_eq!(log_filter_from_verbosity(0), None);
    }

    #[test]
    fn log_filter_verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
