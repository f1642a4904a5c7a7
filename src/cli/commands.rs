use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::record::{TaskPriority, TaskStatus};
use crate::ops::filter::FilterTab;

#[derive(Parser)]
#[command(name = "tt", about = concat!("tasktree v", env!("CARGO_PKG_VERSION"), " - task hierarchies from flat records"), version)]
pub struct Cli {
    /// Defaults to `tree`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<PathBuf>,

    /// Record batch to read (default: tasks.json)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Expansion state file (default: .tasktree-state.json)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Configuration file (default: tasktree.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the task tree
    Tree(TreeArgs),
    /// Show roll-up counters
    Stats(StatsArgs),
    /// Show one task and its subtasks
    Show(ShowArgs),
    /// Report records the tree builder dropped or corrected
    Check,
    /// Flip a task between expanded and collapsed
    Toggle(IdArg),
    /// Expand a task
    Expand(IdArg),
    /// Collapse a task
    Collapse(IdArg),
    /// Forget all expand/collapse choices
    Reset,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct TreeArgs {
    /// Filter tab
    #[arg(long, value_enum, default_value_t = FilterTab::All)]
    pub tab: FilterTab,
    /// Keep tasks with this status (repeatable)
    #[arg(long, value_enum)]
    pub status: Vec<TaskStatus>,
    /// Keep tasks with this priority (repeatable)
    #[arg(long, value_enum)]
    pub priority: Vec<TaskPriority>,
    /// Keep tasks assigned to this resource
    #[arg(long)]
    pub resource: Option<String>,
    /// Keep tasks whose name or description matches this regex
    #[arg(long = "match", value_name = "REGEX")]
    pub pattern: Option<String>,
    /// Ignore the saved state and show every subtask
    #[arg(long)]
    pub expand_all: bool,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Count only the tasks kept by this tab
    #[arg(long, value_enum, default_value_t = FilterTab::All)]
    pub tab: FilterTab,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
    /// Include ancestor context (parent chain)
    #[arg(long)]
    pub context: bool,
}

// ---------------------------------------------------------------------------
// Expansion command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}
