use std::path::{Path, PathBuf};

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::records_io::{self, RECORDS_FILE};
use crate::io::state::{self, STATE_FILE};
use crate::model::calendar::Calendar;
use crate::model::config::Config;
use crate::model::node::{self, TaskNode};
use crate::ops::aggregate;
use crate::ops::build::{build_tree, build_tree_with_report};
use crate::ops::expansion::{all_rows, visible_rows};
use crate::ops::filter::filter_by_tab;
use crate::ops::query::TaskQuery;

/// Failures of a command itself, as opposed to loading its inputs
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("invalid --match pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("{0} record(s) were dropped while building the tree")]
    ChecksFailed(usize),
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let paths = Paths::from_cli(&cli);
    tracing::debug!(
        records = %paths.records.display(),
        state = %paths.state.display(),
        config = %paths.config.display(),
        "resolved project paths"
    );

    match cli.command {
        None => cmd_tree(&paths, TreeArgs::default(), json),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Tree(args) => cmd_tree(&paths, args, json),
            Commands::Stats(args) => cmd_stats(&paths, args, json),
            Commands::Show(args) => cmd_show(&paths, args, json),
            Commands::Check => cmd_check(&paths, json),

            // Expansion state
            Commands::Toggle(args) => cmd_expansion(&paths, &args.id, Change::Toggle, json),
            Commands::Expand(args) => cmd_expansion(&paths, &args.id, Change::Set(true), json),
            Commands::Collapse(args) => cmd_expansion(&paths, &args.id, Change::Set(false), json),
            Commands::Reset => cmd_reset(&paths, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Files a command reads and writes, resolved against the project directory
struct Paths {
    records: PathBuf,
    state: PathBuf,
    config: PathBuf,
}

impl Paths {
    fn from_cli(cli: &Cli) -> Self {
        let root = cli
            .project_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let resolve = |given: &Option<PathBuf>, default: &str| match given {
            Some(p) => root.join(p),
            None => root.join(default),
        };
        Paths {
            records: resolve(&cli.file, RECORDS_FILE),
            state: resolve(&cli.state, STATE_FILE),
            config: resolve(&cli.config, CONFIG_FILE),
        }
    }
}

fn load_config(paths: &Paths) -> Result<(Config, Calendar), Box<dyn std::error::Error>> {
    let config = config_io::read_config(&paths.config)?;
    let calendar = config_io::calendar_for(&config)?;
    Ok((config, calendar))
}

fn load_tree(path: &Path) -> Result<Vec<TaskNode>, Box<dyn std::error::Error>> {
    let records = records_io::load_records(path)?;
    Ok(build_tree(&records))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn query_from_args(args: &TreeArgs) -> Result<TaskQuery, CommandError> {
    let pattern = args.pattern.as_deref().map(Regex::new).transpose()?;
    Ok(TaskQuery {
        tab: args.tab,
        statuses: args.status.clone(),
        priorities: args.priority.clone(),
        resource: args.resource.clone(),
        pattern,
    })
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_tree(paths: &Paths, args: TreeArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let query = query_from_args(&args)?;
    let (config, calendar) = load_config(paths)?;
    let tree = load_tree(&paths.records)?;
    let filtered = query.apply(&tree, &calendar);

    if json {
        let output = TreeJson {
            tab: args.tab,
            tasks: &filtered,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if filtered.is_empty() {
        println!("no matching tasks");
        return Ok(());
    }
    let rows = if args.expand_all {
        all_rows(&filtered)
    } else {
        let expansion = state::load_expansion_state(&paths.state);
        visible_rows(&filtered, &expansion)
    };
    print_lines(&format_rows(&rows, &config.display));
    Ok(())
}

fn cmd_stats(paths: &Paths, args: StatsArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, calendar) = load_config(paths)?;
    let tree = load_tree(&paths.records)?;
    let scoped = filter_by_tab(&tree, args.tab, &calendar);
    let counts = aggregate::summarize(&scoped, &calendar);
    let statuses = aggregate::status_counts(&scoped);

    if json {
        let output = StatsJson {
            tab: args.tab,
            counts,
            statuses,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_lines(&format_stats(&counts, &statuses));
    }
    Ok(())
}

fn cmd_show(paths: &Paths, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _) = load_config(paths)?;
    let tree = load_tree(&paths.records)?;
    let task = node::find_node(&tree, &args.id)
        .ok_or_else(|| CommandError::TaskNotFound(args.id.clone()))?;
    let ancestors = node::ancestors(&tree, &args.id).unwrap_or_default();

    if json {
        // JSON always includes ancestors
        let output = ShowJson {
            ancestors: ancestors.iter().map(|a| &a.record).collect(),
            task,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if args.context {
        print_lines(&format_task_detail_with_context(
            &ancestors,
            task,
            &config.display,
        ));
    } else {
        print_lines(&format_task_detail(task, &config.display));
    }
    Ok(())
}

fn cmd_check(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = records_io::load_records(&paths.records)?;
    let report = build_tree_with_report(&records);
    let placed: usize = report.roots.iter().map(TaskNode::subtree_len).sum();
    let dropped = report.dropped().count();

    if json {
        let output = CheckJson {
            valid: dropped == 0,
            placed,
            issues: &report.issues,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if !report.issues.is_empty() {
            println!("Issues:");
            for issue in &report.issues {
                println!("{}", format_issue(issue));
            }
            println!();
        }
        println!("{} of {} records placed", placed, records.len());
        if dropped == 0 {
            println!("✓ tree is valid");
        } else {
            println!("✗ {} record(s) dropped", dropped);
        }
    }

    if dropped > 0 {
        return Err(CommandError::ChecksFailed(dropped).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Expansion state handlers
// ---------------------------------------------------------------------------

enum Change {
    Toggle,
    Set(bool),
}

fn cmd_expansion(
    paths: &Paths,
    id: &str,
    change: Change,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(&paths.records)?;
    let task = node::find_node(&tree, id).ok_or_else(|| CommandError::TaskNotFound(id.to_string()))?;

    let current = state::load_expansion_state(&paths.state).ensure_defaults(&tree);
    let next = match change {
        Change::Toggle => current.toggle(id, task.level()),
        Change::Set(expanded) => current.set(id, expanded),
    };
    state::write_expansion_state(&paths.state, &next)?;

    let expanded = next.is_expanded(id, task.level());
    tracing::debug!(id, expanded, entries = next.len(), "saved expansion state");
    if json {
        let output = ExpansionJson { id, expanded };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let word = if expanded { "expanded" } else { "collapsed" };
        if task.has_children() {
            println!("{} {}", id, word);
        } else {
            println!("{} {} (no subtasks)", id, word);
        }
    }
    Ok(())
}

fn cmd_reset(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let removed = state::remove_expansion_state(&paths.state)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ResetJson { removed })?);
    } else if removed {
        println!("expansion state cleared");
    } else {
        println!("no saved expansion state");
    }
    Ok(())
}
