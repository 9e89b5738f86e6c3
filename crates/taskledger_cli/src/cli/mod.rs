use clap::{Parser, Subcommand};
use taskledger_core::config::{ConfigOverrides, canonical_key};
use taskledger_core::error::AppError;
use taskledger_core::model::{Priority, TaskId};
use taskledger_core::view::Filter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskledger add "Buy milk" --priority high
    Add {
        text: Option<String>,
        #[arg(short, long, value_name = "low|medium|high")]
        priority: Option<String>,
    },
    /// Change a task's text and priority
    ///
    /// Example: taskledger edit 1718000000000 "Buy oat milk" -p medium
    Edit {
        id: String,
        text: String,
        /// Keeps the current priority when omitted
        #[arg(short, long, value_name = "low|medium|high")]
        priority: Option<String>,
    },
    /// Mark a task completed, or reopen it
    ///
    /// Example: taskledger toggle 1718000000000
    Toggle { id: String },
    /// Delete a task (its history is kept)
    ///
    /// Example: taskledger delete 1718000000000
    Delete { id: String },
    /// List tasks
    ///
    /// Example: taskledger list --filter active
    /// Example: taskledger list --search milk
    List {
        /// all, active or completed
        #[arg(short, long)]
        filter: Option<String>,
        /// Case-insensitive text search; overrides --filter
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the change history of a task, newest first
    ///
    /// Example: taskledger history 1718000000000
    History { id: String },
    /// Show task counts
    ///
    /// Example: taskledger stats
    Stats,
}

pub fn parse_task_id(raw: &str) -> Result<TaskId, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    trimmed
        .parse()
        .map_err(|_| AppError::invalid_input("id must be a number"))
}

pub fn parse_priority(raw: Option<&str>, fallback: Priority) -> Result<Priority, AppError> {
    match raw {
        Some(value) => value.parse(),
        None => Ok(fallback),
    }
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DefaultPriority,
    DefaultFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let field = canonical_key(key_raw);
    let target = match field.as_str() {
        "" => return Err("override key cannot be empty".to_string()),
        "theme" => ConfigOverrideTarget::Theme,
        "default_priority" | "priority" => ConfigOverrideTarget::DefaultPriority,
        "default_filter" | "filter" => ConfigOverrideTarget::DefaultFilter,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride {
        target,
        value: value_raw.trim().to_string(),
    })
}

pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)
            .map_err(|message| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {message}")))?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DefaultPriority => {
                overrides.default_priority = Some(parsed.value.parse()?)
            }
            ConfigOverrideTarget::DefaultFilter => {
                overrides.default_filter = Some(Filter::parse(&parsed.value))
            }
        }
    }
    Ok(overrides)
}
