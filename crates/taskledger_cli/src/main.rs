use clap::Parser;
use std::ffi::OsString;
use std::io;
use tabled::{Table, Tabled};
use taskledger_cli::cli::{Cli, Command, collect_config_overrides, parse_priority, parse_task_id};
use taskledger_cli::repl::{run_session, usage_error};
use taskledger_core::TaskBook;
use taskledger_core::config::{Config, Palette, load_config_with_fallback, merge_overrides};
use taskledger_core::error::AppError;
use taskledger_core::model::{HistoryRecord, Priority, Task, TaskId};
use taskledger_core::view::Filter;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKLEDGER_LOG";
const BIN_NAME: &str = "taskledger";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: TaskId,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Priority")]
    priority: Priority,
    #[tabled(rename = "Task")]
    text: String,
}

fn init_logging() {
    // Off unless asked for; logs go to stderr so stdout stays parseable.
    let filter = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn completion_mark(task: &Task) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    mark.to_string()
}

/// Completed tasks are muted; open high-priority tasks are accented.
fn highlight(task: &Task, palette: &Palette) -> String {
    if task.completed {
        palette.mutedize(&task.text)
    } else if task.priority == Priority::High {
        palette.accentize(&task.text)
    } else {
        task.text.clone()
    }
}

fn print_tasks_plain(tasks: &[Task], palette: &Palette) {
    if tasks.is_empty() {
        println!("{}", palette.mutedize("No tasks"));
        return;
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id,
        done: completion_mark(task),
        priority: task.priority,
        text: highlight(task, palette),
    });
    println!("{}", Table::new(rows));
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn local_time(timestamp: &str) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    taskledger_core::clock::parse_timestamp(timestamp)
        .ok()
        .and_then(|at: OffsetDateTime| at.to_offset(offset).format(&format).ok())
        .unwrap_or_else(|| timestamp.to_string())
}

fn print_history_plain(records: &[&HistoryRecord], palette: &Palette) {
    if records.is_empty() {
        println!("{}", palette.mutedize("No history"));
        return;
    }

    for record in records {
        println!(
            "{} - {}",
            palette.mutedize(&local_time(&record.timestamp)),
            record.describe()
        );
    }
}

fn existing_task(book: &TaskBook, raw_id: &str) -> Result<Task, AppError> {
    let id = parse_task_id(raw_id)?;
    book.task(id)
        .cloned()
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

fn required_text(text: Option<&str>) -> Result<&str, AppError> {
    match text {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::invalid_input("text is required")),
    }
}

fn run_command(book: &mut TaskBook, base_config: &Config, cli: Cli) -> Result<(), AppError> {
    let overrides = collect_config_overrides(&cli.config_override)?;
    let config = merge_overrides(base_config, &overrides);
    let palette = config.palette();
    tracing::debug!(command = ?cli.command, json = cli.json, "running command");

    match cli.command {
        Command::Add { text, priority } => {
            let text = required_text(text.as_deref())?;
            let priority = parse_priority(priority.as_deref(), config.priority())?;
            let task = book
                .add_task(text, priority)
                .ok_or_else(|| AppError::invalid_input("text is required"))?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!(
                    "Added task: {} ({})",
                    highlight(&task, &palette),
                    task.id
                );
            }
        }
        Command::Edit { id, text, priority } => {
            let current = existing_task(book, &id)?;
            let text = required_text(Some(text.as_str()))?;
            let priority = parse_priority(priority.as_deref(), current.priority)?;
            let edit = book.edit_task(current.id, text, priority);
            let task = book.task(current.id).cloned().unwrap_or(current);
            if cli.json {
                print_json(&task)?;
            } else if edit.is_some() {
                println!("Updated task: {} ({})", task.text, task.id);
            } else {
                println!(
                    "{}",
                    palette.mutedize(&format!("No changes: {} ({})", task.text, task.id))
                );
            }
        }
        Command::Toggle { id } => {
            let current = existing_task(book, &id)?;
            let task = book.toggle_task(current.id).unwrap_or(current);
            if cli.json {
                print_json(&task)?;
            } else if task.completed {
                println!("Completed task: {} ({})", task.text, task.id);
            } else {
                println!("Reopened task: {} ({})", task.text, task.id);
            }
        }
        Command::Delete { id } => {
            let current = existing_task(book, &id)?;
            let task = book.delete_task(current.id).unwrap_or(current);
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.text, task.id);
            }
        }
        Command::List { filter, search } => {
            let filter = filter
                .as_deref()
                .map(Filter::parse)
                .unwrap_or_else(|| config.filter());
            let search = search.as_deref().map(str::trim).unwrap_or("");
            let tasks = book.view(filter, search);
            if cli.json {
                print_json(&tasks)?;
            } else {
                print_tasks_plain(&tasks, &palette);
            }
        }
        Command::History { id } => {
            // History outlives its task, so the id does not have to exist.
            let id = parse_task_id(&id)?;
            let records = book.history(id);
            if cli.json {
                print_json(&records)?;
            } else {
                print_history_plain(&records, &palette);
            }
        }
        Command::Stats => {
            let stats = book.statistics();
            if cli.json {
                print_json(&stats)?;
            } else {
                println!(
                    "Total: {} | Completed: {} | Active: {}",
                    stats.total, stats.completed, stats.active
                );
            }
        }
    }

    Ok(())
}

/// Parses `argv` (program name first) and runs it. Help and version output
/// count as success.
fn dispatch<I, T>(book: &mut TaskBook, config: &Config, argv: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(argv) {
        Ok(cli) => run_command(book, config, cli),
        Err(err) if !err.use_stderr() => Ok(err.print()?),
        Err(err) => Err(usage_error(&err)),
    }
}

fn load_config() -> Config {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: config ignored: {}", err);
    }
    loaded.config
}

fn fail(err: AppError) -> ! {
    eprintln!("ERROR: {}", err);
    std::process::exit(1);
}

fn main() {
    init_logging();

    let config = load_config();
    let mut book = match TaskBook::open_default() {
        Ok(book) => book,
        Err(err) => fail(err),
    };

    let result = if std::env::args_os().len() > 1 {
        dispatch(&mut book, &config, std::env::args_os())
    } else {
        run_session(io::stdin().lock(), |words| {
            let argv = std::iter::once(BIN_NAME.to_string()).chain(words);
            dispatch(&mut book, &config, argv)
        })
    };

    if let Err(err) = result {
        fail(err);
    }
}
