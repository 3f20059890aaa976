//! Command-line front end for the planner.
//!
//! # Responsibility
//! - Map subcommands onto `slotplan_core::Planner` operations.
//! - Own process concerns: configuration, logging bootstrap, exit codes.
//!
//! # Invariants
//! - Exit code `0` on success, `1` with a message on stderr otherwise.

mod config;
mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use slotplan_core::db::open_db;
use slotplan_core::{
    core_version, default_log_level, init_logging, DropOutcome, Planner, SlotKey, SqliteKvStore,
    TaskId, ViewKind, YearMonth,
};
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Todo list with a drag-to-schedule calendar.
#[derive(Debug, Parser)]
#[command(name = "slotplan", version)]
struct Cli {
    /// SQLite file (overrides SLOTPLAN_DB_PATH).
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the core library version.
    Version,
    #[command(flatten)]
    Planner(PlannerCommand),
}

/// Subcommands that open the database.
#[derive(Debug, Subcommand)]
enum PlannerCommand {
    /// Add a task to the unscheduled list.
    Add { text: String },
    /// List unscheduled tasks in insertion order.
    List,
    /// Delete a task and every scheduled copy of it.
    Delete { id: i64 },
    /// Drop a task onto a slot key, e.g. `2024-5-10` or `2024-5-10-9-30`.
    Schedule { id: i64, slot_key: String },
    /// Show the contents of one slot.
    Slot { slot_key: String },
    /// Month grid (day slots).
    Month {
        #[arg(long, requires = "month")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
        /// Months to step from the anchor (negative = back).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Half-hour schedule of the current week.
    Week,
    /// Half-hour schedule of one day.
    Day {
        /// YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Days to step from the anchor (negative = back).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let command = match cli.command {
        Command::Version => return Ok(format!("slotplan_core {}\n", core_version())),
        Command::Planner(command) => command,
    };

    let db_path = config::resolve_db_path(cli.db_path);
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        db_path.display()
    );
    let store = SqliteKvStore::try_new(open_db(&db_path)?)?;
    let mut planner = Planner::load(store)?;

    execute(&mut planner, command)
}

fn execute(planner: &mut Planner<SqliteKvStore>, command: PlannerCommand) -> CliResult<String> {
    let output = match command {
        PlannerCommand::Add { text } => match planner.add_task(&text)? {
            Some(task) => format!("added {}\n", render::task_line(&task)),
            None => "nothing added: task text is blank\n".to_string(),
        },
        PlannerCommand::List => render::task_list(planner.tasks()),
        PlannerCommand::Delete { id } => {
            if planner.delete_task(TaskId::new(id))? {
                format!("deleted {id}\n")
            } else {
                format!("no task {id}\n")
            }
        }
        PlannerCommand::Schedule { id, slot_key } => {
            let key = SlotKey::parse(&slot_key)?;
            let outcome = planner.schedule_task(TaskId::new(id), &key)?;
            match outcome {
                DropOutcome::Placed => format!("scheduled {id} at {key}\n"),
                DropOutcome::Duplicate => format!("{id} is already at {key}\n"),
                DropOutcome::TaskMissing => return Err(format!("no task {id}").into()),
                other => format!("not scheduled: {}\n", other.as_str()),
            }
        }
        PlannerCommand::Slot { slot_key } => {
            let key = SlotKey::parse(&slot_key)?;
            render::task_list(&planner.slot(&key))
        }
        PlannerCommand::Month {
            year,
            month,
            offset,
        } => {
            planner.set_view(ViewKind::Month);
            if let (Some(year), Some(month)) = (year, month) {
                let anchor = YearMonth::new(year, month)
                    .ok_or_else(|| format!("invalid month {year}-{month}"))?;
                planner.set_month(anchor);
            }
            let mut cursor = *planner.cursor();
            if !cursor.shift_month(offset) {
                return Err(format!("month offset {offset} is out of range").into());
            }
            planner.set_month(cursor.month());
            render::month(&planner.month_view())
        }
        PlannerCommand::Week => {
            planner.set_view(ViewKind::Week);
            render::week(&planner.week_view())
        }
        PlannerCommand::Day { date, offset } => {
            planner.set_view(ViewKind::Day);
            if let Some(date) = date {
                planner.set_day(date);
            }
            let mut cursor = *planner.cursor();
            if !cursor.shift_day(offset) {
                return Err(format!("day offset {offset} is out of range").into());
            }
            planner.set_day(cursor.day());
            render::day(&planner.day_view())
        }
    };
    Ok(output)
}
