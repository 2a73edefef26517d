use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod accounts;
mod active;
mod calendar;
mod calendar_command;
mod console;
mod current;
mod datetime;
mod delete_command;
mod edit_command;
mod error;
mod repository;
mod start_command;
mod status_command;
mod stop_command;
mod store;
mod tags;
mod tags_command;
mod time_entry;
mod user;
mod user_command;
mod week;
mod week_command;

use calendar_command::{CalendarArgs, CalendarCommand};
use delete_command::{DeleteArgs, DeleteCommand};
use edit_command::{EditArgs, EditCommand};
use repository::JsonFileRepository;
use start_command::{StartArgs, StartCommand};
use status_command::{StatusArgs, StatusCommand};
use stop_command::{StopArgs, StopCommand};
use tags_command::TagsCommand;
use user_command::{UserArgs, UserCommand};
use week_command::{WeekArgs, WeekCommand};

/// 複数の利用者で作業時間を記録するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- --user alice start "write report"
/// $ cargo run -- --user alice week
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        short = 'u',
        long = "user",
        global = true,
        help = "Username of the acting user"
    )]
    user: Option<String>,

    #[clap(
        long = "file",
        global = true,
        help = "Path of the store file",
        parse(from_os_str)
    )]
    file: Option<PathBuf>,

    #[clap(short = 'v', long = "verbose", global = true, help = "Enables debug logging")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Start a new time entry
    Start(StartArgs),
    /// Stop the running entry
    Stop(StopArgs),
    /// Edit an entry
    Edit(EditArgs),
    /// Delete an entry
    Delete(DeleteArgs),
    /// Show entries of a week grouped by day
    Week(WeekArgs),
    /// Show tag counts
    Tags,
    /// Show the currently running entry
    Status(StatusArgs),
    /// Show a month calendar
    Calendar(CalendarArgs),
    /// Manage user accounts
    User(UserArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logger(args.verbose).context("Failed to set up logger")?;

    let repository = JsonFileRepository::new(args.file)?;
    let mut stdout = io::stdout();
    match args.subcommand {
        SubCommands::Start(start) => {
            let entry = StartCommand::new(&repository)
                .run(required_user(&args.user)?, start)
                .await?;
            println!("Started: {} ({})", entry.title, entry.id);
        }
        SubCommands::Stop(stop) => {
            let entry = StopCommand::new(&repository)
                .run(required_user(&args.user)?, stop)
                .await?;
            println!("Stopped: {} ({})", entry.title, entry.id);
        }
        SubCommands::Edit(edit) => {
            let entry = EditCommand::new(&repository)
                .run(required_user(&args.user)?, edit)
                .await?;
            println!("Edited: {} ({})", entry.title, entry.id);
        }
        SubCommands::Delete(delete) => {
            DeleteCommand::new(&repository)
                .run(required_user(&args.user)?, delete)
                .await?;
            println!("Deleted.");
        }
        SubCommands::Week(week) => {
            WeekCommand::new(&repository)
                .run(required_user(&args.user)?, week, &mut stdout)
                .await?;
        }
        SubCommands::Tags => {
            TagsCommand::new(&repository)
                .run(required_user(&args.user)?, &mut stdout)
                .await?;
        }
        SubCommands::Status(status) => {
            StatusCommand::new(&repository)
                .run(required_user(&args.user)?, status, &mut stdout)
                .await?;
        }
        SubCommands::Calendar(calendar) => {
            CalendarCommand::new(&repository)
                .run(required_user(&args.user)?, calendar, &mut stdout)
                .await?;
        }
        SubCommands::User(user) => {
            UserCommand::new(&repository)
                .run(args.user.as_deref(), user, &mut stdout)
                .await?;
        }
    }

    Ok(())
}

/// 操作する利用者の利用者名を取得する。指定されていない場合はエラーを返す。
fn required_user(user: &Option<String>) -> Result<&str> {
    user.as_deref().context("--user is required for this command")
}

/// ログ出力を初期化する。
fn setup_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let colors = fern::colors::ColoredLevelConfig::new();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("Failed to initialize logger")?;

    Ok(())
}
