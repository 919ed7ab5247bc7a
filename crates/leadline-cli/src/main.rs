mod commands;
mod error;
mod sink;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    chat, completions, follow_ups, interactions, leads, report, serve, Context,
};
use crate::error::{exit_code_for, report_error};
use leadline_config as config;
use leadline_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "leadline", version, about = "leadline lead-management CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    #[command(name = "add-lead")]
    AddLead(leads::AddLeadArgs),
    #[command(name = "edit-lead")]
    EditLead(leads::EditLeadArgs),
    Show(leads::ShowArgs),
    List(leads::ListArgs),
    Delete(leads::DeleteArgs),
    /// Set the pipeline status of a lead
    Status(leads::StatusArgs),
    /// Move a lead to the next pipeline stage
    Advance(leads::AdvanceArgs),
    /// Leads grouped by status
    Pipeline,
    #[command(name = "add-note")]
    AddNote(interactions::AddNoteArgs),
    #[command(name = "follow-up")]
    FollowUp(follow_ups::FollowUpArgs),
    Tasks(follow_ups::TasksArgs),
    /// Mark the scheduled follow-up of a lead as done
    Complete(follow_ups::CompleteArgs),
    Report(report::ReportArgs),
    /// Run the lead ingestion endpoint
    Serve(serve::ServeArgs),
    /// Talk to the lead capture assistant in the terminal
    Chat(chat::ChatArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    match command {
        Command::Serve(args) => serve::serve(&app_config, open_store(db_path)?, args),
        Command::Chat(args) => {
            let store = if args.local {
                Some(open_store(db_path)?)
            } else {
                None
            };
            chat::chat(&app_config, store.as_ref(), args)
        }
        command => {
            let store = open_store(db_path)?;
            let ctx = Context {
                store: &store,
                json,
            };
            dispatch(&ctx, command)
        }
    }
}

fn dispatch(ctx: &Context<'_>, command: Command) -> Result<()> {
    match command {
        Command::AddLead(args) => leads::add_lead(ctx, args),
        Command::EditLead(args) => leads::edit_lead(ctx, args),
        Command::Show(args) => leads::show_lead(ctx, args),
        Command::List(args) => leads::list_leads(ctx, args),
        Command::Delete(args) => leads::delete_lead(ctx, args),
        Command::Status(args) => leads::set_status(ctx, args),
        Command::Advance(args) => leads::advance_lead(ctx, args),
        Command::Pipeline => leads::pipeline(ctx),
        Command::AddNote(args) => interactions::add_note(ctx, args),
        Command::FollowUp(args) => follow_ups::schedule_follow_up(ctx, args),
        Command::Tasks(args) => follow_ups::list_tasks(ctx, args),
        Command::Complete(args) => follow_ups::complete_follow_up(ctx, args),
        Command::Report(args) => report::report(ctx, args),
        Command::Completions(_) | Command::Serve(_) | Command::Chat(_) => {
            unreachable!("command handled before store dispatch")
        }
    }
}

fn open_store(db_path: Option<PathBuf>) -> Result<Store> {
    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    Ok(store)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
