//! `td` -- per-user todo notifications.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;
mod styles;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Filter used by `--verbose`.
const VERBOSE_FILTER: &str = "td=debug,todo_service=debug,todo_storage=debug,todo_git=debug";

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();
    let ctx = RuntimeContext::from_global_args(&cli.global);

    init_logging(&ctx);

    let result = match cli.command {
        Some(Commands::Init(args)) => commands::init::run(&ctx, &args),
        Some(Commands::Create(args)) => commands::create::run(&ctx, &args),
        Some(Commands::Done(args)) => commands::done::run(&ctx, &args),
        Some(Commands::DoneAll(args)) => commands::done::run_all(&ctx, &args),
        Some(Commands::List(args)) => commands::list::run(&ctx, &args),
        Some(Commands::Show(args)) => commands::show::run(&ctx, &args),
        Some(Commands::Count(args)) => commands::count::run(&ctx, &args),
        Some(Commands::Issue(args)) => commands::issue::run(&ctx, &args),
        Some(Commands::Mr(args)) => commands::mr::run(&ctx, &args),
        Some(Commands::Note(args)) => commands::note::run(&ctx, &args),
        Some(Commands::Label(args)) => commands::label::run(&ctx, &args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr. `--verbose` wins, then `--quiet`, then the
/// configured `log.filter`.
fn init_logging(ctx: &RuntimeContext) {
    let filter = if ctx.verbose {
        VERBOSE_FILTER.to_string()
    } else if ctx.quiet {
        "error".to_string()
    } else {
        ctx.configured_log_filter()
            .unwrap_or_else(|| "warn".to_string())
    };
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
