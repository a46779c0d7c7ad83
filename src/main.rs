//! devsetup CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use devsetup::cli::{Cli, CommandContext, CommandDispatcher};
use devsetup::config::find_project_root;
use devsetup::ui::SetupTheme;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for diagnostics.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("devsetup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devsetup=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("devsetup starting with args: {:?}", cli);

    let theme = if cli.no_color {
        SetupTheme::plain()
    } else {
        SetupTheme::detect()
    };

    let project_root = cli.project.clone().unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_default();
        find_project_root(&cwd).unwrap_or(cwd)
    });

    let context = CommandContext::new(project_root, cli.config.clone(), theme.clone());
    let dispatcher = CommandDispatcher::new(context);

    match dispatcher.dispatch(&cli) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            eprintln!("{}", theme.format_error(&format!("Error: {}", e)));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
