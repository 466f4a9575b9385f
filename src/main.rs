//! mdocx: Markdown to Word CLI Tool
//!
//! Converts a markdown file into a `.docx` document, either straight from
//! command-line flags or through the interactive wizard.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdocx::cli::{run_wizard, Cli, WizardResult};
use mdocx::pipeline::{ConversionPipeline, Flags, Session, WatchEvent};
use mdocx::report::ConversionSummary;
use mdocx::utils::{
    print_banner, print_completion, print_config, print_error, print_warning, print_watch_line,
    PhaseSpinner,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some((input, flags)) = resolve_invocation(&cli)? else {
        println!("Cancelled by user.");
        return Ok(());
    };

    init_tracing(flags.verbose());

    let project_dir = std::env::current_dir().context("Failed to read the current directory")?;
    let mut session = Session::new(ConversionPipeline::with_defaults(project_dir));

    let compact = flags.compact();
    if !compact {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&input, &flags);
    }

    let spinner = if compact {
        PhaseSpinner::hidden()
    } else {
        PhaseSpinner::new()
    };
    let report = session
        .run(&input, &flags, &mut |phase| spinner.update(phase))
        .map_err(|e| {
            let phase = e.phase();
            anyhow::Error::new(e).context(format!("Conversion stopped while {}", phase))
        })?;

    let summary = ConversionSummary::from_report(&report);
    if compact {
        println!("{}", summary.compact_line());
        for warning in &summary.warnings {
            print_warning(warning);
        }
    } else {
        summary.display();
        print_completion(&report.output);
    }

    if session.watcher().is_active() {
        print_watch_line(&format!(
            "Watching {} for changes (Ctrl+C to stop)",
            input.display()
        ));
        session.watch(&input, &flags, |event| match event {
            WatchEvent::Reconverted(report) => {
                print_watch_line(&format!("Rebuilt {}", report.output.display()));
            }
            WatchEvent::Failed(e) => {
                print_error(&format!("Rebuild failed while {}: {}", e.phase(), e));
            }
        });
    }

    Ok(())
}

/// Input and flags from the wizard or the command line; `None` when the
/// user quit the wizard
fn resolve_invocation(cli: &Cli) -> Result<Option<(PathBuf, Flags)>> {
    if cli.wants_wizard() {
        return Ok(match run_wizard(cli)? {
            WizardResult::Run { input, flags } => Some((input, flags)),
            WizardResult::Quit => None,
        });
    }

    let input = cli
        .input
        .clone()
        .ok_or_else(|| anyhow!("Input file is required. Pass a markdown file or use -i."))?;
    Ok(Some((input, cli.flags())))
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "mdocx=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
