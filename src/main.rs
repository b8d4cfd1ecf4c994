// Entrypoint for the blog CLI.
// - Keeps `main` small: parse configuration, build the API client and hand
//   it to the UI loop together with a fresh session.
// - Maps the loop outcome to the process exit code.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use blogctl::{
    api::ApiClient,
    config::Args,
    error::CliError,
    session::Session,
    telemetry,
    ui::{main_menu, TerminalPrompter},
};
use clap::Parser;
use tracing::info;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = telemetry::init_tracing(args.verbose) {
        let _ = writeln!(io::stderr(), "{err:#}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            info!(error = %format!("{err:#}"), "client stopped");
            ExitCode::from(report_fatal(&mut io::stdout(), &err))
        }
    }
}

/// Print a fatal error and return its exit code. A closed stdout does not
/// change the code.
fn report_fatal<W: Write>(out: &mut W, err: &anyhow::Error) -> u8 {
    let _ = writeln!(out, "{err}");
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let api = ApiClient::new(&config.base_url).context("Failed to build HTTP client")?;
    let mut session = Session::new();
    let mut prompter = TerminalPrompter::new(config.plain);

    // Blocks until the user exits or a fatal error occurs.
    main_menu(&api, &mut session, &mut prompter, &mut io::stdout().lock())?;
    Ok(())
}
