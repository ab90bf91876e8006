//! Single-TV control command.

use clap::CommandFactory;
use tracing::debug;

use tvctl_core::device::{SamsungRemote, WolSender};
use tvctl_core::storage::Store;
use tvctl_core::{Command, Dispatcher, Outcome};

use crate::cli::Cli;
use crate::error::Result;
use crate::output::get_formatter;

/// Print the generated help, including the command reference.
pub fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Run one command against `host`
pub async fn run_control(cli: &Cli, host: &str) -> Result<()> {
    let formatter = get_formatter(cli.json);

    let store_path = cli.store_path();
    debug!(path = %store_path.display(), "opening store");
    let store = Store::open(&store_path)?.with_match_mode(cli.match_mode());

    let remote = SamsungRemote::new(host, cli.remote_options())?;
    let waker = WolSender::new(cli.wake_addr);
    let mut dispatcher = Dispatcher::new(store, remote, waker);

    let command = Command::parse(cli.command.as_deref(), &cli.args);
    let outcome = dispatcher.run(host, command).await?;

    match outcome {
        Outcome::Usage => print_usage()?,
        other => println!("{}", formatter.format_outcome(host, &other)),
    }

    Ok(())
}
