//! tvctl - command-line controller for network-attached smart TVs.
//!
//! Pairs with the TV, sends remote-control and app commands, and wakes it
//! over the local network when it is off.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use cli::Cli;
use error::{exit_codes, CliError};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_format);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Some(host) = cli.host.clone() else {
        commands::print_usage()?;
        return Err(CliError::InvalidArgument("missing <HOST>".to_string()));
    };

    commands::run_control(&cli, &host).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvctl_core::storage::{DeviceDirectory, Store};

    #[tokio::test]
    async fn test_missing_host_is_invalid_args() {
        let cli = Cli::try_parse_from(["tvctl"]).unwrap();

        let err = run(cli).await.unwrap_err();

        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
    }

    #[tokio::test]
    async fn test_unknown_command_prints_usage_and_succeeds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = temp_dir.path().join("tv-tokens.redb");
        {
            let store = Store::open(&db).unwrap();
            DeviceDirectory::new(&store)
                .save_mac("10.0.0.5", "70:2A:D5:01:B2:FF")
                .unwrap();
        }

        let cli = Cli::try_parse_from([
            "tvctl",
            "--db",
            db.to_str().unwrap(),
            "10.0.0.5",
            "reboot",
        ])
        .unwrap();

        assert!(run(cli).await.is_ok());
    }
}
