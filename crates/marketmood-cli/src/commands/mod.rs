mod init_config;
mod report;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Report(args) => report::run(cli, args).await,
        Command::InitConfig(args) => init_config::run(cli, args),
    }
}
