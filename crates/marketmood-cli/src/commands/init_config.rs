use marketmood_core::MailConfig;

use crate::cli::{Cli, InitConfigArgs};
use crate::error::CliError;

pub fn run(cli: &Cli, args: &InitConfigArgs) -> Result<(), CliError> {
    let path = args
        .path
        .clone()
        .or_else(|| cli.config.clone())
        .unwrap_or_else(MailConfig::default_path);

    MailConfig::write_template(&path)?;
    println!(
        "Created template config at {}. Update it with your SMTP credentials.",
        path.display()
    );
    Ok(())
}
