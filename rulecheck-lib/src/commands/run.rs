//! Command-line entry point for rulecheck

use super::{CheckArgs, check};
use crate::inputs::CancelSignal;
use crate::{Host, Result};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "rulecheck", version, author, long_about = None)]
#[command(about = "Evaluate a declarative compliance rule against live cluster and file data")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    check: CheckArgs,
}

/// Parse command-line arguments and evaluate the rule they name
///
/// Usage errors, `--help`, and `--version` are written to the host, which is
/// then asked to exit with clap's exit code.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
/// * `cancel` - Fired to abandon input collection (e.g. on Ctrl-C)
///
/// # Errors
///
/// Returns an error if the configuration can't be loaded or output can't be written
pub async fn run<I, T, H>(host: &mut H, args: I, cancel: CancelSignal) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let rendered = e.render();
            if e.use_stderr() {
                write!(host.error(), "{rendered}")?;
            } else {
                write!(host.output(), "{rendered}")?;
            }

            host.exit(e.exit_code());
            return Ok(());
        }
    };

    check(host, &cli.check, &cancel).await
}
