//! Evaluate a declarative compliance rule against live cluster and file data.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use rulecheck_lib::{FATAL_EXIT_CODE, Host, cancel_pair, run};
use std::io::Write;
use std::io::{stderr, stdout};
use std::process::ExitCode;

/// Default host that writes to the real standard streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main(flavor = "current_thread")]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> ExitCode {
    let (handle, signal) = cancel_pair();
    let _ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    // outcome exit codes are set through the host; a returned error means no verdict was reached
    match run(&mut RealHost, std::env::args(), signal).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            u8::try_from(FATAL_EXIT_CODE).map_or(ExitCode::FAILURE, ExitCode::from)
        }
    }
}
