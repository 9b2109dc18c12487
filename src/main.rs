//! Command line front-end: `gauss-worker <input.txt>`.
//!
//! Messages meant for the supervising process go to stdout; tracing
//! output (controlled by `RUST_LOG`) goes to stderr.

use std::{env,
          ffi::OsString,
          io::{self, Write},
          process::ExitCode};
use anyhow::{anyhow, Result};
use gauss_worker::{run, Error, RunConfig};
use tracing_subscriber::EnvFilter;

/// Exit status of a failed run (`-1` as seen by the shell).
const FAILURE: u8 = 255;

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn print_help(program: &str) {
    let _ = write!(io::stdout(), "{}: a demo code\n\
                                  run as follows:\n\
                                  $ {} <input.txt>\n  \
                                  where <input.txt> is the name of the input file\n",
                   program, program);
}

fn try_main(args: Vec<OsString>) -> Result<(), Error> {
    let program = args.first()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    if args.len() != 2 {
        return Err(Error::Usage { program })
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&RunConfig::default(), &args[1], &mut out)?;
    let _ = out.flush();
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("warning: {:#}", e);
    }
    match try_main(env::args_os().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage { program }) => {
            print_help(&program);
            ExitCode::from(FAILURE)
        }
        Err(e) => {
            let _ = writeln!(io::stdout(), "error: {}", e);
            ExitCode::from(FAILURE)
        }
    }
}
