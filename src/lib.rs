pub mod cli;
pub mod config;
pub mod convert;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod normalize;
pub mod project;
pub mod schema;
pub mod typedecl;

use std::{env, ffi::OsString, sync::OnceLock};

use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use log::{LevelFilter, debug};

use crate::{cli::Cli, error::ConvertError};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("intersection_convert", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    run_with_args(env::args_os())
}

pub fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    init_logging();
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(ConvertError::Usage(err.render().to_string()).into()),
    };
    debug!("Parsed arguments: {:?}", cli.args);
    convert::execute(&cli.args)?;
    Ok(())
}
