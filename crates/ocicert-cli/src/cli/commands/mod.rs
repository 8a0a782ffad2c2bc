use super::args::*;

pub mod get;
pub mod probe;

use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Probe(args) => probe::run(&cli.conn, args).await,
        Command::Get(args) => get::run(&cli.conn, args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
