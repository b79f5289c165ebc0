// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod network;
pub mod tui;

mod client_config;
mod client_main;

use std::str::FromStr;

use clap::{Command, arg};
use dame_client::side::PlayerType;


fn main() -> anyhow::Result<()> {
    // The board is drawn on the alternate screen, so logs go to stderr. Redirect it to read them.
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Dame")
        .version(clap::crate_version!())
        .about("Console client for the Dame checkers server")
        .subcommand_required(true)
        .subcommand(
            Command::new("play")
                .about("Start a new game and play it in the terminal")
                .arg(arg!(<server_address> "Server address, e.g. localhost:8000"))
                .arg(
                    arg!(--"white" <player> "Who plays white")
                        .value_parser(["human", "ai"])
                        .default_value("human"),
                )
                .arg(
                    arg!(--"black" <player> "Who plays black")
                        .value_parser(["human", "ai"])
                        .default_value("ai"),
                )
                .arg(
                    arg!(--"config" <config_file> "Path to a yaml-serialized ClientConfig")
                        .required(false),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("play", sub_matches)) => {
            let config = match sub_matches.get_one::<String>("config") {
                Some(path) => client_config::read_config_file(path)?,
                None => client_config::ClientConfig::default(),
            };
            client_main::run(client_main::PlayConfig {
                server_address: required_arg(sub_matches, "server_address")?,
                white: PlayerType::from_str(&required_arg(sub_matches, "white")?)?,
                black: PlayerType::from_str(&required_arg(sub_matches, "black")?)?,
                timing: config.timing,
            })
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn required_arg(matches: &clap::ArgMatches, id: &str) -> anyhow::Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing argument: {}", id))
}
