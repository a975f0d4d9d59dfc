//! Command-line interface parsing and handling.
//!
//! This module defines the CLI structure and argument parsing logic
//! for the lobby bot using the clap library.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command-line arguments structure.
///
/// Contains all configurable options that can be specified via command line,
/// which will override corresponding values in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Channels to operate on, replacing the configured registry when non-empty
    pub channels: Vec<String>,
    /// Optional override for the command prefix
    pub prefix: Option<String>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    ///
    /// # Returns
    ///
    /// A `CliArgs` instance containing all parsed command-line options.
    /// Invalid arguments print usage and exit, as clap does.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Builds the arguments from already parsed matches.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config.toml")),
            channels: matches
                .get_many::<String>("channel")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            prefix: matches.get_one::<String>("prefix").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}

/// The clap command definition.
pub fn command() -> Command {
    Command::new("Lobby Bot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Chat lobby bot that gathers players into games")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("channel")
                .long("channel")
                .value_name("CHANNEL")
                .help("Channel to run games in (repeatable, replaces configured channels)")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .value_name("PREFIX")
                .help("Command prefix (default: !)"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let matches = command()
            .try_get_matches_from(std::iter::once("lobby_bot").chain(args.iter().copied()))
            .unwrap();
        CliArgs::from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.config_path, PathBuf::from("config.toml"));
        assert!(args.channels.is_empty());
        assert!(args.prefix.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.json_logs);
    }

    #[test]
    fn test_repeated_channels_and_overrides() {
        let args = parse(&[
            "--config",
            "bot.toml",
            "--channel",
            "#test",
            "--channel",
            "#games",
            "-p",
            "@",
            "--log-level",
            "debug",
            "--json-logs",
        ]);
        assert_eq!(args.config_path, PathBuf::from("bot.toml"));
        assert_eq!(args.channels, vec!["#test", "#games"]);
        assert_eq!(args.prefix.as_deref(), Some("@"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(command()
            .try_get_matches_from(["lobby_bot", "--bind", "0.0.0.0:80"])
            .is_err());
    }
}
