//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_lot_size_parses_as_value() {
        let cli = Cli::try_parse_from(["tsp", "plan", "--lot-size", "-5"]).unwrap();
        match cli.command {
            Commands::Plan(args) => assert_eq!(args.lot_size.as_deref(), Some("-5")),
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_sample_size_conflicts_with_tracking() {
        let result = Cli::try_parse_from([
            "tsp",
            "sync",
            "lot.yaml",
            "--sample-size",
            "10",
            "--track-sample-size",
        ]);
        assert!(result.is_err());
    }
}
