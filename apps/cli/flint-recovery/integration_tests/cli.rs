use flint_recovery::cli::{Cli, Commands};

use clap::Parser;

#[test]
fn given_classify_with_file_when_parsed_then_file_set() {
    let cli = Cli::try_parse_from(["flint-recovery", "classify", "error.json"]).unwrap();

    let Commands::Classify(args) = cli.command else {
        panic!("expected classify");
    };
    assert_eq!(args.file.unwrap().to_str(), Some("error.json"));
    assert!(args.network.is_none());
}

#[test]
fn given_file_and_network_when_parsed_then_rejected() {
    let result =
        Cli::try_parse_from(["flint-recovery", "classify", "error.json", "--network", "down"]);

    assert!(result.is_err());
}

#[test]
fn given_global_dirs_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from([
        "flint-recovery",
        "portal",
        "--reconnect",
        "auth-1",
        "--config-dir",
        "/tmp/flint",
        "--log-dir",
        "/tmp/flint/logs",
    ])
    .unwrap();

    assert_eq!(cli.config_dir.unwrap().to_str(), Some("/tmp/flint"));
    assert!(cli.log_dir.is_some());
    let Commands::Portal(args) = cli.command else {
        panic!("expected portal");
    };
    assert_eq!(args.reconnect.as_deref(), Some("auth-1"));
}

#[test]
fn given_connections_without_file_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["flint-recovery", "connections"]).is_err());
}
