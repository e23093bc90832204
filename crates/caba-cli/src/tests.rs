use std::path::PathBuf;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["caba"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_process_with_paths() {
    let cli = Cli::try_parse_from([
        "caba",
        "process",
        "--pdf-dir",
        "receipts",
        "--template",
        "base.xlsx",
        "--output",
        "march.xlsx",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Process(args)) = cli.command else {
        panic!("expected process command");
    };
    assert_eq!(args.pdf_dir, Some(PathBuf::from("receipts")));
    assert_eq!(args.template, Some(PathBuf::from("base.xlsx")));
    assert_eq!(args.output, Some(PathBuf::from("march.xlsx")));
    assert!(!args.dry_run);
    assert!(!args.no_save);
    assert!(!args.save_api_key);
}

#[test]
fn parses_process_flags() {
    let cli = Cli::try_parse_from([
        "caba",
        "process",
        "--dry-run",
        "--no-save",
        "--save-api-key",
        "--gemini-api-key",
        "abc",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Process(ProcessArgs {
            dry_run: true,
            no_save: true,
            save_api_key: true,
            gemini_api_key: Some(ref k),
            ..
        })) if k == "abc"
    ));
}

#[test]
fn parses_config_set() {
    let cli = Cli::try_parse_from(["caba", "config", "set", "pdf_dir", "receipts"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Set { ref key, ref value }
        }) if key == "pdf_dir" && value == "receipts"
    ));
}

#[test]
fn parses_config_show() {
    let cli = Cli::try_parse_from(["caba", "config", "show"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Show
        })
    ));
}

#[test]
fn config_requires_subcommand() {
    assert!(Cli::try_parse_from(["caba", "config"]).is_err());
}

#[test]
fn config_set_requires_value() {
    assert!(Cli::try_parse_from(["caba", "config", "set", "pdf_dir"]).is_err());
}
