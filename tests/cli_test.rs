use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use trellis::cli::{Args, Command, SkeletonArg};

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("trellis")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_project_defaults() {
    let parsed = Args::try_parse_from(make_args(&["project", "blog"])).unwrap();

    assert!(!parsed.verbose);
    match parsed.command {
        Command::Project { name, directory, kind, use_config_ini, template_engine, enable_webtools } => {
            assert_eq!(name, "blog");
            assert_eq!(directory, None);
            assert_eq!(kind, SkeletonArg::Simple);
            assert!(!use_config_ini);
            assert_eq!(template_engine, "phtml");
            assert!(!enable_webtools);
        }
        other => panic!("Expected project command, got {:?}", other),
    }
}

#[test]
fn test_project_all_flags() {
    let args = make_args(&[
        "--verbose",
        "project",
        "shop",
        "--directory",
        "/srv",
        "--type",
        "micro",
        "--use-config-ini",
        "--template-engine",
        "volt",
        "--enable-webtools",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Command::Project { name, directory, kind, use_config_ini, template_engine, enable_webtools } => {
            assert_eq!(name, "shop");
            assert_eq!(directory, Some(PathBuf::from("/srv")));
            assert_eq!(kind, SkeletonArg::Micro);
            assert!(use_config_ini);
            assert_eq!(template_engine, "volt");
            assert!(enable_webtools);
        }
        other => panic!("Expected project command, got {:?}", other),
    }
}

#[test]
fn test_config_command() {
    let parsed = Args::try_parse_from(make_args(&["config", "-d", "./site"])).unwrap();
    match parsed.command {
        Command::Config { basename, directory } => {
            assert_eq!(basename, "config");
            assert_eq!(directory, Some(PathBuf::from("./site")));
        }
        other => panic!("Expected config command, got {:?}", other),
    }
}

#[test]
fn test_invalid_args() {
    assert!(Args::try_parse_from(make_args(&["project"])).is_err());
    assert!(Args::try_parse_from(make_args(&["project", "blog", "--type", "modules"])).is_err());
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_webtools_help_mentions_missing_installer() {
    let command = Args::command();
    let project = command.find_subcommand("project").unwrap();
    let flag = project.get_arguments().find(|arg| arg.get_id() == "enable_webtools").unwrap();

    let help = flag.get_help().unwrap().to_string();
    assert!(help.contains("No installer ships with the binary"));
}
