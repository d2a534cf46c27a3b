use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["tkscrape"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_scrape_with_defaults() {
    let cli = Cli::try_parse_from(["tkscrape", "scrape"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            input: None,
            output: None,
            max_users: None,
            concurrency: None,
        })
    ));
}

#[test]
fn parses_scrape_overrides() {
    let cli = Cli::try_parse_from([
        "tkscrape",
        "scrape",
        "--input",
        "urls.txt",
        "--max-users",
        "5",
        "--concurrency",
        "3",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Scrape {
            input,
            max_users,
            concurrency,
            ..
        }) => {
            assert_eq!(input, Some(PathBuf::from("urls.txt")));
            assert_eq!(max_users, Some(5));
            assert_eq!(concurrency, Some(3));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_retry_with_repeated_lists() {
    let cli = Cli::try_parse_from([
        "tkscrape", "retry", "--failed", "a.txt", "--failed", "b.txt", "--csv", "out.csv",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Retry {
            failed,
            csvs,
            still_failed,
            ..
        }) => {
            assert_eq!(failed.len(), 2);
            assert_eq!(csvs, vec![PathBuf::from("out.csv")]);
            assert_eq!(still_failed, PathBuf::from("still_failed_users.txt"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn retry_requires_a_csv() {
    assert!(Cli::try_parse_from(["tkscrape", "retry", "--failed", "a.txt"]).is_err());
}

#[test]
fn parses_profile_by_sec_id_only() {
    let cli = Cli::try_parse_from(["tkscrape", "profile", "--sec-user-id", "MS4w"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Profile {
            username: None,
            sec_user_id: Some(_),
            user_id: None,
            save_json: None,
        })
    ));
}

#[test]
fn merge_requires_inputs() {
    assert!(Cli::try_parse_from(["tkscrape", "merge", "--output", "m.csv"]).is_err());
    let cli = Cli::try_parse_from(["tkscrape", "merge", "--output", "m.csv", "a.csv", "b.csv"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Merge { inputs, .. }) => assert_eq!(inputs.len(), 2),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_list_maintenance_commands() {
    let cli = Cli::try_parse_from(["tkscrape", "dedupe", "urls.txt"]).expect("valid");
    assert!(matches!(cli.command, Some(Commands::Dedupe { .. })));

    let cli = Cli::try_parse_from(["tkscrape", "clean", "urls.txt"]).expect("valid");
    assert!(matches!(cli.command, Some(Commands::Clean { .. })));

    let cli = Cli::try_parse_from([
        "tkscrape", "remaining", "--list", "urls.txt", "--csv", "out.csv",
    ])
    .expect("valid");
    match cli.command {
        Some(Commands::Remaining { output, .. }) => {
            assert_eq!(output, PathBuf::from("remaining_users.txt"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_monitor_with_interval() {
    let cli = Cli::try_parse_from(["tkscrape", "monitor", "run.log", "--interval", "5"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Monitor {
            log_file,
            interval,
            total,
        }) => {
            assert_eq!(log_file, Some(PathBuf::from("run.log")));
            assert_eq!(interval, Some(5));
            assert_eq!(total, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
