//! Library integration tests.

use devsetup::DevsetupError;

#[test]
fn error_types_are_public() {
    let err = DevsetupError::PrerequisiteMissing {
        name: "Git".into(),
    };
    assert!(err.to_string().contains("Git"));
    assert!(err.is_reported());
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> devsetup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use devsetup::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["devsetup", "list", "--actions"]);

    if let Some(Commands::List(args)) = cli.command {
        assert!(args.actions);
    } else {
        panic!("Expected List command");
    }
}

#[test]
fn log_file_lines_are_timestamped() {
    use devsetup::logging::Logger;
    use devsetup::ui::SetupTheme;

    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("nested/debug.log");
    {
        let mut logger = Logger::open(&path, SetupTheme::plain())
            .unwrap()
            .with_console(false);
        logger.info("Node.js version: v20.11.0");
        logger.error("Git is not installed. Please install it and run the script again.");
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("Z] Node.js version: v20.11.0"));
    assert!(lines[1].contains("Z] ERROR: Git is not installed."));
}
