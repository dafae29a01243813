//! Command-line parsing and command execution against the mock engine.

use anyhow::{anyhow, Result};
use clap::Parser;
use common::{BridgeConfig, TableSource};
use louis::cli::{Cli, Command, TablesCommand};
use louis::{execute, resolve_config, tables};
use mock_engine::MockEngine;
use std::collections::HashMap;
use std::path::PathBuf;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("louis").chain(args.iter().copied())).unwrap()
}

fn output(command: &Command, config: &BridgeConfig, engine: &MockEngine) -> Result<String> {
    let mut out = Vec::new();
    execute(command, config, engine, &mut out)?;
    Ok(String::from_utf8(out)?)
}

struct Upstream(HashMap<&'static str, &'static str>);

impl TableSource for Upstream {
    fn fetch(&self, name: &str) -> Result<String> {
        self.0
            .get(name)
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("HTTP 404 for {}", name))
    }
}

mod parsing {
    use super::*;

    #[test]
    fn translate_defaults() {
        let cli = parse(&["translate", "hello"]);
        assert_eq!(cli.config, PathBuf::from("louis_bridge.json"));
        match cli.command {
            Command::Translate(args) => {
                assert_eq!(args.table, "en-us-g1.ctb");
                assert_eq!(args.text.as_deref(), Some("hello"));
                assert!(!args.no_contractions);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_overrides_after_subcommand() {
        let cli = parse(&["back-translate", "-t", "contract.ctb", "--data-path", "/opt/louis"]);
        assert_eq!(cli.data_path, Some(PathBuf::from("/opt/louis")));
        assert!(matches!(cli.command, Command::BackTranslate(ref a) if a.table == "contract.ctb"));
    }

    #[test]
    fn tables_add_needs_names() {
        assert!(Cli::try_parse_from(["louis", "tables", "add"]).is_err());
        let cli = parse(&["tables", "add", "en-us-g2.ctb", "--dir", "/tmp/bundle"]);
        match cli.command {
            Command::Tables(TablesCommand::Add(args)) => {
                assert_eq!(args.names, vec!["en-us-g2.ctb"]);
                assert_eq!(args.bundle.dir, PathBuf::from("/tmp/bundle"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn list_uses_bundled_tables_dir() {
        let cli = parse(&["tables", "list"]);
        match cli.command {
            Command::Tables(TablesCommand::List(bundle)) => {
                assert_eq!(bundle.dir, PathBuf::from("bundled_tables"))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

mod commands {
    use super::*;

    #[test]
    fn cli_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("louis_bridge.json");
        std::fs::write(&config_path, r#"{ "data_path": "/from/file", "log_level": "warn" }"#)
            .unwrap();
        let config_arg = config_path.to_string_lossy().to_string();
        let cli = parse(&["version", "--config", &config_arg, "--data-path", "/from/cli"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("/from/cli")));
        assert_eq!(config.log_level, api::LogLevel::Warn);
    }

    #[test]
    fn translate_prints_cells() {
        let engine = MockEngine::new();
        let config = BridgeConfig {
            data_path: Some(PathBuf::from("/nonexistent/louis")),
            ..BridgeConfig::default()
        };
        let cli = parse(&["translate", "Hi"]);
        assert_eq!(
            output(&cli.command, &config, &engine).unwrap(),
            "\u{2820}\u{2813}\u{280A}\n"
        );
        assert_eq!(engine.data_path(), Some(PathBuf::from("/nonexistent/louis")));
        assert_eq!(engine.log_level(), Some(config.log_level));
    }

    #[test]
    fn back_translate_prints_text() {
        let engine = MockEngine::new();
        let cli = parse(&["back-translate", "-t", "contract.ctb", "\u{282E}\u{2800}\u{282F}"]);
        assert_eq!(
            output(&cli.command, &BridgeConfig::default(), &engine).unwrap(),
            "the and\n"
        );
    }

    #[test]
    fn unknown_table_is_an_error() {
        let engine = MockEngine::new();
        let cli = parse(&["translate", "-t", "nonexistent.ctb", "hello"]);
        let err = output(&cli.command, &BridgeConfig::default(), &engine).unwrap_err();
        assert!(err.to_string().contains("nonexistent.ctb"), "{}", err);
    }

    #[test]
    fn version_prints_engine_version() {
        let engine = MockEngine::new();
        let cli = parse(&["version"]);
        assert_eq!(
            output(&cli.command, &BridgeConfig::default(), &engine).unwrap(),
            "mock-1.0\n"
        );
    }

    #[test]
    fn tables_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        let upstream = Upstream(HashMap::from([
            ("en-us-g1.ctb", "include chardefs.uti\n"),
            ("chardefs.uti", "space \\s 0\n"),
        ]));

        let run = |args: &[&str]| -> String {
            let cli = parse(args);
            let Command::Tables(cmd) = cli.command else {
                panic!("not a tables command");
            };
            let mut out = Vec::new();
            tables(&cmd, &upstream, &mut out).unwrap();
            String::from_utf8(out).unwrap()
        };

        assert_eq!(run(&["tables", "list", "--dir", &dir_arg]), "(no bundled tables)\n");
        assert_eq!(
            run(&["tables", "add", "--dir", &dir_arg, "en-us-g1.ctb"]),
            "downloaded en-us-g1.ctb\ndownloaded chardefs.uti\n"
        );
        assert_eq!(
            run(&["tables", "list", "--dir", &dir_arg]),
            "chardefs.uti\nen-us-g1.ctb\n"
        );
        assert_eq!(
            run(&["tables", "remove", "--dir", &dir_arg, "chardefs.uti", "gone.ctb"]),
            "removed chardefs.uti\n"
        );
        assert_eq!(
            run(&["tables", "clear", "--dir", &dir_arg]),
            "Cleared 1 bundled table(s)\n"
        );
    }
}
