pub mod cli;
mod fetch;

pub use fetch::UreqSource;

use anyhow::{Context, Result};
use api::{Direction, Engine, Mode};
use cli::{Cli, Command, TablesCommand, TranslateArgs};
use common::{load_config, BridgeConfig, TableResolver, TableSource, TableStore, Translator};
use liblouis::LibLouis;
use log::info;
use std::io::{self, Read, Write};

pub fn run(cli: &Cli) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Command::Tables(cmd) = &cli.command {
        return tables(cmd, &UreqSource::default(), &mut stdout);
    }

    let config = resolve_config(cli)?;
    let engine = LibLouis::load(config.library_path.as_deref())
        .context("Failed to load liblouis")?;
    info!("Using liblouis {} from {:?}", engine.version(), engine.path());
    execute(&cli.command, &config, &engine, &mut stdout)
}

/// Config file contents with command-line overrides applied.
pub fn resolve_config(cli: &Cli) -> Result<BridgeConfig> {
    let mut config = load_config(&cli.config)?;
    if let Some(library) = &cli.library {
        config.library_path = Some(library.clone());
    }
    if let Some(data_path) = &cli.data_path {
        config.data_path = Some(data_path.clone());
    }
    Ok(config)
}

pub fn execute(
    command: &Command,
    config: &BridgeConfig,
    engine: &dyn Engine,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Translate(args) => translate(engine, config, Direction::Forward, args, out),
        Command::BackTranslate(args) => translate(engine, config, Direction::Backward, args, out),
        Command::Version => {
            writeln!(out, "{}", engine.version())?;
            Ok(())
        }
        Command::Tables(cmd) => tables(cmd, &UreqSource::default(), out),
    }
}

fn translate(
    engine: &dyn Engine,
    config: &BridgeConfig,
    direction: Direction,
    args: &TranslateArgs,
    out: &mut dyn Write,
) -> Result<()> {
    engine.set_log_level(config.log_level);
    let tables = match &config.data_path {
        Some(path) => {
            engine.set_data_path(path)?;
            TableResolver::for_data_path(path)
        }
        None => None,
    };

    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let mut options = config.translate_options();
    if args.no_contractions {
        options.mode = options.mode | Mode::NO_CONTRACTIONS;
    }
    let translator = Translator::new(engine, options).with_tables(tables);
    let result = match direction {
        Direction::Forward => translator.translate(Some(&text), Some(&args.table)),
        Direction::Backward => translator.back_translate(Some(&text), Some(&args.table)),
    }?;
    writeln!(out, "{}", result)?;
    Ok(())
}

pub fn tables(cmd: &TablesCommand, source: &dyn TableSource, out: &mut dyn Write) -> Result<()> {
    match cmd {
        TablesCommand::Add(args) => {
            let store = TableStore::open(&args.bundle.dir)?;
            let fetched = store.add(&args.names, source)?;
            for name in &fetched {
                writeln!(out, "downloaded {}", name)?;
            }
            info!("{} file(s) fetched into {:?}", fetched.len(), store.dir());
        }
        TablesCommand::Remove(args) => {
            let store = TableStore::open(&args.bundle.dir)?;
            for name in store.remove(&args.names)? {
                writeln!(out, "removed {}", name)?;
            }
        }
        TablesCommand::List(bundle) => {
            let files = TableStore::open(&bundle.dir)?.list()?;
            if files.is_empty() {
                writeln!(out, "(no bundled tables)")?;
            }
            for name in files {
                writeln!(out, "{}", name)?;
            }
        }
        TablesCommand::Clear(bundle) => {
            let count = TableStore::open(&bundle.dir)?.clear()?;
            writeln!(out, "Cleared {} bundled table(s)", count)?;
        }
    }
    Ok(())
}
