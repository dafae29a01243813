use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "louis", version, about = "Braille translation through liblouis")]
pub struct Cli {
    /// JSON config file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "louis_bridge.json")]
    pub config: PathBuf,

    /// liblouis shared library, overriding the config.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Directory liblouis resolves tables against, overriding the config.
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Text to braille cells.
    Translate(TranslateArgs),
    /// Braille cells to text.
    BackTranslate(TranslateArgs),
    /// Print the liblouis version.
    Version,
    /// Manage the local table bundle.
    #[command(subcommand)]
    Tables(TablesCommand),
}

#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Table id, or a comma-separated list.
    #[arg(short, long, default_value = "en-us-g1.ctb")]
    pub table: String,

    /// Uncontracted output regardless of the table.
    #[arg(long)]
    pub no_contractions: bool,

    /// Input; stdin when omitted.
    pub text: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum TablesCommand {
    /// Download tables and everything they include.
    Add(TableNames),
    /// Delete tables from the bundle.
    Remove(TableNames),
    List(BundleDir),
    /// Delete every table file in the bundle.
    Clear(BundleDir),
}

#[derive(Debug, Args)]
pub struct BundleDir {
    #[arg(long, default_value = "bundled_tables")]
    pub dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct TableNames {
    #[command(flatten)]
    pub bundle: BundleDir,

    #[arg(required = true)]
    pub names: Vec<String>,
}
