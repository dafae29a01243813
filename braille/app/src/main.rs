use anyhow::Result;
use clap::Parser;
use log::debug;
use louis::cli::Cli;

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let cli = Cli::parse();
    debug!("{:?}", cli);
    louis::run(&cli)
}
