mod cli;
mod command;
mod config;
mod error;
mod routes;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// stdout 留给 stdio 协议，日志一律写 stderr
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;

    let command_line = cli::Cli::parse();
    init_tracing(command_line.verbose);

    let cfg = config::Config::load_or_default();
    let documents_dir = cfg.documents_dir(command_line.documents_path);

    let cmd: Box<dyn command::Command> = match command_line.mode {
        cli::Mode::Stdio => Box::new(command::StdioCommand::new(cfg, documents_dir)),
        cli::Mode::Http => Box::new(command::HttpCommand::new(cfg, documents_dir)),
    };
    cmd.execute().await?;

    Ok(())
}
