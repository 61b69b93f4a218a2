mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ipam_config::Config;
use ipam_core::Ipam;

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands work without a server
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ipam", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let mut cfg = ipam_config::load_config()?;
            apply_overrides(&mut cfg, &mut cli.global);

            let client_config = cfg.to_client_config()?;
            let ipam = Ipam::new(client_config, ipam_config::token_store(&cfg))?;

            tracing::debug!(api_url = %ipam.config().api_url, "dispatching command");
            commands::dispatch(cmd, &ipam, &cli.global).await
        }
    }
}

/// Layer CLI flags over the loaded config, and fill unset output flags
/// from the config's defaults.
fn apply_overrides(cfg: &mut Config, global: &mut GlobalOpts) {
    if let Some(ref url) = global.api_url {
        cfg.api_url = Some(url.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.defaults.timeout = timeout;
    }
    if global.insecure {
        cfg.defaults.insecure = true;
    }
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).ok();
    }
}
