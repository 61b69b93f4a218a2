//! Config subcommand handlers.

use std::fmt::Write;

use ipam_config::{Config, TokenStoreKind};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn token_store_name(kind: TokenStoreKind) -> &'static str {
    match kind {
        TokenStoreKind::Keyring => "keyring",
        TokenStoreKind::File => "file",
        TokenStoreKind::Memory => "memory",
    }
}

/// TOML-like view of the resolved config, with the effective URL filled in.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "api_url = \"{}\"", cfg.api_url());
    if let Some(ref ca) = cfg.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    let _ = writeln!(out, "token_store = \"{}\"", token_store_name(cfg.token_store));
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = write!(out, "insecure = {}", cfg.defaults.insecure);
    out
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = ipam_config::load_config()?;
            let out = output::render_single(global.format(), &cfg, format_config, |c| {
                c.api_url().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&ipam_config::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::SetUrl { url } => {
            let path = ipam_config::config_path();
            let mut cfg = ipam_config::load_config_file(&path)?;
            cfg.api_url = Some(url.trim().to_owned());
            cfg.to_client_config()?;

            ipam_config::save_config_to(&path, &cfg)?;
            output::print_status(
                &format!("API URL set to {} in {}", cfg.api_url(), path.display()),
                global.quiet,
            );
            Ok(())
        }
    }
}
