//! Command dispatch: bridges CLI args -> facade calls -> output formatting.

pub mod audit;
pub mod auth;
pub mod config_cmd;
pub mod ips;
pub mod overview;
pub mod reports;
pub mod reservations;
pub mod subnets;
pub mod users;
pub mod util;

use ipam_core::Ipam;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
///
/// Everything except login, logout and register first revalidates the
/// stored session.
pub async fn dispatch(cmd: Command, ipam: &Ipam, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => return auth::login(ipam, args, global).await,
        Command::Logout => {
            auth::logout(ipam, global);
            return Ok(());
        }
        Command::Register(args) => return auth::register(ipam, args, global).await,
        _ => {}
    }

    let user = util::require_session(ipam).await?;
    tracing::debug!(user = %user.username, "session restored");

    match cmd {
        Command::Whoami => auth::whoami(ipam, global),
        Command::Profile(args) => auth::profile(ipam, args, global).await,
        Command::Password => auth::password(ipam, global).await,
        Command::Overview => overview::handle(ipam, global).await,
        Command::Subnets(args) => subnets::handle(ipam, args, global).await,
        Command::Ips(args) => ips::handle(ipam, args, global).await,
        Command::Reservations(args) => reservations::handle(ipam, args, global).await,
        Command::Reports(args) => reports::handle(ipam, args, global).await,
        Command::Audit(args) => audit::handle(ipam, args, global).await,
        Command::Users(args) => users::handle(ipam, args, global).await,
        // Handled above, or before dispatch
        Command::Login(_)
        | Command::Logout
        | Command::Register(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!(),
    }
}
