//! Session and own-account command handlers.

use ipam_core::Ipam;
use ipam_core::api::{ChangePassword, UpdateProfile};

use crate::cli::{GlobalOpts, LoginArgs, ProfileArgs, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::{users, util};

pub async fn login(ipam: &Ipam, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => util::prompt_text("Email")?,
    };
    let password = util::password("Password: ", args.password)?;

    let user = ipam.login(&email, &password).await?;
    output::print_status(
        &format!("Logged in as {} ({})", user.username, user.role),
        global.quiet,
    );
    Ok(())
}

pub fn logout(ipam: &Ipam, global: &GlobalOpts) {
    ipam.logout();
    output::print_status("Logged out", global.quiet);
}

pub async fn register(
    ipam: &Ipam,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::new_password(args.password)?;
    let resp = ipam
        .register(&args.username, &args.email, password, args.role.map(Into::into))
        .await?;
    let username = resp
        .data
        .map_or(args.username, |created| created.user.username);
    output::print_status(
        &format!("Account '{username}' created. Log in with: ipam login"),
        global.quiet,
    );
    Ok(())
}

pub fn whoami(ipam: &Ipam, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ipam.require_user()?;
    let out = output::render_single(global.format(), &user, users::detail, |u| u.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn profile(ipam: &Ipam, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let body = UpdateProfile {
        email: args.email,
        username: args.username,
    };
    if body == UpdateProfile::default() {
        return Err(CliError::validation(
            "profile",
            "nothing to update: pass --username and/or --email",
        ));
    }

    let user = ipam.update_profile(&body).await?.into_data()?;
    output::print_status("Profile updated", global.quiet);
    let out = output::render_single(global.format(), &user, users::detail, |u| u.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn password(ipam: &Ipam, global: &GlobalOpts) -> Result<(), CliError> {
    let current_password = util::password("Current password: ", None)?;
    let new_password = util::new_password(None)?;

    let resp = ipam
        .change_password(&ChangePassword {
            current_password,
            new_password,
        })
        .await?;
    output::print_status(&util::message_or(&resp, "Password changed"), global.quiet);
    Ok(())
}
