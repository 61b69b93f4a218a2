//! User administration handlers.

use tabled::Tabled;

use ipam_core::Ipam;
use ipam_core::api::{CreateUser, UpdateUser, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            created: output::timestamp(u.created_at.as_ref()),
        }
    }
}

pub(super) fn detail(u: &User) -> String {
    [
        format!("ID:       {}", u.id),
        format!("Username: {}", u.username),
        format!("Email:    {}", u.email),
        format!("Role:     {}", u.role),
        format!("Created:  {}", output::timestamp(u.created_at.as_ref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ipam: &Ipam, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = ipam.get_users().await?.data.unwrap_or_default();
            let out = output::render_list(
                global.format(),
                &users,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = ipam.get_user_by_id(&id).await?.into_data()?;
            let out = output::render_single(global.format(), &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            username,
            email,
            role,
        } => {
            let password = util::new_password(None)?;
            let body = CreateUser {
                username,
                email,
                password,
                role: role.map(Into::into),
            };
            let user = ipam.create_user(&body).await?.into_data()?;
            output::print_status("User created", global.quiet);
            let out = output::render_single(global.format(), &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            username,
            email,
            role,
            reset_password,
        } => {
            let password = if reset_password {
                Some(util::new_password(None)?)
            } else {
                None
            };
            let body = UpdateUser {
                username,
                email,
                password,
                role: role.map(Into::into),
            };
            if body.is_empty() {
                return Err(CliError::validation(
                    "user",
                    "nothing to update: pass --username, --email, --role or --reset-password",
                ));
            }
            let user = ipam.update_user(&id, &body).await?.into_data()?;
            output::print_status("User updated", global.quiet);
            let out = output::render_single(global.format(), &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user '{id}'?"), global.yes)? {
                return Ok(());
            }
            let resp = ipam.delete_user(&id).await?;
            output::print_status(&util::message_or(&resp, "User deleted"), global.quiet);
            Ok(())
        }
    }
}
