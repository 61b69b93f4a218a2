//! Reservation command handlers.

use tabled::Tabled;

use ipam_core::Ipam;
use ipam_core::api::{CreateReservation, Reservation, ReservationListParams, UpdateReservation};

use crate::cli::{GlobalOpts, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Reserved by")]
    reserved_by: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            range: format!("{} - {}", r.start_ip, r.end_ip),
            subnet: subnet_label(r),
            purpose: output::or_dash(r.purpose.as_deref()),
            reserved_by: output::or_dash(r.reserved_by.as_deref()),
            expires: output::timestamp(r.expires_at.as_ref()),
        }
    }
}

fn subnet_label(r: &Reservation) -> String {
    r.subnet
        .as_ref()
        .map_or_else(|| r.subnet_id.clone(), |s| s.cidr.clone())
}

fn detail(r: &Reservation) -> String {
    [
        format!("ID:          {}", r.id),
        format!("Range:       {} - {}", r.start_ip, r.end_ip),
        format!("Subnet:      {}", subnet_label(r)),
        format!("Purpose:     {}", output::or_dash(r.purpose.as_deref())),
        format!("Reserved by: {}", output::or_dash(r.reserved_by.as_deref())),
        format!("Expires:     {}", output::timestamp(r.expires_at.as_ref())),
        format!("Created:     {}", output::timestamp(r.created_at.as_ref())),
    ]
    .join("\n")
}

fn print_reservation(r: &Reservation, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.format(), r, detail, |r| r.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    ipam: &Ipam,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReservationsCommand::List { subnet, search } => {
            let params = ReservationListParams {
                subnet_id: subnet,
                search,
            };
            let reservations = ipam.get_reservations(&params).await?.data.unwrap_or_default();
            let out = output::render_list(
                global.format(),
                &reservations,
                |r| ReservationRow::from(r),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReservationsCommand::Get { id } => {
            let reservation = ipam.get_reservation_by_id(&id).await?.into_data()?;
            print_reservation(&reservation, global)
        }

        ReservationsCommand::Create {
            subnet,
            start,
            end,
            purpose,
            reserved_by,
            expires,
        } => {
            let expires_at = expires
                .as_deref()
                .map(|e| util::parse_timestamp("expires", e))
                .transpose()?;
            let body = CreateReservation {
                purpose,
                reserved_by,
                expires_at,
                ..CreateReservation::new(subnet, start, end)
            };
            let reservation = ipam.create_reservation(&body).await?.into_data()?;
            output::print_status("Reservation created", global.quiet);
            print_reservation(&reservation, global)
        }

        ReservationsCommand::Update {
            id,
            start,
            end,
            purpose,
            reserved_by,
            expires,
        } => {
            let expires_at = expires
                .as_deref()
                .map(|e| util::parse_timestamp("expires", e))
                .transpose()?;
            let body = UpdateReservation {
                start_ip: start,
                end_ip: end,
                purpose,
                reserved_by,
                expires_at,
            };
            if body.is_empty() {
                return Err(CliError::validation("reservation", "nothing to update"));
            }
            let reservation = ipam.update_reservation(&id, &body).await?.into_data()?;
            output::print_status("Reservation updated", global.quiet);
            print_reservation(&reservation, global)
        }

        ReservationsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete reservation '{id}'?"), global.yes)? {
                return Ok(());
            }
            let resp = ipam.delete_reservation(&id).await?;
            output::print_status(&util::message_or(&resp, "Reservation deleted"), global.quiet);
            Ok(())
        }
    }
}
