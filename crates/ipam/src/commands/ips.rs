//! IP address command handlers.

use tabled::Tabled;

use ipam_core::Ipam;
use ipam_core::api::{AssignIpAddress, IpAddress, IpAddressListParams, UpdateIpAddress};

use crate::cli::{GlobalOpts, IpFields, IpsArgs, IpsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct IpRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
}

impl From<&IpAddress> for IpRow {
    fn from(ip: &IpAddress) -> Self {
        Self {
            id: ip.id.clone(),
            address: ip.ip_address.clone(),
            status: ip.status.to_string(),
            hostname: output::or_dash(ip.hostname.as_deref()),
            mac: output::or_dash(ip.mac_address.as_deref()),
            device: output::or_dash(ip.device_name.as_deref()),
            subnet: subnet_label(ip),
        }
    }
}

fn subnet_label(ip: &IpAddress) -> String {
    ip.subnet
        .as_ref()
        .map_or_else(|| ip.subnet_id.clone(), |s| s.cidr.clone())
}

fn detail(ip: &IpAddress) -> String {
    let mut lines = vec![
        format!("ID:          {}", ip.id),
        format!("Address:     {}", ip.ip_address),
        format!("Subnet:      {}", subnet_label(ip)),
        format!("Status:      {}", ip.status),
        format!("Hostname:    {}", output::or_dash(ip.hostname.as_deref())),
        format!("MAC:         {}", output::or_dash(ip.mac_address.as_deref())),
        format!("Device:      {}", output::or_dash(ip.device_name.as_deref())),
        format!("Assigned to: {}", output::or_dash(ip.assigned_to.as_deref())),
        format!("Description: {}", output::or_dash(ip.description.as_deref())),
        format!("Updated:     {}", output::timestamp(ip.updated_at.as_ref())),
    ];
    if let Some(ref until) = ip.reserved_until {
        lines.push(format!("Reserved until: {}", output::timestamp(Some(until))));
    }
    if !ip.history.is_empty() {
        lines.push(String::new());
        lines.push("History:".into());
        for h in &ip.history {
            lines.push(format!(
                "  {}  {:<8} {}",
                output::timestamp(h.timestamp.as_ref()),
                h.action,
                output::or_dash(h.changed_by.as_deref())
            ));
        }
    }
    lines.join("\n")
}

fn print_ip(ip: &IpAddress, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.format(), ip, detail, |ip| ip.ip_address.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn update_body(fields: IpFields) -> UpdateIpAddress {
    UpdateIpAddress {
        hostname: fields.hostname,
        mac_address: fields.mac,
        device_name: fields.device,
        assigned_to: fields.assigned_to,
        description: fields.description,
        status: fields.status.map(Into::into),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ipam: &Ipam, args: IpsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        IpsCommand::List {
            page,
            search,
            status,
            subnet,
        } => {
            let params = IpAddressListParams {
                page: page.page,
                limit: page.limit,
                search,
                status: status.map(Into::into),
                subnet_id: subnet,
            };
            let page = ipam.get_ip_addresses(&params).await?.into_data()?;
            let out = output::render_list(
                global.format(),
                &page.data,
                |ip| IpRow::from(ip),
                |ip| ip.ip_address.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        IpsCommand::Get { id } => {
            let ip = ipam.get_ip_address_by_id(&id).await?.into_data()?;
            print_ip(&ip, global)
        }

        IpsCommand::Assign { subnet, ip, fields } => {
            let fields = update_body(fields);
            let body = AssignIpAddress {
                ip_address: ip,
                hostname: fields.hostname,
                mac_address: fields.mac_address,
                device_name: fields.device_name,
                assigned_to: fields.assigned_to,
                description: fields.description,
                status: fields.status,
                ..AssignIpAddress::new(subnet)
            };
            let assigned = ipam.assign_ip_address(&body).await?.into_data()?;
            output::print_status(
                &format!("Assigned {}", assigned.ip_address),
                global.quiet,
            );
            print_ip(&assigned, global)
        }

        IpsCommand::Update { id, fields } => {
            let body = update_body(fields);
            if body.is_empty() {
                return Err(CliError::validation("ip address", "nothing to update"));
            }
            let ip = ipam.update_ip_address(&id, &body).await?.into_data()?;
            output::print_status("Address updated", global.quiet);
            print_ip(&ip, global)
        }

        IpsCommand::Release { id } => {
            if !util::confirm(&format!("Release address '{id}'?"), global.yes)? {
                return Ok(());
            }
            let resp = ipam.release_ip_address(&id).await?;
            let label = resp
                .data()
                .map_or_else(|| id.clone(), |ip| ip.ip_address.clone());
            output::print_status(&format!("Released {label}"), global.quiet);
            Ok(())
        }
    }
}
