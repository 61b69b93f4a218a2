//! Subnet command handlers.

use tabled::Tabled;

use ipam_core::Ipam;
use ipam_core::api::{CreateSubnet, Paginated, Subnet, SubnetListParams, UpdateSubnet};

use crate::cli::{GlobalOpts, OutputFormat, SubnetsArgs, SubnetsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubnetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
}

impl SubnetRow {
    fn new(s: &Subnet, color: bool) -> Self {
        Self {
            id: s.id.clone(),
            cidr: s.cidr.clone(),
            description: output::or_dash(s.description.as_deref()),
            vlan: s.vlan_id.map_or_else(|| "-".into(), |v| v.to_string()),
            location: output::or_dash(s.location.as_deref()),
            utilization: output::utilization_cell(s.utilization.as_ref(), color),
        }
    }
}

fn detail(s: &Subnet, color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", s.id),
        format!("CIDR:        {}", s.cidr),
        format!("Description: {}", output::or_dash(s.description.as_deref())),
        format!(
            "VLAN:        {}",
            s.vlan_id.map_or_else(|| "-".into(), |v| v.to_string())
        ),
        format!("Location:    {}", output::or_dash(s.location.as_deref())),
        format!("Parent:      {}", output::or_dash(s.parent_subnet_id.as_deref())),
        format!("Created:     {}", output::timestamp(s.created_at.as_ref())),
    ];
    if let Some(ref u) = s.utilization {
        lines.push(format!(
            "Utilization: {}",
            output::utilization_cell(Some(u), color)
        ));
        lines.push(format!(
            "Addresses:   {} used, {} reserved, {} available",
            u.used_ips, u.reserved_ips, u.available_ips
        ));
    }
    lines.join("\n")
}

/// "Page 2 of 5 (93 subnets)" under a table, when the server sent paging info.
fn page_footer(page: &Paginated<Subnet>) -> Option<String> {
    let current = page.page?;
    let pages = page.total_pages.map_or_else(String::new, |t| format!(" of {t}"));
    let total = page.total.map_or_else(String::new, |t| format!(" ({t} subnets)"));
    Some(format!("Page {current}{pages}{total}"))
}

fn print_subnet(subnet: &Subnet, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.format(),
        subnet,
        |s| detail(s, color),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ipam: &Ipam, args: SubnetsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SubnetsCommand::List {
            page,
            search,
            location,
            vlan,
            utilization,
        } => {
            let params = SubnetListParams {
                page: page.page,
                limit: page.limit,
                search,
                location,
                vlan_id: vlan,
            };
            let page = if utilization {
                ipam.subnets_with_utilization(&params).await?
            } else {
                ipam.get_subnets(&params).await?.into_data()?
            };

            let color = output::should_color(global.color);
            let out = output::render_list(
                global.format(),
                &page.data,
                |s| SubnetRow::new(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if global.format() == OutputFormat::Table {
                if let Some(footer) = page_footer(&page) {
                    output::print_status(&footer, global.quiet);
                }
            }
            Ok(())
        }

        SubnetsCommand::Get { id } => {
            let subnet = ipam.get_subnet_by_id(&id).await?.into_data()?;
            print_subnet(&subnet, global)
        }

        SubnetsCommand::Create {
            cidr,
            description,
            vlan,
            location,
            parent,
        } => {
            let (network, mask) = util::parse_cidr(&cidr)?;
            let body = CreateSubnet {
                description,
                vlan_id: vlan,
                location,
                parent_subnet_id: parent,
                ..CreateSubnet::new(network, mask)
            };
            let subnet = ipam.create_subnet(&body).await?.into_data()?;
            output::print_status("Subnet created", global.quiet);
            print_subnet(&subnet, global)
        }

        SubnetsCommand::Update {
            id,
            cidr,
            description,
            vlan,
            location,
            parent,
        } => {
            let (network_address, subnet_mask) = match cidr {
                Some(ref cidr) => {
                    let (network, mask) = util::parse_cidr(cidr)?;
                    (Some(network), Some(mask))
                }
                None => (None, None),
            };
            let body = UpdateSubnet {
                network_address,
                subnet_mask,
                description,
                vlan_id: vlan,
                location,
                parent_subnet_id: parent,
            };
            if body.is_empty() {
                return Err(CliError::validation("subnet", "nothing to update"));
            }
            let subnet = ipam.update_subnet(&id, &body).await?.into_data()?;
            output::print_status("Subnet updated", global.quiet);
            print_subnet(&subnet, global)
        }

        SubnetsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete subnet '{id}' and all its addresses?"),
                global.yes,
            )? {
                return Ok(());
            }
            let resp = ipam.delete_subnet(&id).await?;
            output::print_status(&util::message_or(&resp, "Subnet deleted"), global.quiet);
            Ok(())
        }
    }
}
