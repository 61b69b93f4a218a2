//! Dashboard overview.

use serde::Serialize;

use ipam_core::api::{Paginated, Subnet, UtilizationReport};
use ipam_core::{Ipam, Overview};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::reports;

#[derive(Serialize)]
struct OverviewView<'a> {
    subnets: &'a Paginated<Subnet>,
    utilization: &'a UtilizationReport,
}

fn detail(view: &OverviewView<'_>, color: bool) -> String {
    let subnet_count = view
        .subnets
        .total
        .unwrap_or_else(|| u64::try_from(view.subnets.len()).unwrap_or(u64::MAX));
    format!(
        "Subnets: {subnet_count}\n\n{}",
        reports::utilization_table(view.utilization, color)
    )
}

pub async fn handle(ipam: &Ipam, global: &GlobalOpts) -> Result<(), CliError> {
    let Overview {
        subnets,
        utilization,
    } = ipam.overview().await?;
    let view = OverviewView {
        subnets: &subnets,
        utilization: &utilization,
    };

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.format(),
        &view,
        |v| detail(v, color),
        |v| {
            v.subnets
                .data
                .iter()
                .map(|s| s.cidr.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
