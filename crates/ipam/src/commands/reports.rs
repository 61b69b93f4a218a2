//! Report command handlers.

use tabled::Tabled;

use ipam_core::Ipam;
use ipam_core::api::{StatusReport, UtilizationItem, UtilizationReport};

use crate::cli::{GlobalOpts, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct UtilizationRow {
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Used")]
    used: u64,
    #[tabled(rename = "Reserved")]
    reserved: u64,
    #[tabled(rename = "Available")]
    available: u64,
    #[tabled(rename = "Utilization")]
    utilization: String,
}

impl UtilizationRow {
    fn new(item: &UtilizationItem, color: bool) -> Self {
        let u = &item.utilization;
        Self {
            cidr: item.cidr.clone(),
            used: u.used_ips,
            reserved: u.reserved_ips,
            available: u.available_ips,
            utilization: output::utilization_cell(Some(u), color),
        }
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Count")]
    count: u64,
}

/// Per-subnet table followed by a totals line.
pub(super) fn utilization_table(report: &UtilizationReport, color: bool) -> String {
    let rows: Vec<_> = report
        .subnets
        .iter()
        .map(|item| UtilizationRow::new(item, color))
        .collect();
    let totals = &report.totals;
    format!(
        "{}\nTotal: {} of {} addresses in use, {} reserved, {}",
        output::render_table(&rows),
        totals.used_ips,
        totals.total_ips,
        totals.reserved_ips,
        output::utilization_cell(Some(totals), color),
    )
}

fn status_table(report: &StatusReport) -> String {
    let rows: Vec<_> = report
        .iter()
        .map(|(status, count)| StatusRow {
            status: status.clone(),
            count: *count,
        })
        .collect();
    output::render_table(&rows)
}

pub async fn handle(ipam: &Ipam, args: ReportsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ReportsCommand::Utilization => {
            let report = ipam.get_utilization_report().await?.into_data()?;
            let color = output::should_color(global.color);
            let out = output::render_single(
                global.format(),
                &report,
                |r| utilization_table(r, color),
                |r| {
                    r.subnets
                        .iter()
                        .map(|i| format!("{} {}", i.cidr, i.utilization.utilization_percentage))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Status => {
            let report = ipam.get_status_report().await?.data.unwrap_or_default();
            let out = output::render_single(global.format(), &report, status_table, |r| {
                r.iter()
                    .map(|(status, count)| format!("{status} {count}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
