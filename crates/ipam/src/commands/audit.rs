//! Audit trail handlers.

use serde_json::Value;
use tabled::Tabled;

use ipam_core::Ipam;
use ipam_core::api::{AuditListParams, AuditLog};

use crate::cli::{AuditArgs, AuditCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Changed by")]
    changed_by: String,
}

impl From<&AuditLog> for AuditRow {
    fn from(log: &AuditLog) -> Self {
        let ip = log.ip_address.as_ref();
        Self {
            id: log.id.clone(),
            time: output::timestamp(log.timestamp.as_ref()),
            action: log.action.clone(),
            address: ip.map_or_else(|| log.ip_address_id.clone(), |ip| ip.ip_address.clone()),
            subnet: output::or_dash(
                ip.and_then(|ip| ip.subnet.as_ref())
                    .map(|s| s.cidr.as_str()),
            ),
            changed_by: output::or_dash(log.changed_by.as_deref()),
        }
    }
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".into(),
        Some(v) => v.to_string(),
    }
}

fn detail(log: &AuditLog) -> String {
    let row = AuditRow::from(log);
    [
        format!("ID:         {}", row.id),
        format!("Time:       {}", row.time),
        format!("Action:     {}", row.action),
        format!("Address:    {}", row.address),
        format!("Subnet:     {}", row.subnet),
        format!("Changed by: {}", row.changed_by),
        format!("Old value:  {}", value_text(log.old_value.as_ref())),
        format!("New value:  {}", value_text(log.new_value.as_ref())),
    ]
    .join("\n")
}

pub async fn handle(ipam: &Ipam, args: AuditArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuditCommand::List {
            page,
            action,
            ip,
            search,
        } => {
            let params = AuditListParams {
                page: page.page,
                limit: page.limit,
                action,
                ip_address_id: ip,
                search,
            };
            let logs = ipam.get_audit_logs(&params).await?.into_data()?;
            let out = output::render_list(
                global.format(),
                &logs.data,
                |l| AuditRow::from(l),
                |l| l.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuditCommand::Get { id } => {
            let log = ipam.get_audit_log_by_id(&id).await?.into_data()?;
            let out = output::render_single(global.format(), &log, detail, |l| l.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
