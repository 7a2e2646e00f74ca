use ferrous_zones_application::ports::ZoneIndexPort;
use ferrous_zones_domain::Config;
use ferrous_zones_infrastructure::dns::ZoneIndex;
use tracing::{error, info, warn};

use crate::di::UseCases;

/// Import `[[zones]]` (not on a slave), build the index, and on a master push
/// the result to connected slaves when anything changed.
pub async fn load_zones(config: &Config, use_cases: &UseCases, index: &ZoneIndex) {
    let role = config.sync.role;
    let mut changed = false;

    if !config.zones.is_empty() {
        if role.is_slave() {
            warn!(
                count = config.zones.len(),
                "Ignoring static zones on a slave; its zones come from the master"
            );
        } else {
            let report = use_cases.import_zones.execute(&config.zones).await;
            info!(
                created = report.created,
                updated = report.updated,
                unchanged = report.unchanged,
                failed = report.failed.len(),
                "Static zones imported"
            );
            changed = report.changed();
        }
    }

    match index.reload().await {
        Ok(names) => info!(names, "Zone index loaded"),
        Err(e) => error!(error = %e, "Failed to load zone index"),
    }

    if changed && role.is_master() {
        let push = use_cases.push_zones.clone();
        tokio::spawn(async move {
            match push.execute().await {
                Ok(summary) => info!(
                    attempted = summary.attempted,
                    failed = summary.failed,
                    "Pushed zones to slaves"
                ),
                Err(e) => warn!(error = %e, "Failed to push zones to slaves"),
            }
        });
    }
}
