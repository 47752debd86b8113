use anyhow::{Context, Result};

use crate::application::ports::DnsDirectory;
use crate::domain::network::{bare_hosted_zone_id, zone_name_matches};

use super::AwsControlPlane;

impl DnsDirectory for AwsControlPlane {
    async fn hosted_zone_id(&self, name: &str) -> Result<Option<String>> {
        // Zones are returned in name order starting at `dns_name`, so the
        // first page holds the match if there is one.
        let out = self
            .route53
            .list_hosted_zones_by_name()
            .dns_name(name)
            .send()
            .await
            .with_context(|| format!("route53:ListHostedZonesByName for {name}"))?;
        Ok(out
            .hosted_zones()
            .iter()
            .filter(|zone| !zone.config().is_some_and(|c| c.private_zone()))
            .find(|zone| zone_name_matches(zone.name(), name))
            .map(|zone| bare_hosted_zone_id(zone.id()).to_string()))
    }
}
