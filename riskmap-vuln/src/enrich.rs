use tracing::{debug, info};

use riskmap_types::{ProcessEntry, RiskTier, ServiceEntry, VulnRecord};

use crate::classify::classify;
use crate::client::{CVE_RESULT_LIMIT, VulnSource};

/// An inventory entry the pipeline can enrich.
pub trait Enrich {
    /// Keyword used for vulnerability lookups.
    fn lookup_keyword(&self) -> &str;

    /// Store the lookup outcome on the entry.
    fn apply(&mut self, vulns: Vec<VulnRecord>, risk: RiskTier);
}

impl Enrich for ServiceEntry {
    fn lookup_keyword(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, vulns: Vec<VulnRecord>, risk: RiskTier) {
        self.vulns = vulns;
        self.risk = risk;
    }
}

impl Enrich for ProcessEntry {
    /// A process backed by a running service is better identified by the
    /// service's canonical name than by its image name.
    fn lookup_keyword(&self) -> &str {
        self.linked_service.as_deref().unwrap_or(&self.name)
    }

    fn apply(&mut self, vulns: Vec<VulnRecord>, risk: RiskTier) {
        self.vulns = vulns;
        self.risk = risk;
    }
}

/// Enrich entries in input order, strictly one at a time.
///
/// Per entry: search for a product identity; on a match, look up
/// vulnerabilities for the first CPE candidate, otherwise fall back to a
/// keyword search. The resulting list and its risk tier are stored on the
/// entry. With a `limit`, only the first `limit` entries are processed and
/// the rest keep their defaults (no vulns, Low risk).
///
/// Each lookup is individually throttled by the source; there is no
/// concurrency across entries and no retrying. An unreachable or disabled
/// source simply yields empty lists, so the snapshot still completes.
pub async fn enrich_entries<S, E>(source: &S, entries: &mut [E], limit: Option<usize>)
where
    S: VulnSource,
    E: Enrich,
{
    for (idx, entry) in entries.iter_mut().enumerate() {
        if let Some(limit) = limit {
            if idx >= limit {
                info!(limit, "enrichment stopped at the configured cap");
                break;
            }
        }

        let keyword = entry.lookup_keyword().to_string();
        let cpe_matches = source.find_product_matches(&keyword).await;

        let vulns = match cpe_matches.first() {
            Some(cpe) => {
                debug!(keyword, cpe, "exact CPE match");
                source.find_vulns_by_cpe(cpe).await
            }
            None => {
                debug!(keyword, "no CPE match, falling back to keyword search");
                source.find_vulns_by_keyword(&keyword, CVE_RESULT_LIMIT).await
            }
        };

        let risk = classify(&vulns);
        entry.apply(vulns, risk);
    }
}
