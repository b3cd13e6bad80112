//! Assessment pipeline.
//!
//! Turns one final SSL Labs report into one persisted `DomainSnapshot`:
//! 1. decode and check the report (final status, matching host)
//! 2. build a `ServerRecord` per endpoint, enriched with the domain registrant
//! 3. aggregate the endpoint grades
//! 4. read the previous grade and server list from the latest stored snapshot
//! 5. compare server lists
//! 6. append the new snapshot and return it
//!
//! Registrant failures degrade to empty fields and aggregation and diffing
//! cannot fail, so the only errors are precondition and persistence failures.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::change::servers_changed;
use crate::domain::{normalize_domain, same_host};
use crate::error_handling::{AssessmentError, PreconditionError};
use crate::grade::aggregate;
use crate::models::{DomainSnapshot, ServerRecord};
use crate::scan::{ScanEndpoint, ScanReport, ScanStatus};
use crate::storage::SnapshotStore;
use crate::whois::RegistrantLookup;

/// Page metadata supplied by the title and logo collaborators.
///
/// Stored as given, without validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Contents of the site's `<title>`
    pub title: String,
    /// Logo image URL
    pub logo: String,
}

/// Runs assessments against a snapshot store.
pub struct Assessor<L> {
    store: SnapshotStore,
    registrant: L,
}

impl<L: RegistrantLookup> Assessor<L> {
    /// Creates an assessor appending to `store` and enriching endpoints
    /// through `registrant`.
    pub fn new(store: SnapshotStore, registrant: L) -> Self {
        Self { store, registrant }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Assesses `domain` from a raw SSL Labs `analyze` JSON document.
    ///
    /// # Errors
    ///
    /// - `AssessmentError::Precondition` if the document is empty or not a
    ///   scan report, the scan is not final, or it describes another host
    /// - `AssessmentError::Persistence` if the store cannot be read or the
    ///   snapshot cannot be appended
    pub async fn assess(
        &self,
        domain: &str,
        raw_scan: &str,
        page: PageMetadata,
    ) -> Result<DomainSnapshot, AssessmentError> {
        if raw_scan.trim().is_empty() {
            return Err(PreconditionError::MalformedScan("empty scan result".to_string()).into());
        }
        let report: ScanReport = serde_json::from_str(raw_scan)
            .map_err(|e| PreconditionError::MalformedScan(e.to_string()))?;
        self.assess_report(domain, &report, page).await
    }

    /// Assesses `domain` from an already decoded report.
    pub async fn assess_report(
        &self,
        domain: &str,
        report: &ScanReport,
        page: PageMetadata,
    ) -> Result<DomainSnapshot, AssessmentError> {
        let domain = normalize_domain(domain)?;

        if !report.host.is_empty() && !same_host(&report.host, &domain) {
            return Err(PreconditionError::HostMismatch {
                requested: domain,
                reported: report.host.clone(),
            }
            .into());
        }

        let is_down = match report.scan_status() {
            ScanStatus::Ready => false,
            ScanStatus::Error => true,
            ScanStatus::Pending(status) => {
                return Err(PreconditionError::ScanNotFinal { status }.into());
            }
        };

        let servers = self.enrich(&domain, &report.endpoints).await;
        let ssl_grade = aggregate(&servers)
            .map(|g| g.to_string())
            .unwrap_or_default();

        let (previous_grade, previous_servers) = self.store.latest_baseline(&domain).await?;
        let changed = servers_changed(&servers, &previous_servers);

        let snapshot = DomainSnapshot {
            domain,
            servers,
            servers_changed: changed,
            ssl_grade,
            previous_ssl_grade: previous_grade.to_string(),
            logo: page.logo,
            title: page.title,
            is_down,
            created_at: Utc::now(),
        };

        self.store.append(&snapshot).await?;

        info!(
            "Assessed {}: grade '{}' (previous '{}'), {} server(s), changed={}, down={}",
            snapshot.domain,
            snapshot.ssl_grade,
            snapshot.previous_ssl_grade,
            snapshot.servers.len(),
            snapshot.servers_changed,
            snapshot.is_down
        );

        Ok(snapshot)
    }

    /// One record per endpoint, in report order.
    ///
    /// The registrant is keyed on the domain, not on hosting IPs, so it is
    /// resolved once per run and copied onto every record. Records of one
    /// snapshot therefore never disagree on country or owner.
    async fn enrich(&self, domain: &str, endpoints: &[ScanEndpoint]) -> Vec<ServerRecord> {
        if endpoints.is_empty() {
            return Vec::new();
        }
        let registrant = self.registrant.lookup(domain).await;
        let country = registrant.country.unwrap_or_default();
        let owner = registrant.organization.unwrap_or_default();

        endpoints
            .iter()
            .map(|endpoint| ServerRecord {
                address: endpoint.ip_address.clone(),
                ssl_grade: endpoint.grade.clone(),
                country: country.clone(),
                owner: owner.clone(),
            })
            .collect()
    }
}
