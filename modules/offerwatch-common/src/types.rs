use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One marketing campaign observed on a competitor's page.
///
/// Serialized field names stay camelCase so the persisted JSON matches the
/// shape the dashboard already reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: Uuid,
    /// Campaign title. Together with `competitor` this is the dedup identity.
    pub name: String,
    /// Free-text description of the offer.
    pub info: String,
    /// The brand's configured source page, not whatever the extractor claims.
    pub url: String,
    /// One of the category label keys, or anything else the extractor emitted.
    /// Unrecognized values are defaulted at display time, not here.
    pub category: String,
    pub discovery_date: DateTime<Utc>,
    pub last_seen_date: DateTime<Utc>,
    pub is_active: bool,
    /// Hotel company this campaign belongs to.
    pub competitor: String,
    /// True when the record came from a live extraction run.
    pub is_grounded: bool,
    /// Confidence weight, 0-100.
    pub reliability_score: u8,
    /// Primary visual hero/banner placement on the source page.
    #[serde(default)]
    pub is_banner: bool,
}

impl CampaignRecord {
    /// Dedup identity: no two live records may share this key.
    pub fn identity(&self) -> String {
        format!("{}-{}", self.competitor, self.name)
    }
}

/// Outcome of one brand's acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditStatus {
    Success,
    Failed,
    Partial,
    ProxyRetry,
}

/// One audit trail row, appended per brand per run regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub status: AuditStatus,
    /// Records ingested this attempt (pre-dedup). Zero on failure.
    pub found: usize,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the retrieval route that succeeded. Absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_used: Option<String>,
}

impl AuditLogEntry {
    pub fn success(brand: &str, found: usize, proxy: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            status: AuditStatus::Success,
            found,
            brand: brand.to_string(),
            error: None,
            proxy_used: Some(proxy.to_string()),
        }
    }

    pub fn failed(brand: &str, error: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            status: AuditStatus::Failed,
            found: 0,
            brand: brand.to_string(),
            error: Some(error.to_string()),
            proxy_used: None,
        }
    }
}

/// The fixed campaign category keys and their display names.
pub const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("family", "Family & Kids"),
    ("dining", "Dining & Food"),
    ("rewards", "Member Rewards"),
    ("business", "Business Travel"),
    ("travel", "Leisure & Travel"),
    ("spa", "Spa & Wellness"),
    ("wedding", "Weddings & Events"),
    ("general", "General Promo"),
    ("partnership", "Partnership"),
    ("seasonal", "Seasonal Deals"),
];

/// Display name for a category key. Unrecognized keys fall back to the
/// general label.
pub fn category_label(key: &str) -> &'static str {
    CATEGORY_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or("General Promo")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(competitor: &str, name: &str) -> CampaignRecord {
        let now = Utc::now();
        CampaignRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            info: "info".to_string(),
            url: "https://example.com".to_string(),
            category: "seasonal".to_string(),
            discovery_date: now,
            last_seen_date: now,
            is_active: true,
            competitor: competitor.to_string(),
            is_grounded: true,
            reliability_score: 100,
            is_banner: false,
        }
    }

    #[test]
    fn identity_combines_competitor_and_name() {
        assert_eq!(record("Hilton", "Points Unlimited").identity(), "Hilton-Points Unlimited");
        assert_ne!(
            record("Hilton", "Spring Sale").identity(),
            record("Hyatt", "Spring Sale").identity()
        );
    }

    #[test]
    fn campaign_serializes_camel_case() {
        let json = serde_json::to_value(record("IHG", "Stay Longer")).unwrap();
        assert!(json.get("discoveryDate").is_some());
        assert!(json.get("lastSeenDate").is_some());
        assert!(json.get("isBanner").is_some());
        assert!(json.get("reliabilityScore").is_some());
        assert!(json.get("discovery_date").is_none());
    }

    #[test]
    fn audit_status_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&AuditStatus::ProxyRetry).unwrap(),
            "\"proxy-retry\""
        );
        assert_eq!(
            serde_json::to_string(&AuditStatus::Success).unwrap(),
            "\"success\""
        );
    }

    #[test]
    fn failed_entry_has_error_and_no_proxy() {
        let entry = AuditLogEntry::failed("Accor", "all routes failed");
        assert_eq!(entry.status, AuditStatus::Failed);
        assert_eq!(entry.found, 0);
        assert!(entry.error.is_some());
        assert!(entry.proxy_used.is_none());
    }

    #[test]
    fn unknown_category_falls_back_to_general() {
        assert_eq!(category_label("seasonal"), "Seasonal Deals");
        assert_eq!(category_label("mystery"), "General Promo");
    }
}
