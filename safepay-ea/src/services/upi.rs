//! UPI ID risk heuristic
//!
//! Placeholder tiering until a real reputation source is wired in: IDs
//! containing "fraud" rank High, IDs containing "test" rank Medium,
//! everything else is Low. Pure function, no I/O.

use serde::{Deserialize, Serialize};

/// Risk report for one UPI ID
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiRiskReport {
    /// The UPI ID as submitted
    pub upi_id: String,
    /// Risk on a 0-100 scale
    pub risk_percentage: u8,
    /// Coarse tier: Low, Medium, High
    pub risk_level: String,
    /// Number of scam reports on record
    pub reports: u32,
    /// Human-readable explanation
    pub reason: String,
    /// Verdict label: SAFE, SUSPICIOUS, SCAM
    pub status: String,
}

/// Rank a UPI ID. Matching is case-insensitive; "fraud" outranks "test".
pub fn check_upi_id(upi_id: &str) -> UpiRiskReport {
    let lowered = upi_id.to_lowercase();

    if lowered.contains("fraud") {
        UpiRiskReport {
            upi_id: upi_id.to_string(),
            risk_percentage: 90,
            risk_level: "High".to_string(),
            reports: 5,
            reason: "Reported for scam activity.".to_string(),
            status: "SCAM".to_string(),
        }
    } else if lowered.contains("test") {
        UpiRiskReport {
            upi_id: upi_id.to_string(),
            risk_percentage: 50,
            risk_level: "Medium".to_string(),
            reports: 1,
            reason: "UPI ID flagged for review.".to_string(),
            status: "SUSPICIOUS".to_string(),
        }
    } else {
        UpiRiskReport {
            upi_id: upi_id.to_string(),
            risk_percentage: 10,
            risk_level: "Low".to_string(),
            reports: 0,
            reason: "No suspicious activity detected.".to_string(),
            status: "SAFE".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraud_tier() {
        let report = check_upi_id("FRAUDSTER@upi");
        assert_eq!(report.risk_percentage, 90);
        assert_eq!(report.risk_level, "High");
        assert_eq!(report.reports, 5);
        assert_eq!(report.status, "SCAM");
        assert_eq!(report.upi_id, "FRAUDSTER@upi");
    }

    #[test]
    fn test_test_tier() {
        let report = check_upi_id("someone.Test@upi");
        assert_eq!(report.risk_percentage, 50);
        assert_eq!(report.risk_level, "Medium");
        assert_eq!(report.reports, 1);
        assert_eq!(report.status, "SUSPICIOUS");
    }

    #[test]
    fn test_safe_tier() {
        let report = check_upi_id("alice@okbank");
        assert_eq!(report.risk_percentage, 10);
        assert_eq!(report.risk_level, "Low");
        assert_eq!(report.reports, 0);
        assert_eq!(report.status, "SAFE");
    }

    #[test]
    fn test_fraud_outranks_test() {
        let report = check_upi_id("fraud.test@upi");
        assert_eq!(report.status, "SCAM");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let json = serde_json::to_string(&check_upi_id("alice@okbank")).unwrap();
        assert!(json.contains("\"upiId\":\"alice@okbank\""));
        assert!(json.contains("\"riskPercentage\":10"));
        assert!(json.contains("\"riskLevel\":\"Low\""));
    }
}
