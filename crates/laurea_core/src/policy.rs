//! Validity policy: expiry date arithmetic and effective status.
//!
//! Every reader of "is this certificate still valid" goes through
//! [`Certificate::effective_status`], so a display badge and the public
//! verification result can never diverge.

use crate::certificate::Certificate;
use crate::status::CertificateStatus;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fixed-offset validity policy: certificates expire `years` after issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPolicy {
    /// Validity window in years
    pub years: u32,
}

impl Default for ValidityPolicy {
    fn default() -> Self {
        Self { years: 3 }
    }
}

impl ValidityPolicy {
    /// Create a policy with the given validity window
    #[must_use]
    pub const fn new(years: u32) -> Self {
        Self { years }
    }

    /// Expiry date for a certificate issued on `issue`.
    ///
    /// Always strictly after `issue`, even for a zero-year policy.
    #[must_use]
    pub fn expiry_for(&self, issue: NaiveDate) -> NaiveDate {
        let expiry = add_years(issue, self.years);
        if expiry > issue {
            expiry
        } else {
            issue.succ_opt().unwrap_or(issue)
        }
    }

    /// Expiry date after renewing a certificate that expired on `previous`.
    ///
    /// Extends from the previous expiry, not from "today", so the result is
    /// strictly later than `previous` no matter when renewal runs.
    #[must_use]
    pub fn renewed_expiry(&self, previous: NaiveDate) -> NaiveDate {
        self.expiry_for(previous)
    }
}

/// Add calendar years, clamping Feb 29 to Feb 28 in non-leap target years.
fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    let year = date.year() + years as i32;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

impl Certificate {
    /// The status a reader observes on `on`, recomputed from dates.
    ///
    /// A persisted `Active` whose expiry date has passed reads as `Expired`
    /// regardless of whether an admin has run the explicit expire action.
    /// All other statuses are authoritative as persisted.
    #[must_use]
    pub fn effective_status(&self, on: NaiveDate) -> CertificateStatus {
        match self.status {
            CertificateStatus::Active if on > self.expiry_date => CertificateStatus::Expired,
            status => status,
        }
    }

    /// Whether the certificate verifies as valid on `on`
    #[must_use]
    pub fn is_valid_on(&self, on: NaiveDate) -> bool {
        self.effective_status(on) == CertificateStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{CourseRef, InstructorRef, Participant};
    use crate::id::CertificateId;
    use crate::status::{CertificateLevel, CertificateType};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_certificate(status: CertificateStatus, expiry: NaiveDate) -> Certificate {
        Certificate {
            id: CertificateId::new(),
            certificate_number: "CERT-2024-ABC234".to_string(),
            verification_code: "0f".repeat(16),
            status,
            verified: false,
            holder: Participant::new("u-1", "Jane Doe", "jane@example.com"),
            course: CourseRef::new("c-1", "Advanced Pastry"),
            instructor: InstructorRef::new("u-2", "Pierre Blanc", "Head Chef"),
            issue_date: date(2024, 1, 10),
            expiry_date: expiry,
            grade: "A".to_string(),
            certificate_type: CertificateType::Completion,
            certificate_level: CertificateLevel::Advanced,
            score: None,
            issued_by: "Laurea Academy".to_string(),
        }
    }

    #[test]
    fn test_expiry_offset() {
        let policy = ValidityPolicy::new(3);
        assert_eq!(policy.expiry_for(date(2024, 1, 10)), date(2027, 1, 10));
    }

    #[test]
    fn test_expiry_leap_day_clamped() {
        let policy = ValidityPolicy::new(1);
        assert_eq!(policy.expiry_for(date(2024, 2, 29)), date(2025, 2, 28));
    }

    #[test]
    fn test_zero_year_policy_still_strictly_after() {
        let policy = ValidityPolicy::new(0);
        let issue = date(2024, 1, 10);
        assert!(policy.expiry_for(issue) > issue);
    }

    #[test]
    fn test_renewed_expiry_strictly_later() {
        let policy = ValidityPolicy::default();
        let previous = date(2027, 1, 10);
        assert!(policy.renewed_expiry(previous) > previous);
    }

    #[test]
    fn test_effective_status_active_within_window() {
        let cert = sample_certificate(CertificateStatus::Active, date(2027, 1, 10));
        assert_eq!(
            cert.effective_status(date(2026, 6, 1)),
            CertificateStatus::Active
        );
        assert!(cert.is_valid_on(date(2026, 6, 1)));
    }

    #[test]
    fn test_effective_status_expiry_day_still_valid() {
        let cert = sample_certificate(CertificateStatus::Active, date(2027, 1, 10));
        assert!(cert.is_valid_on(date(2027, 1, 10)));
        assert!(!cert.is_valid_on(date(2027, 1, 11)));
    }

    #[test]
    fn test_effective_status_stale_active_reads_expired() {
        let cert = sample_certificate(CertificateStatus::Active, date(2025, 1, 10));
        assert_eq!(
            cert.effective_status(date(2026, 1, 1)),
            CertificateStatus::Expired
        );
    }

    #[test]
    fn test_effective_status_revoked_unaffected_by_dates() {
        let cert = sample_certificate(CertificateStatus::Revoked, date(2099, 1, 1));
        assert_eq!(
            cert.effective_status(date(2024, 6, 1)),
            CertificateStatus::Revoked
        );
        assert!(!cert.is_valid_on(date(2024, 6, 1)));
    }

    #[test]
    fn test_effective_status_pending_not_valid() {
        let cert = sample_certificate(CertificateStatus::Pending, date(2099, 1, 1));
        assert!(!cert.is_valid_on(date(2024, 6, 1)));
    }

    proptest::proptest! {
        #[test]
        fn prop_expiry_strictly_after_issue(
            year in 1970i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            years in 0u32..=10,
        ) {
            let issue = date(year, month, day);
            let policy = ValidityPolicy::new(years);
            prop_assert!(policy.expiry_for(issue) > issue);
        }

        #[test]
        fn prop_renewal_monotonic(
            year in 1970i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            years in 0u32..=10,
        ) {
            let previous = date(year, month, day);
            let policy = ValidityPolicy::new(years);
            prop_assert!(policy.renewed_expiry(previous) > previous);
        }
    }
}
