//! Listing filters for registry queries.

use chrono::NaiveDate;
use laurea_core::{Certificate, CertificateLevel, CertificateStatus, CertificateType};
use serde::{Deserialize, Serialize};

/// Filter for [`crate::Registry::list`].
///
/// All criteria are optional and combined with AND. Status matching uses
/// the effective status on the query date, so a date-expired record whose
/// persisted status is still `Active` matches `Expired`, not `Active`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateFilter {
    /// Match this effective status
    pub status: Option<CertificateStatus>,
    /// Match this certificate type
    pub certificate_type: Option<CertificateType>,
    /// Match this course level
    pub certificate_level: Option<CertificateLevel>,
    /// Case-insensitive substring of the holder name
    pub holder: Option<String>,
    /// Case-insensitive substring of the course title
    pub course: Option<String>,
    /// Only certificates issued on or after this date
    pub issued_on_or_after: Option<NaiveDate>,
    /// Only certificates issued strictly before this date
    pub issued_before: Option<NaiveDate>,
}

impl CertificateFilter {
    /// Filter that matches everything
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to an effective status
    #[must_use]
    pub fn with_status(mut self, status: CertificateStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a certificate type
    #[must_use]
    pub fn with_type(mut self, certificate_type: CertificateType) -> Self {
        self.certificate_type = Some(certificate_type);
        self
    }

    /// Restrict to a course level
    #[must_use]
    pub fn with_level(mut self, certificate_level: CertificateLevel) -> Self {
        self.certificate_level = Some(certificate_level);
        self
    }

    /// Restrict to holders whose name contains `fragment`
    #[must_use]
    pub fn with_holder(mut self, fragment: impl Into<String>) -> Self {
        self.holder = Some(fragment.into());
        self
    }

    /// Restrict to courses whose title contains `fragment`
    #[must_use]
    pub fn with_course(mut self, fragment: impl Into<String>) -> Self {
        self.course = Some(fragment.into());
        self
    }

    /// Restrict to certificates issued on or after `date`
    #[must_use]
    pub fn with_issued_on_or_after(mut self, date: NaiveDate) -> Self {
        self.issued_on_or_after = Some(date);
        self
    }

    /// Restrict to certificates issued strictly before `date`
    #[must_use]
    pub fn with_issued_before(mut self, date: NaiveDate) -> Self {
        self.issued_before = Some(date);
        self
    }

    /// Whether `certificate` satisfies every criterion on `today`
    #[must_use]
    pub fn matches(&self, certificate: &Certificate, today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if certificate.effective_status(today) != status {
                return false;
            }
        }
        if let Some(certificate_type) = self.certificate_type {
            if certificate.certificate_type != certificate_type {
                return false;
            }
        }
        if let Some(certificate_level) = self.certificate_level {
            if certificate.certificate_level != certificate_level {
                return false;
            }
        }
        if let Some(fragment) = &self.holder {
            if !contains_ignore_case(&certificate.holder.name, fragment) {
                return false;
            }
        }
        if let Some(fragment) = &self.course {
            if !contains_ignore_case(&certificate.course.title, fragment) {
                return false;
            }
        }
        if let Some(date) = self.issued_on_or_after {
            if certificate.issue_date < date {
                return false;
            }
        }
        if let Some(date) = self.issued_before {
            if certificate.issue_date >= date {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use laurea_core::{CertificateId, CourseRef, InstructorRef, Participant};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Certificate {
        Certificate {
            id: CertificateId::new(),
            certificate_number: "CERT-2024-AAAAAA".to_string(),
            verification_code: "code-1".to_string(),
            status: CertificateStatus::Active,
            verified: true,
            holder: Participant::new("u-1", "Jane Doe", "jane@example.com"),
            course: CourseRef::new("c-1", "Advanced Pastry"),
            instructor: InstructorRef::new("u-2", "Pierre Blanc", "Head Chef"),
            issue_date: date(2024, 1, 10),
            expiry_date: date(2027, 1, 10),
            grade: "A".to_string(),
            certificate_type: CertificateType::Completion,
            certificate_level: CertificateLevel::Advanced,
            score: None,
            issued_by: "Laurea Academy".to_string(),
        }
    }

    #[test]
    fn test_empty_filter_matches() {
        assert!(CertificateFilter::any().matches(&sample(), date(2024, 6, 1)));
    }

    #[test]
    fn test_status_filter_uses_effective_status() {
        let filter = CertificateFilter::any().with_status(CertificateStatus::Expired);
        let cert = sample();
        // Persisted status is Active, but past expiry it matches Expired
        assert!(!filter.matches(&cert, date(2024, 6, 1)));
        assert!(filter.matches(&cert, date(2028, 6, 1)));

        let active = CertificateFilter::any().with_status(CertificateStatus::Active);
        assert!(!active.matches(&cert, date(2028, 6, 1)));
    }

    #[test]
    fn test_holder_substring_case_insensitive() {
        let filter = CertificateFilter::any().with_holder("jane");
        assert!(filter.matches(&sample(), date(2024, 6, 1)));
        let filter = CertificateFilter::any().with_holder("john");
        assert!(!filter.matches(&sample(), date(2024, 6, 1)));
    }

    #[test]
    fn test_course_substring() {
        let filter = CertificateFilter::any().with_course("pastry");
        assert!(filter.matches(&sample(), date(2024, 6, 1)));
    }

    #[test]
    fn test_type_and_level() {
        let filter = CertificateFilter::any()
            .with_type(CertificateType::Completion)
            .with_level(CertificateLevel::Advanced);
        assert!(filter.matches(&sample(), date(2024, 6, 1)));

        let filter = CertificateFilter::any().with_type(CertificateType::Excellence);
        assert!(!filter.matches(&sample(), date(2024, 6, 1)));
    }

    #[test]
    fn test_issue_date_window() {
        let filter = CertificateFilter::any()
            .with_issued_on_or_after(date(2024, 1, 1))
            .with_issued_before(date(2024, 2, 1));
        assert!(filter.matches(&sample(), date(2024, 6, 1)));

        let filter = CertificateFilter::any().with_issued_before(date(2024, 1, 10));
        assert!(!filter.matches(&sample(), date(2024, 6, 1)));
    }
}
