//! Restricted public projection of a certificate.

use chrono::NaiveDate;
use laurea_core::{Certificate, CertificateLevel, CertificateType};
use serde::{Deserialize, Serialize};

/// What an anonymous verifier is allowed to see.
///
/// Carries no internal id, no contact details and no administrative
/// fields; the formatted score stands in for its raw components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCertificate {
    /// Human-readable certificate number, as printed on the document
    pub certificate_number: String,
    /// Holder full name
    pub holder: String,
    /// Course title
    pub course: String,
    /// Awarded grade
    pub grade: String,
    /// Formatted score, if one was recorded
    pub score: Option<String>,
    /// Kind of achievement
    pub certificate_type: CertificateType,
    /// Course difficulty level
    pub certificate_level: CertificateLevel,
    /// Date of issuance
    pub issue_date: NaiveDate,
    /// Date validity ends
    pub expiry_date: NaiveDate,
    /// Issuing institution
    pub issued_by: String,
}

impl PublicCertificate {
    /// Project a full record down to its public fields
    #[must_use]
    pub fn from_certificate(certificate: &Certificate) -> Self {
        Self {
            certificate_number: certificate.certificate_number.clone(),
            holder: certificate.holder.name.clone(),
            course: certificate.course.title.clone(),
            grade: certificate.grade.clone(),
            score: certificate.score.as_ref().map(laurea_core::Score::display),
            certificate_type: certificate.certificate_type,
            certificate_level: certificate.certificate_level,
            issue_date: certificate.issue_date,
            expiry_date: certificate.expiry_date,
            issued_by: certificate.issued_by.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laurea_core::{
        CertificateId, CertificateStatus, CourseRef, InstructorRef, Participant, Score,
    };

    fn sample() -> Certificate {
        Certificate {
            id: CertificateId::new(),
            certificate_number: "CERT-2024-AAAAAA".to_string(),
            verification_code: "feedfacefeedfacefeedfacefeedface".to_string(),
            status: CertificateStatus::Active,
            verified: true,
            holder: Participant::new("u-1", "Jane Doe", "jane@example.com"),
            course: CourseRef::new("c-1", "Advanced Pastry"),
            instructor: InstructorRef::new("u-2", "Pierre Blanc", "Head Chef"),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 10).unwrap(),
            grade: "A".to_string(),
            certificate_type: CertificateType::Completion,
            certificate_level: CertificateLevel::Advanced,
            score: Some(Score::new(92, 100).unwrap()),
            issued_by: "Laurea Academy".to_string(),
        }
    }

    #[test]
    fn test_projection_fields() {
        let view = PublicCertificate::from_certificate(&sample());
        assert_eq!(view.holder, "Jane Doe");
        assert_eq!(view.course, "Advanced Pastry");
        assert_eq!(view.grade, "A");
        assert_eq!(view.score.as_deref(), Some("92/100 (92.0%)"));
    }

    #[test]
    fn test_projection_leaks_no_internal_fields() {
        let cert = sample();
        let view = PublicCertificate::from_certificate(&cert);
        let json = serde_json::to_string(&view).unwrap();

        assert!(!json.contains(&cert.id.to_string()));
        assert!(!json.contains("jane@example.com"));
        assert!(!json.contains(&cert.verification_code));
    }
}
