//! The certificate entity and validated issuance input.

use crate::error::ValidationError;
use crate::id::CertificateId;
use crate::status::{CertificateLevel, CertificateStatus, CertificateType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The person a certificate is issued to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier in the external user system
    pub id: String,
    /// Full name, printed on the document
    pub name: String,
    /// Contact email
    pub email: String,
}

impl Participant {
    /// Create a new participant reference
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The course a certificate attests completion of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    /// Identifier in the external course catalogue
    pub id: String,
    /// Course title, printed on the document
    pub title: String,
}

impl CourseRef {
    /// Create a new course reference
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// The instructor who taught the certified course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorRef {
    /// Identifier in the external user system
    pub id: String,
    /// Full name, printed on the document
    pub name: String,
    /// Job title (e.g. "Senior Lecturer")
    pub title: String,
}

impl InstructorRef {
    /// Create a new instructor reference
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
        }
    }
}

/// An exam or coursework score attached to a certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Points obtained
    pub obtained: u32,
    /// Points obtainable
    pub total: u32,
    /// Obtained as a percentage of total
    pub percentage: f64,
}

impl Score {
    /// Create a score, computing the percentage
    ///
    /// # Errors
    ///
    /// Returns error if `total` is zero or `obtained` exceeds `total`
    pub fn new(obtained: u32, total: u32) -> Result<Self, ValidationError> {
        if total == 0 {
            return Err(ValidationError::InvalidField {
                field: "score.total".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if obtained > total {
            return Err(ValidationError::InvalidField {
                field: "score.obtained".to_string(),
                reason: format!("{} exceeds total {}", obtained, total),
            });
        }
        Ok(Self {
            obtained,
            total,
            percentage: f64::from(obtained) / f64::from(total) * 100.0,
        })
    }

    /// Format as printed on the document, e.g. `87/100 (87.0%)`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}/{} ({:.1}%)", self.obtained, self.total, self.percentage)
    }
}

/// An issued completion certificate.
///
/// Records are never hard-deleted; revocation is a soft, permanent status
/// change preserving full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// Internal identifier, never exposed publicly
    pub id: CertificateId,
    /// Human-readable unique identifier, immutable after issuance
    pub certificate_number: String,
    /// Opaque unique token, the sole public lookup key
    pub verification_code: String,
    /// Persisted lifecycle status
    pub status: CertificateStatus,
    /// Administrative confirmation flag, independent of status
    pub verified: bool,
    /// Certificate holder
    pub holder: Participant,
    /// Certified course
    pub course: CourseRef,
    /// Course instructor
    pub instructor: InstructorRef,
    /// Date of issuance
    pub issue_date: NaiveDate,
    /// Date validity ends, strictly after `issue_date`
    pub expiry_date: NaiveDate,
    /// Awarded grade
    pub grade: String,
    /// Kind of achievement
    pub certificate_type: CertificateType,
    /// Course difficulty level
    pub certificate_level: CertificateLevel,
    /// Optional exam score
    pub score: Option<Score>,
    /// Issuing institution name, printed on the document
    pub issued_by: String,
}

/// Validated input for issuing a certificate.
///
/// Built by the external admin or application-review collaborator; the
/// registry rejects it before a certificate exists if any invariant fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Certificate holder
    pub holder: Participant,
    /// Certified course
    pub course: CourseRef,
    /// Course instructor
    pub instructor: InstructorRef,
    /// Awarded grade
    pub grade: String,
    /// Kind of achievement
    pub certificate_type: CertificateType,
    /// Course difficulty level
    pub certificate_level: CertificateLevel,
    /// Date of issuance
    pub issue_date: NaiveDate,
    /// Optional exam score
    pub score: Option<Score>,
}

impl IssueRequest {
    /// Create a new issuance request
    #[must_use]
    pub fn new(
        holder: Participant,
        course: CourseRef,
        instructor: InstructorRef,
        grade: impl Into<String>,
        certificate_type: CertificateType,
        certificate_level: CertificateLevel,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            holder,
            course,
            instructor,
            grade: grade.into(),
            certificate_type,
            certificate_level,
            issue_date,
            score: None,
        }
    }

    /// Attach a score
    #[must_use]
    pub fn with_score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }

    /// Check that every required field is present and coherent
    ///
    /// # Errors
    ///
    /// Returns error naming the first offending field
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.holder.name.trim().is_empty() {
            return Err(ValidationError::missing("holder.name"));
        }
        if self.course.title.trim().is_empty() {
            return Err(ValidationError::missing("course.title"));
        }
        if self.instructor.name.trim().is_empty() {
            return Err(ValidationError::missing("instructor.name"));
        }
        if self.grade.trim().is_empty() {
            return Err(ValidationError::missing("grade"));
        }
        Ok(())
    }
}
