//! Lifecycle status and classification enums for certificates.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// Issued but awaiting administrative confirmation
    Pending,
    /// Valid and publicly verifiable
    Active,
    /// Past its validity window; renewable
    Expired,
    /// Permanently withdrawn; terminal
    Revoked,
}

impl CertificateStatus {
    /// Whether no transition may leave this status
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// Whether the status machine permits moving from `self` to `next`.
    ///
    /// Revoked is terminal. Revoking an already revoked certificate is
    /// handled as an idempotent no-op by the registry, not as a transition.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Revoked)
                | (Self::Active, Self::Expired)
                | (Self::Active, Self::Revoked)
                | (Self::Expired, Self::Active)
                | (Self::Expired, Self::Revoked)
        )
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        };
        write!(f, "{}", s)
    }
}

/// Kind of achievement the certificate attests to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateType {
    /// Course completed
    Completion,
    /// Completed with a notable result
    Achievement,
    /// Completed with distinction
    Excellence,
}

impl CertificateType {
    /// Human-readable name used at render time
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Completion => "Completion",
            Self::Achievement => "Achievement",
            Self::Excellence => "Excellence",
        }
    }
}

impl std::fmt::Display for CertificateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Difficulty level of the certified course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateLevel {
    /// Introductory material
    Beginner,
    /// Builds on the basics
    Intermediate,
    /// Advanced material
    Advanced,
    /// Expert material
    Expert,
}

impl CertificateLevel {
    /// Human-readable name used at render time
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for CertificateLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_is_terminal() {
        assert!(CertificateStatus::Revoked.is_terminal());
        assert!(!CertificateStatus::Active.is_terminal());
        assert!(!CertificateStatus::Pending.is_terminal());
        assert!(!CertificateStatus::Expired.is_terminal());
    }

    #[test]
    fn test_no_transition_leaves_revoked() {
        for next in [
            CertificateStatus::Pending,
            CertificateStatus::Active,
            CertificateStatus::Expired,
            CertificateStatus::Revoked,
        ] {
            assert!(!CertificateStatus::Revoked.can_transition_to(next));
        }
    }

    #[test]
    fn test_renew_transition_only_from_expired() {
        assert!(CertificateStatus::Expired.can_transition_to(CertificateStatus::Active));
        assert!(!CertificateStatus::Active.can_transition_to(CertificateStatus::Active));
        assert!(!CertificateStatus::Revoked.can_transition_to(CertificateStatus::Active));
    }

    #[test]
    fn test_activate_transition() {
        assert!(CertificateStatus::Pending.can_transition_to(CertificateStatus::Active));
        assert!(!CertificateStatus::Expired.can_transition_to(CertificateStatus::Pending));
    }

    #[test]
    fn test_expire_transition() {
        assert!(CertificateStatus::Active.can_transition_to(CertificateStatus::Expired));
        assert!(!CertificateStatus::Pending.can_transition_to(CertificateStatus::Expired));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", CertificateStatus::Active), "active");
        assert_eq!(format!("{}", CertificateStatus::Revoked), "revoked");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&CertificateStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let back: CertificateStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CertificateStatus::Pending);
    }

    #[test]
    fn test_type_display_name() {
        assert_eq!(CertificateType::Excellence.display_name(), "Excellence");
    }

    #[test]
    fn test_level_display_name() {
        assert_eq!(CertificateLevel::Advanced.display_name(), "Advanced");
    }
}
