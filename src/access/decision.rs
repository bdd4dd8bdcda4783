// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use crate::store::{IPolicyStore, IScanAuditLog, ScanRecord};
use crate::token::{Rejection, VerifiedClaim};
use chrono::{DateTime, Utc};

/// Why access was denied
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum DenyReason {
    #[error("{0}")]
    Credential(Rejection),
    #[error("identity not found in access policy")]
    IdentityNotFound,
    #[error("identity is inactive")]
    IdentityInactive,
    #[error("no access to {0}")]
    AreaNotPermitted(String),
    #[error("access policy unavailable: {0}")]
    PolicyUnavailable(String),
    #[error("scan could not be recorded: {0}")]
    AuditUnavailable(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Granted,
    Denied(DenyReason),
}

/// The result of one scan, including where it landed in the audit log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    pub identity_id: Option<i64>,
    pub identity_name: Option<String>,
    pub area: String,
    /// Audit sequence number; `None` only if the audit append failed, in
    /// which case the verdict is always a denial
    pub audit_seq: Option<u64>,
}

impl Decision {
    pub fn granted(&self) -> bool {
        self.verdict == Verdict::Granted
    }

    pub fn reason(&self) -> Option<&DenyReason> {
        match &self.verdict {
            Verdict::Granted => None,
            Verdict::Denied(r) => Some(r),
        }
    }

    /// Text to show to the operator and the person being scanned.  Credential
    /// rejections are deliberately not detailed here; the audit log has them.
    pub fn message(&self) -> String {
        match &self.verdict {
            Verdict::Granted => format!(
                "Access GRANTED for {}",
                self.identity_name.as_deref().unwrap_or("unknown")
            ),
            Verdict::Denied(DenyReason::Credential(_)) => "Access DENIED".to_string(),
            Verdict::Denied(r) => format!("Access DENIED: {r}"),
        }
    }
}

/// Turns verified claims (or verification failures) into audited access
/// decisions.  Area authorization is always checked against the live policy,
/// never against the areas recorded in the credential.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    verifier_identity: String,
}

impl DecisionEngine {
    /// `verifier_identity` names the station or operator on every record
    pub fn new(verifier_identity: impl Into<String>) -> Self {
        Self {
            verifier_identity: verifier_identity.into(),
        }
    }

    pub fn verifier_identity(&self) -> &str {
        &self.verifier_identity
    }

    /// Decide whether the holder of `claim` may enter `area`.  Exactly one
    /// record is appended to `audit`; if that fails, access is denied.
    pub fn decide(
        &self,
        claim: &VerifiedClaim,
        area: &str,
        policy: &impl IPolicyStore,
        audit: &impl IScanAuditLog,
        now: DateTime<Utc>,
    ) -> Decision {
        let mut name = claim.name.clone();

        let verdict = match policy.find_by_email(&claim.email) {
            Err(e) => Verdict::Denied(DenyReason::PolicyUnavailable(e.to_string())),
            Ok(None) => Verdict::Denied(DenyReason::IdentityNotFound),
            Ok(Some(identity)) => {
                name = identity.name.clone();

                if !identity.active {
                    Verdict::Denied(DenyReason::IdentityInactive)
                } else if !identity.may_enter(area) {
                    Verdict::Denied(DenyReason::AreaNotPermitted(area.to_string()))
                } else {
                    Verdict::Granted
                }
            }
        };

        self.conclude(verdict, Some(claim.identity_id), Some(name), area, audit, now)
    }

    /// Record a scan whose credential did not verify
    pub fn record_rejection(
        &self,
        rejection: Rejection,
        area: &str,
        audit: &impl IScanAuditLog,
        now: DateTime<Utc>,
    ) -> Decision {
        self.conclude(
            Verdict::Denied(DenyReason::Credential(rejection)),
            None,
            None,
            area,
            audit,
            now,
        )
    }

    fn conclude(
        &self,
        verdict: Verdict,
        identity_id: Option<i64>,
        identity_name: Option<String>,
        area: &str,
        audit: &impl IScanAuditLog,
        now: DateTime<Utc>,
    ) -> Decision {
        let failure_reason = match &verdict {
            Verdict::Granted => None,
            Verdict::Denied(r) => Some(r.to_string()),
        };

        let record = ScanRecord {
            identity_id,
            identity_name: identity_name.clone(),
            area: area.to_string(),
            granted: verdict == Verdict::Granted,
            failure_reason,
            scanned_at: now,
            verifier_identity: self.verifier_identity.clone(),
        };

        let (verdict, audit_seq) = match audit.append(record) {
            Ok(seq) => (verdict, Some(seq)),
            Err(e) => {
                tracing::error!(error = %e, area, "failed to append scan record");

                // an unrecorded entry is never allowed
                let verdict = match verdict {
                    Verdict::Granted => Verdict::Denied(DenyReason::AuditUnavailable(e.to_string())),
                    denied => denied,
                };

                (verdict, None)
            }
        };

        match &verdict {
            Verdict::Granted => tracing::info!(identity = ?identity_id, area, "access granted"),
            Verdict::Denied(r) => {
                tracing::warn!(identity = ?identity_id, area, reason = %r, "access denied")
            }
        }

        Decision {
            verdict,
            identity_id,
            identity_name,
            area: area.to_string(),
            audit_seq,
        }
    }
}
