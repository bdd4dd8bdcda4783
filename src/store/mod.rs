// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Interfaces to the state a verifying station consults and produces: the
//! access policy (who may enter where), the operator directory, and the
//! append-only scan audit log.  In-memory implementations are provided for
//! each.

pub use self::errors::Error;
pub use self::identity::{normalize_email, AccessLevel, Identity};
pub use self::ioperatorstore::IOperatorStore;
pub use self::ipolicystore::IPolicyStore;
pub use self::iscanauditlog::IScanAuditLog;
pub use self::memo_operatorstore::MemoOperatorStore;
pub use self::memo_policystore::MemoPolicyStore;
pub use self::memo_scanauditlog::MemoScanAuditLog;
pub use self::operator::{Operator, OperatorRole};
pub use self::scanrecord::{AuditEntry, ScanRecord};

mod errors;
mod identity;
mod ioperatorstore;
mod ipolicystore;
mod iscanauditlog;
mod memo_operatorstore;
mod memo_policystore;
mod memo_scanauditlog;
mod operator;
mod scanrecord;
