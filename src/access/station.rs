// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::decision::{Decision, DecisionEngine};
use super::errors::Error;
use super::is_known_area;
use crate::store::{IOperatorStore, IPolicyStore, IScanAuditLog, Operator};
use crate::token::Verifier;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, TryLockError};

/// Resolve the operator logging into a station
pub fn authenticate(operators: &impl IOperatorStore, email: &str) -> Result<Operator, Error> {
    match operators.find_operator(email) {
        Err(e) => Err(Error::Store(e.to_string())),
        Ok(Some(op)) if op.active => Ok(op),
        Ok(_) => Err(Error::UnknownOperator(format!(
            "no active operator with email {}",
            email.trim()
        ))),
    }
}

/// A verifying station: one operator, one selected area, one scan at a time.
pub struct ScanStation<P, L> {
    verifier: Verifier,
    engine: DecisionEngine,
    operator: Operator,
    area: String,
    policy: Arc<P>,
    audit: Arc<L>,
    in_flight: Mutex<()>,
}

impl<P: IPolicyStore, L: IScanAuditLog> ScanStation<P, L> {
    pub fn new(
        verifier: Verifier,
        operator: Operator,
        area: &str,
        policy: Arc<P>,
        audit: Arc<L>,
    ) -> Result<Self, Error> {
        if !operator.active {
            return Err(Error::UnknownOperator(format!(
                "operator {} is inactive",
                operator.email
            )));
        }

        check_area(area)?;

        Ok(Self {
            verifier,
            engine: DecisionEngine::new(operator.name.clone()),
            operator,
            area: area.to_string(),
            policy,
            audit,
            in_flight: Mutex::new(()),
        })
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn select_area(&mut self, area: &str) -> Result<(), Error> {
        check_area(area)?;
        self.area = area.to_string();
        Ok(())
    }

    /// Scan using the current time
    pub fn scan(&self, raw: &str) -> Result<Decision, Error> {
        self.scan_at(raw, Utc::now())
    }

    /// Verify, decide and audit one scanned code at instant `now`.  A scan
    /// that arrives while another one is being processed is refused with
    /// [`Error::Busy`] and leaves no audit record.
    pub fn scan_at(&self, raw: &str, now: DateTime<Utc>) -> Result<Decision, Error> {
        let _guard = match self.in_flight.try_lock() {
            Ok(g) => g,
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
            Err(TryLockError::WouldBlock) => {
                return Err(Error::Busy(format!(
                    "station at {} is still processing a scan",
                    self.area
                )))
            }
        };

        let d = match self.verifier.verify(raw, now) {
            Ok(claim) => self.engine.decide(
                &claim,
                &self.area,
                self.policy.as_ref(),
                self.audit.as_ref(),
                now,
            ),
            Err(r) => self
                .engine
                .record_rejection(r, &self.area, self.audit.as_ref(), now),
        };

        Ok(d)
    }
}

fn check_area(area: &str) -> Result<(), Error> {
    if !is_known_area(area) {
        return Err(Error::UnknownArea(area.to_string()));
    }
    Ok(())
}
