// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::scanrecord::{AuditEntry, ScanRecord};
use super::IScanAuditLog;
use std::sync::RwLock;

/// In-memory audit log.  Sequence numbers start at 1 and are assigned under
/// the write lock, so they are dense and strictly increasing.
#[derive(Debug, Default)]
pub struct MemoScanAuditLog {
    r: RwLock<Vec<AuditEntry>>,
}

impl MemoScanAuditLog {
    pub fn new() -> Self {
        Self {
            r: Default::default(),
        }
    }

    /// Add to an existing (and possibly empty) MemoScanAuditLog the entries
    /// loaded from the given JSON array.  Entries must be in increasing
    /// sequence order and follow any entry already in the log.
    pub fn load_json(&self, j: &str) -> Result<(), Error> {
        let entries: Vec<AuditEntry> =
            serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))?;

        let mut r = self
            .r
            .write()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        for e in entries {
            let last = r.last().map(|l| l.seq).unwrap_or(0);

            if e.seq <= last {
                return Err(Error::Sema(format!(
                    "audit entry {} does not follow entry {}",
                    e.seq, last
                )));
            }

            r.push(e);
        }

        Ok(())
    }

    /// Serialise the whole log as a JSON array, oldest first
    pub fn to_json(&self) -> Result<String, Error> {
        let r = self
            .r
            .read()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        serde_json::to_string_pretty(&*r).map_err(|e| Error::Syntax(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.r.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IScanAuditLog for MemoScanAuditLog {
    fn append(&self, record: ScanRecord) -> Result<u64, Error> {
        let mut r = self
            .r
            .write()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        let seq = r.last().map(|l| l.seq).unwrap_or(0) + 1;
        r.push(AuditEntry { seq, record });

        Ok(seq)
    }

    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error> {
        let r = self
            .r
            .read()
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        Ok(r.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn record(area: &str, granted: bool, station: &str) -> ScanRecord {
        ScanRecord {
            identity_id: Some(1),
            identity_name: Some("John Athlete".to_string()),
            area: area.to_string(),
            granted,
            failure_reason: if granted {
                None
            } else {
                Some("area not permitted".to_string())
            },
            scanned_at: Utc::now(),
            verifier_identity: station.to_string(),
        }
    }

    #[test]
    fn append_and_recent() {
        let log = MemoScanAuditLog::new();

        assert_eq!(log.append(record("Main Arena", true, "s1")).unwrap(), 1);
        assert_eq!(log.append(record("VIP Lounge", false, "s1")).unwrap(), 2);
        assert_eq!(log.append(record("Food Court", true, "s1")).unwrap(), 3);

        let res = log.recent(2).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].seq, 3);
        assert_eq!(res[0].record.area, "Food Court");
        assert_eq!(res[1].seq, 2);
        assert!(!res[1].record.granted);

        assert_eq!(log.recent(50).unwrap().len(), 3);
        assert!(log.recent(0).unwrap().is_empty());
    }

    #[test]
    fn concurrent_appends_get_unique_sequence_numbers() {
        let log = Arc::new(MemoScanAuditLog::new());

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    let station = format!("station-{n}");
                    (0..25)
                        .map(|_| log.append(record("Main Arena", true, &station)).unwrap())
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut seqs: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seqs.sort_unstable();

        assert_eq!(seqs, (1..=100).collect::<Vec<u64>>());
        assert_eq!(log.len(), 100);
    }

    #[test]
    fn reload_continues_sequence() {
        let log = MemoScanAuditLog::new();
        log.append(record("Main Arena", true, "s1")).unwrap();
        log.append(record("Food Court", true, "s1")).unwrap();

        let reloaded = MemoScanAuditLog::new();
        reloaded.load_json(&log.to_json().unwrap()).unwrap();

        assert_eq!(reloaded.recent(10).unwrap(), log.recent(10).unwrap());
        assert_eq!(reloaded.append(record("VIP Lounge", false, "s2")).unwrap(), 3);

        // replaying the same entries would break the ordering
        assert!(matches!(
            reloaded.load_json(&log.to_json().unwrap()),
            Err(Error::Sema(_))
        ));
    }

    #[test]
    fn json_uses_audit_column_names() {
        let log = MemoScanAuditLog::new();
        log.append(record("VIP Lounge", false, "Scanner Volunteer 1"))
            .unwrap();

        let j: serde_json::Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
        let e = &j[0];

        assert_eq!(e["seq"], 1);
        assert_eq!(e["user_id"], 1);
        assert_eq!(e["access_granted"], false);
        assert_eq!(e["scanner_user"], "Scanner Volunteer 1");
        assert_eq!(e["failure_reason"], "area not permitted");
    }

    #[test]
    fn len_survives_poisoned_lock() {
        let log = Arc::new(MemoScanAuditLog::new());
        log.append(record("Main Arena", true, "s1")).unwrap();

        let w = Arc::clone(&log);
        let _ = thread::spawn(move || {
            let _guard = w.r.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(log.len(), 1);
        assert!(matches!(
            log.append(record("Main Arena", true, "s1")),
            Err(Error::Unavailable(_))
        ));
    }
}
