// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

extern crate gatepass;

use chrono::{Duration, Utc};
use gatepass::access::{authenticate, ScanStation};
use gatepass::config::Config;
use gatepass::store::{
    IPolicyStore, IScanAuditLog, MemoOperatorStore, MemoPolicyStore, MemoScanAuditLog,
};
use gatepass::token::fingerprint;
use std::fs;
use std::sync::Arc;

fn main() {
    issue_and_scan();
}

fn issue_and_scan() {
    let load = |f: &str| fs::read_to_string(f).unwrap_or_else(|_| panic!("loading file {}", f));

    let config = Config::load_json(&load("testdata/config.json")).unwrap();

    let policy = MemoPolicyStore::new();
    policy.load_json(&load("testdata/policy.json")).unwrap();

    let operators = MemoOperatorStore::new();
    operators.load_json(&load("testdata/operators.json")).unwrap();

    let john = policy
        .find_by_email("john.athlete@sports.com")
        .unwrap()
        .unwrap();

    let now = Utc::now();
    let fp = fingerprint::derive(&["demo-device", "demo-model"]);

    let qr = config
        .issuer()
        .issue_qr_text(&john, &fp, now, config.validity_window)
        .unwrap();

    println!("{}", qr);

    let audit = Arc::new(MemoScanAuditLog::new());
    let op = authenticate(&operators, "scanner1@event.com").unwrap();

    let mut station = ScanStation::new(
        config.verifier(),
        op,
        "Main Arena",
        Arc::new(policy),
        Arc::clone(&audit),
    )
    .unwrap();

    for area in ["Main Arena", "VIP Lounge"] {
        station.select_area(area).unwrap();

        let d = station.scan_at(&qr, now + Duration::minutes(5)).unwrap();

        println!("{}: {}", area, d.message());
    }

    for e in audit.recent(10).unwrap() {
        println!("{:?}", e);
    }
}
