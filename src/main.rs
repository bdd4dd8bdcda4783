use chrono::Utc;
use clap::Parser;
use gatepass::access::{self, ScanStation, KNOWN_AREAS};
use gatepass::config::Config;
use gatepass::store::{
    IPolicyStore, IScanAuditLog, MemoOperatorStore, MemoPolicyStore, MemoScanAuditLog,
};
use gatepass::token::fingerprint;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Parser)]
enum GatePassCli {
    Issue(IssueArgs),
    Verify(VerifyArgs),
    Scan(ScanArgs),
    Logs(LogsArgs),
    Fingerprint(FingerprintArgs),
    Areas,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Issue a signed credential for an identity found in the access \
    policy and print the QR text")]
struct IssueArgs {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[arg(short, long, default_value = "policy.json")]
    policy: String,

    #[arg(short, long)]
    email: String,

    #[arg(short, long)]
    fingerprint: String,

    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Verify the integrity and freshness of a credential without \
    consulting the access policy")]
struct VerifyArgs {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[arg(short = 'q', long, default_value = "credential.txt")]
    credential: String,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Verify a credential and decide access to an area, appending \
    the outcome to the audit log")]
struct ScanArgs {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[arg(short, long, default_value = "policy.json")]
    policy: String,

    #[arg(short = 'O', long, default_value = "operators.json")]
    operators: String,

    #[arg(short = 'u', long)]
    operator: String,

    #[arg(short, long, default_value = "Main Arena")]
    area: String,

    #[arg(short = 'q', long, default_value = "credential.txt")]
    credential: String,

    #[arg(short = 'l', long, default_value = "audit.json")]
    audit: String,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Show the most recent entries of the audit log")]
struct LogsArgs {
    #[arg(short = 'l', long, default_value = "audit.json")]
    audit: String,

    #[arg(short = 'n', long, default_value_t = 50)]
    limit: usize,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Derive a device fingerprint from device identifiers")]
struct FingerprintArgs {
    /// Device identifiers, e.g. build id, device name, OS version
    #[arg(required = true)]
    parts: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match GatePassCli::parse() {
        GatePassCli::Issue(args) => match issue(&args) {
            Ok(()) => eprintln!("issuance successful"),
            Err(e) => eprintln!("issuance failed: {e}"),
        },

        GatePassCli::Verify(args) => match verify(&args) {
            Ok(()) => eprintln!("verification successful"),
            Err(e) => eprintln!("verification failed: {e}"),
        },

        GatePassCli::Scan(args) => match scan(&args) {
            Ok(msg) => println!("{msg}"),
            Err(e) => eprintln!("scan failed: {e}"),
        },

        GatePassCli::Logs(args) => {
            if let Err(e) = logs(&args) {
                eprintln!("reading audit log failed: {e}")
            }
        }

        GatePassCli::Fingerprint(args) => println!("{}", fingerprint::derive(args.parts.as_slice())),

        GatePassCli::Areas => {
            for a in KNOWN_AREAS {
                println!("{a}");
            }
        }
    }
}

fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    let j = fs::read_to_string(path)?;

    Ok(Config::load_json(&j)?)
}

fn load_policy(path: &str) -> Result<MemoPolicyStore, Box<dyn Error>> {
    let j = fs::read_to_string(path)?;

    let p = MemoPolicyStore::new();
    p.load_json(&j)?;

    Ok(p)
}

fn load_audit(path: &str) -> Result<MemoScanAuditLog, Box<dyn Error>> {
    let log = MemoScanAuditLog::new();

    if Path::new(path).exists() {
        log.load_json(&fs::read_to_string(path)?)?;
    }

    Ok(log)
}

fn issue(args: &IssueArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let policy = load_policy(&args.policy)?;

    let identity = policy
        .find_by_email(&args.email)?
        .ok_or_else(|| format!("no identity with email {}", args.email))?;

    let qr = config.issuer().issue_qr_text(
        &identity,
        &args.fingerprint,
        Utc::now(),
        config.validity_window,
    )?;

    match &args.output {
        Some(path) => fs::write(path, qr)?,
        None => println!("{qr}"),
    }

    Ok(())
}

fn verify(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let raw = fs::read_to_string(&args.credential)?;

    let claim = config.verifier().verify(&raw, Utc::now())?;

    println!(
        "{} <{}> ({}), {:?}",
        claim.name, claim.email, claim.access_level, claim.assurance
    );

    Ok(())
}

fn scan(args: &ScanArgs) -> Result<String, Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let policy = Arc::new(load_policy(&args.policy)?);
    let audit = Arc::new(load_audit(&args.audit)?);

    let operators = MemoOperatorStore::new();
    operators.load_json(&fs::read_to_string(&args.operators)?)?;

    let operator = access::authenticate(&operators, &args.operator)?;

    let station = ScanStation::new(
        config.verifier(),
        operator,
        &args.area,
        policy,
        Arc::clone(&audit),
    )?;

    let raw = fs::read_to_string(&args.credential)?;
    let d = station.scan(&raw)?;

    fs::write(&args.audit, audit.to_json()?)?;

    Ok(d.message())
}

fn logs(args: &LogsArgs) -> Result<(), Box<dyn Error>> {
    let audit = load_audit(&args.audit)?;

    for e in audit.recent(args.limit)? {
        let r = e.record;
        println!(
            "#{} {} {} {} {} by {}{}",
            e.seq,
            r.scanned_at.to_rfc3339(),
            r.area,
            if r.granted { "GRANTED" } else { "DENIED" },
            r.identity_name.as_deref().unwrap_or("-"),
            r.verifier_identity,
            r.failure_reason
                .map(|f| format!(" ({f})"))
                .unwrap_or_default()
        );
    }

    Ok(())
}
