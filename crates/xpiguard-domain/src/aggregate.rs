//! Merge validator output into canonical, ordered findings.

use crate::error::ContractError;
use crate::fingerprint::fingerprint_for;
use crate::message::Message;
use crate::severity::severity_of;
use std::cmp::Ordering;
use std::collections::HashSet;
use xpiguard_types::{Finding, Severity};

/// Normalize, fingerprint, dedup and order messages.
///
/// Each inner sequence is the output of one artifact. Exact duplicates (same path, code,
/// line, column and message) collapse within a sequence only. The result does not depend
/// on the order of the sequences.
pub fn aggregate(sequences: Vec<Vec<Message>>) -> Result<Vec<Finding>, ContractError> {
    let mut findings = Vec::new();
    for sequence in sequences {
        let mut seen = HashSet::new();
        for msg in sequence {
            let key = (
                msg.location.path.clone(),
                msg.code,
                msg.location.line,
                msg.location.col,
                msg.message.clone(),
            );
            if !seen.insert(key) {
                continue;
            }
            findings.push(normalize(msg)?);
        }
    }
    findings.sort_by(compare_findings);
    Ok(findings)
}

fn normalize(msg: Message) -> Result<Finding, ContractError> {
    let severity = severity_of(msg.source, &msg.severity)?;
    let fingerprint = fingerprint_for(msg.check_id, msg.code, &msg.location, &msg.message);
    Ok(Finding {
        severity,
        check_id: msg.check_id.to_string(),
        code: msg.code.to_string(),
        message: msg.message,
        description: msg.description.to_string(),
        location: Some(msg.location),
        fingerprint: Some(fingerprint),
        data: msg.data,
    })
}

pub fn compare_findings(a: &Finding, b: &Finding) -> Ordering {
    // Ordering priority:
    // 1) location.path (missing last)
    // 2) location.line (missing last)
    // 3) location.col (missing last)
    // 4) severity (error -> warning -> notice)
    // 5) check_id, code, message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Notice => 2,
    };
    let key = |f: &Finding| match &f.location {
        Some(l) => (
            Some(l.path.as_str().to_string()),
            l.line.unwrap_or(u32::MAX),
            l.col.unwrap_or(u32::MAX),
        ),
        None => (None, u32::MAX, u32::MAX),
    };
    let (ap, al, ac) = key(a);
    let (bp, bl, bc) = key(b);

    // `None` sorts first for Option; flip so findings without a path come last.
    let path_order = match (&ap, &bp) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    path_order
        .then(al.cmp(&bl))
        .then(ac.cmp(&bc))
        .then(severity_rank(a.severity).cmp(&severity_rank(b.severity)))
        .then_with(|| a.check_id.cmp(&b.check_id))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.message.cmp(&b.message))
        .then_with(|| a.description.cmp(&b.description))
}
