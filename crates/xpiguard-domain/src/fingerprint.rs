use sha2::{Digest, Sha256};
use xpiguard_types::Location;

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - path (package-relative)
/// - line and column (empty when absent)
/// - message
pub fn fingerprint_for(check_id: &str, code: &str, location: &Location, message: &str) -> String {
    let line = location.line.map(|l| l.to_string()).unwrap_or_default();
    let col = location.col.map(|c| c.to_string()).unwrap_or_default();
    let parts = [
        check_id,
        code,
        location.path.as_str(),
        line.as_str(),
        col.as_str(),
        message,
    ];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
