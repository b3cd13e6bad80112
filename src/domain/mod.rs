//! Domain name validation and normalization.
//!
//! Domains arrive from the HTTP path or the command line. They end up as the
//! key of the snapshot history and as the WHOIS lookup target, so they are
//! normalized once, before anything else runs:
//! - surrounding whitespace and a trailing dot are removed
//! - the name is lowercased (and IDNA-encoded by `url`)
//! - IP addresses, URLs and single-label names are rejected

use crate::error_handling::PreconditionError;

/// Normalizes a user-supplied domain name.
///
/// # Errors
///
/// Returns `PreconditionError::InvalidDomain` if the input is empty, is a URL
/// rather than a bare hostname, is an IP address, or has a single label.
pub fn normalize_domain(input: &str) -> Result<String, PreconditionError> {
    let invalid = |reason: &str| PreconditionError::InvalidDomain {
        domain: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(invalid("empty domain"));
    }
    if trimmed
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | ':' | '\\'))
    {
        return Err(invalid("expected a bare hostname, not a URL"));
    }

    let parsed = url::Url::parse(&format!("https://{}/", trimmed))
        .map_err(|e| invalid(&e.to_string()))?;

    match parsed.host() {
        Some(url::Host::Domain(host)) => {
            if !host.contains('.') {
                return Err(invalid("not a fully qualified domain name"));
            }
            Ok(host.to_string())
        }
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => {
            Err(invalid("IP addresses have no registrant"))
        }
        None => Err(invalid("no host component")),
    }
}

/// Compares two host names ignoring case and a trailing dot.
pub fn same_host(a: &str, b: &str) -> bool {
    a.trim()
        .trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim().trim_end_matches('.'))
}
