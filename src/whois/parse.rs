//! Registrant extraction from WHOIS responses.
//!
//! `whois-service` parses the registrant name but not the registrant country
//! or organization, so both are read from the raw WHOIS text. Registries
//! differ in labels; the `Registrant ...` fields are preferred and the
//! `Admin ...` fields are used when the registrant block is absent.

use regex::Regex;
use std::sync::LazyLock;
use whois_service::WhoisResponse;

use super::types::Registrant;
use crate::utils::{compile_regex_unsafe, sanitize_text};

const REGISTRANT_COUNTRY_PATTERN: &str = r"(?im)^\s*Registrant\s+Country(?:\s+Code)?\s*:[ \t]*(.*)$";
const REGISTRANT_ORG_PATTERN: &str = r"(?im)^\s*Registrant\s+Organi[sz]ation\s*:[ \t]*(.*)$";
const ADMIN_COUNTRY_PATTERN: &str = r"(?im)^\s*Admin(?:istrative)?\s+Country(?:\s+Code)?\s*:[ \t]*(.*)$";
const ADMIN_ORG_PATTERN: &str = r"(?im)^\s*Admin(?:istrative)?\s+Organi[sz]ation\s*:[ \t]*(.*)$";

static REGISTRANT_COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(REGISTRANT_COUNTRY_PATTERN, "REGISTRANT_COUNTRY_RE"));
static REGISTRANT_ORG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(REGISTRANT_ORG_PATTERN, "REGISTRANT_ORG_RE"));
static ADMIN_COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(ADMIN_COUNTRY_PATTERN, "ADMIN_COUNTRY_RE"));
static ADMIN_ORG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(ADMIN_ORG_PATTERN, "ADMIN_ORG_RE"));

/// Builds a `Registrant` from a `whois-service` response.
pub(crate) fn registrant_from_response(response: &WhoisResponse) -> Registrant {
    let mut registrant = parse_raw_registrant(&response.raw_data);

    if registrant.organization.is_none() {
        registrant.organization = response
            .parsed_data
            .as_ref()
            .and_then(|parsed| parsed.registrant_name.as_deref())
            .and_then(clean_value);
    }

    registrant
}

/// Extracts registrant country and organization from raw WHOIS text.
pub(crate) fn parse_raw_registrant(raw: &str) -> Registrant {
    Registrant {
        country: first_value(&REGISTRANT_COUNTRY_RE, raw)
            .or_else(|| first_value(&ADMIN_COUNTRY_RE, raw)),
        organization: first_value(&REGISTRANT_ORG_RE, raw)
            .or_else(|| first_value(&ADMIN_ORG_RE, raw)),
    }
}

fn first_value(re: &Regex, raw: &str) -> Option<String> {
    re.captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| clean_value(m.as_str()))
}

/// Drops blank and privacy-redacted values.
fn clean_value(value: &str) -> Option<String> {
    let value = sanitize_text(value);
    let lower = value.to_ascii_lowercase();
    if value.is_empty()
        || lower.contains("redacted")
        || lower.contains("not disclosed")
        || lower.contains("data protected")
    {
        return None;
    }
    Some(value)
}
