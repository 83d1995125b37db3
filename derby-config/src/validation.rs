//! Custom validation functions for configuration.

use std::collections::HashSet;

use derby_core::participant::RosterEntry;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref LOG_LEVEL: Regex =
        Regex::new("^(?i)(trace|debug|info|warn|error)$").expect("static regex");
    static ref BIND_ADDR: Regex =
        Regex::new(r"^[A-Za-z0-9.\-\[\]:]+:\d{1,5}$").expect("static regex");
    static ref HTTP_URL: Regex = Regex::new(r"^https?://\S+$").expect("static regex");
}

/// Roster must be non-empty with unique, non-blank keys.
pub fn validate_roster(roster: &[RosterEntry]) -> Result<(), ValidationError> {
    if roster.is_empty() {
        return Err(ValidationError::new("empty_roster"));
    }
    let mut seen = HashSet::new();
    for entry in roster {
        if entry.key.trim().is_empty() {
            return Err(ValidationError::new("blank_participant_key"));
        }
        if !seen.insert(entry.key.as_str()) {
            return Err(ValidationError::new("duplicate_participant_key"));
        }
    }
    Ok(())
}

pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVEL.is_match(level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

pub fn validate_bind_addr(addr: &str) -> Result<(), ValidationError> {
    if BIND_ADDR.is_match(addr) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_bind_addr"))
    }
}

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    if HTTP_URL.is_match(url) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_url"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_keys_must_be_unique() {
        let roster = vec![RosterEntry::new("A", "alice"), RosterEntry::new("B", "alice")];
        assert!(validate_roster(&roster).is_err());
        assert!(validate_roster(&roster[..1]).is_ok());
        assert!(validate_roster(&[]).is_err());
        assert!(validate_roster(&[RosterEntry::new("A", "  ")]).is_err());
    }

    #[test]
    fn log_levels_and_bind_addresses() {
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("loud").is_err());
        assert!(validate_bind_addr("0.0.0.0:8888").is_ok());
        assert!(validate_bind_addr("[::1]:8080").is_ok());
        assert!(validate_bind_addr("localhost").is_err());
        assert!(validate_http_url("https://example.com/embed").is_ok());
        assert!(validate_http_url("ftp://example.com").is_err());
    }
}
