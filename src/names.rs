//! Turning pasted text into a roster
//!
//! Supported entry formats:
//! - Directory format: `LastName, FirstName /XX/EXT <email@example.com>`
//! - Name with address: `John Doe <john@example.com>`
//! - Plain names: `John Doe` or just `John`
//!
//! Entries are separated by semicolons or newlines.

use crate::config::{MAX_NAMES, MAX_NAME_LENGTH, MIN_NAMES};
use crate::error::WheelError;
use crate::types::{NameCountValidation, Participant};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DIRECTORY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,]+),\s*([^/<]+)").expect("valid regex"));
static NAME_WITH_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^<]+)<").expect("valid regex"));
/// Trailing organisational codes such as `/FR/EXT`
static CODE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*/[A-Z]+.*$").expect("valid regex"));

const UNSAFE_CHARS: &[char] = &['<', '>', '"', '\'', '&'];

/// Parse raw text into unique participants, capping names at `MAX_NAME_LENGTH`
pub fn parse_names(input: &str) -> Vec<Participant> {
    parse_names_capped(input, MAX_NAME_LENGTH)
}

/// Parse raw text into unique participants.
///
/// Malformed entries are dropped silently. Duplicate names (case-insensitive)
/// keep their first occurrence.
pub fn parse_names_capped(input: &str, max_name_length: usize) -> Vec<Participant> {
    let mut people = Vec::new();
    let mut seen = HashSet::new();

    for entry in input
        .split([';', '\n'])
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        let Some(raw) = extract_name(entry) else {
            tracing::debug!("Dropping unparseable entry: {:?}", entry);
            continue;
        };

        let name = sanitize_name(&raw, max_name_length);
        if name.is_empty() {
            continue;
        }

        if seen.insert(name.to_lowercase()) {
            people.push(Participant::new(name));
        } else {
            tracing::debug!("Dropping duplicate name: {}", name);
        }
    }

    people
}

fn strip_code_suffix(s: &str) -> String {
    CODE_SUFFIX.replace(s, "").trim().to_string()
}

/// Extract a display name from a single entry
fn extract_name(entry: &str) -> Option<String> {
    if let Some(caps) = DIRECTORY_FORMAT.captures(entry) {
        let last_name = caps[1].trim();
        let first_name = strip_code_suffix(caps[2].trim());

        if !first_name.is_empty() && !last_name.is_empty() {
            return Some(format!("{} {}", first_name, last_name));
        }
    }

    if let Some(caps) = NAME_WITH_ADDRESS.captures(entry) {
        let name = strip_code_suffix(caps[1].trim());
        if !name.is_empty() {
            return Some(name);
        }
    }

    let plain = strip_code_suffix(entry);
    if !plain.is_empty() && !plain.contains('@') {
        return Some(plain);
    }

    None
}

/// Strip markup-sensitive characters and cap the length (in chars)
pub fn sanitize_name(raw: &str, max_len: usize) -> String {
    let cleaned: String = raw.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect();
    let capped: String = cleaned.trim().chars().take(max_len).collect();
    capped.trim().to_string()
}

/// Check the roster size against the default bounds
pub fn validate_name_count(count: usize) -> NameCountValidation {
    validate_name_count_within(count, MIN_NAMES, MAX_NAMES)
}

pub fn validate_name_count_within(count: usize, min: usize, max: usize) -> NameCountValidation {
    match check_name_count(count, min, max) {
        Ok(()) => NameCountValidation {
            valid: true,
            message: String::new(),
        },
        Err(e) => NameCountValidation {
            valid: false,
            message: e.to_string(),
        },
    }
}

pub(crate) fn check_name_count(count: usize, min: usize, max: usize) -> Result<(), WheelError> {
    if count < min {
        return Err(WheelError::TooFewNames { min });
    }
    if count > max {
        return Err(WheelError::TooManyNames { max });
    }
    Ok(())
}
