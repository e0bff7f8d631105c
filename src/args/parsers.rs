use std::time::Duration;

use super::grammar;
use super::types::{BasicAuth, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

/// Split a `-H` flag into a header name/value pair. The value keeps any
/// punctuation after the first ": " verbatim, including further colons.
pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    let pair = grammar::split_pair(s, grammar::header_grammar()?).ok_or_else(|| {
        ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }
    })?;
    Ok((pair.name, pair.value))
}

/// Split a `-a` flag into basic-auth credentials. Everything after the first
/// colon is the secret, so `+`, `$`, `*`, `{` and friends pass through.
pub(crate) fn parse_basic_auth(s: &str) -> Result<BasicAuth, ValidationError> {
    let pair = grammar::split_pair(s, grammar::auth_grammar()?).ok_or_else(|| {
        ValidationError::InvalidAuthFormat {
            value: s.to_owned(),
        }
    })?;
    Ok(BasicAuth {
        username: pair.name,
        password: pair.value,
    })
}

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    };

    if duration.as_millis() == 0 {
        return Err(AppError::validation(ValidationError::DurationZero));
    }

    Ok(duration)
}
