use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Header flags: `Name: value`. The name may not contain ':', '|', or
/// whitespace; the first ": " is the delimiter and the rest is the value.
const HEADER_PATTERN: &str = r"^([^:|\s]+): (.+)$";

/// Auth flags: `user:secret`. The user may not contain ':' or '|'; the
/// secret runs from the first ':' to the end, punctuation included.
const AUTH_PATTERN: &str = r"^([^:|]+):(.+)$";

static HEADER_GRAMMAR: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(HEADER_PATTERN));
static AUTH_GRAMMAR: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(AUTH_PATTERN));

/// Name/value pair split out of a single flag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedPair {
    pub(crate) name: String,
    pub(crate) value: String,
}

pub(crate) fn header_grammar() -> Result<&'static Regex, ValidationError> {
    compiled(&HEADER_GRAMMAR)
}

pub(crate) fn auth_grammar() -> Result<&'static Regex, ValidationError> {
    compiled(&AUTH_GRAMMAR)
}

fn compiled(
    grammar: &'static Lazy<Result<Regex, regex::Error>>,
) -> Result<&'static Regex, ValidationError> {
    grammar
        .as_ref()
        .map_err(|err| ValidationError::GrammarCompile { source: err.clone() })
}

/// Match `input` against a pair grammar. Both capture groups must be present
/// for a match; the grammars themselves guarantee they are non-empty.
pub(crate) fn split_pair(input: &str, grammar: &Regex) -> Option<ParsedPair> {
    let captures = grammar.captures(input)?;
    let name = captures.get(1)?.as_str();
    let value = captures.get(2)?.as_str();
    Some(ParsedPair {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}
