//! CLI argument types and flag-grammar parsing.
mod cli;
mod defaults;
pub(crate) mod grammar;
pub(crate) mod parsers;
mod types;


pub use cli::LoadArgs;
pub use types::{BasicAuth, HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

pub(crate) use defaults::DEFAULT_USER_AGENT;
#[cfg(test)]
pub(crate) use parsers::{parse_basic_auth, parse_header};
