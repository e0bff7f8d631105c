use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_basic_auth, parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
};
use super::types::{BasicAuth, HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load tester with a strict flag grammar - validated headers and credentials, file-backed request bodies, and latency percentiles for quick API checks."
)]
pub struct LoadArgs {
    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Target URL for the load test
    #[arg(long, short)]
    pub url: String,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// HTTP Accept header (shortcut)
    #[arg(long = "accept", short = 'A')]
    pub accept_header: Option<String>,

    /// Content-Type header (shortcut)
    #[arg(long = "content-type", short = 'T')]
    pub content_type: Option<String>,

    /// Basic auth credentials in 'user:secret' format
    #[arg(long = "basic-auth", short = 'a', value_parser = parse_basic_auth)]
    pub basic_auth: Option<BasicAuth>,

    /// Request body; '@path' reads the body from a file
    #[arg(long, short, default_value = "")]
    pub data: String,

    /// Duration of test (seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "30",
        value_parser = parse_positive_u64
    )]
    pub target_duration: PositiveU64,

    /// Stop after N total requests
    #[arg(long = "requests", short = 'n', value_parser = parse_positive_u64)]
    pub requests: Option<PositiveU64>,

    /// Number of concurrent worker tasks
    #[arg(
        long = "concurrency",
        short = 'c',
        default_value = "50",
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Expected HTTP status code
    #[arg(long = "status", short = 's', default_value = "200")]
    pub expected_status_code: u16,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Summary output format
    #[arg(long = "output", short = 'o', default_value = "text", ignore_case = true)]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', env = "VOLLEY_VERBOSE")]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color", env = "NO_COLOR")]
    pub no_color: bool,
}
