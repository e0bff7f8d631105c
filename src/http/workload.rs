use base64::Engine as _;
use reqwest::{Client, Method, Request};
use url::Url;

use crate::args::{BasicAuth, DEFAULT_USER_AGENT, HttpMethod, LoadArgs};
use crate::error::{AppError, AppResult, HttpError, ValidationError};

use super::body::resolve_request_body;

/// Fully validated request inputs, ready to become a request template.
pub(crate) struct RequestSpec {
    pub(crate) method: HttpMethod,
    pub(crate) url: Url,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: String,
    pub(crate) auth: Option<BasicAuth>,
}

pub(crate) fn build_request_spec(args: &LoadArgs) -> AppResult<RequestSpec> {
    let url = parse_target_url(&args.url)?;
    let headers = build_headers(args);
    let body = resolve_request_body(&args.data)?;
    Ok(RequestSpec {
        method: args.method,
        url,
        headers,
        body,
        auth: args.basic_auth.clone(),
    })
}

fn parse_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if url.host_str().is_none() {
        return Err(AppError::validation(ValidationError::UrlMissingHost));
    }
    Ok(url)
}

pub(crate) fn build_headers(args: &LoadArgs) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    if let Some(accept) = args.accept_header.as_ref() {
        headers.push(("Accept".to_owned(), accept.clone()));
    }
    if let Some(content_type) = args.content_type.as_ref() {
        headers.push(("Content-Type".to_owned(), content_type.clone()));
    }
    headers.extend(args.headers.iter().cloned());
    if !has_user_agent(&headers) {
        headers.push(("User-Agent".to_owned(), DEFAULT_USER_AGENT.to_owned()));
    }
    headers
}

fn has_user_agent(headers: &[(String, String)]) -> bool {
    headers
        .iter()
        .any(|(key, _)| key.eq_ignore_ascii_case("user-agent"))
}

fn request_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Build the immutable request template workers clone per iteration.
pub(crate) fn build_request(client: &Client, spec: &RequestSpec) -> AppResult<Request> {
    let mut builder = client.request(request_method(spec.method), spec.url.clone());
    for (key, value) in &spec.headers {
        builder = builder.header(key, value);
    }
    if let Some(auth) = spec.auth.as_ref() {
        let token = format!("{}:{}", auth.username, auth.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(token.as_bytes());
        builder = builder.header("Authorization", format!("Basic {}", encoded));
    }
    builder
        .body(spec.body.clone())
        .build()
        .map_err(|err| AppError::http(HttpError::BuildRequestFailed { source: err }))
}
