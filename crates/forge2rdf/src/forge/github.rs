//! Blocking GitHub REST client implementing both forge collaborators.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::http_cache::HttpCache;
use super::{
    CodeSearch, CodeSearchRequest, CodeSearchResults, ForgeError, RepositoryFetcher,
    RepositoryMetadata,
};
use crate::config::Config;
use crate::model::iri::IriMinter;
use crate::model::ProjectDescriptor;

/// Environment variable holding an optional API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Error body returned by the API.
#[derive(Deserialize)]
struct ApiError {
    message: String,
}

pub struct GitHubClient {
    http: Client,
    iris: IriMinter,
    token: Option<String>,
    cache: Option<HttpCache>,
}

impl GitHubClient {
    /// Every request is bounded by `timeout`.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let http = Client::builder()
            .user_agent(concat!("forge2rdf/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::Transport {
                url: api_base.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            iris: IriMinter::new(api_base),
            token: None,
            cache: None,
        })
    }

    /// Build a client from configuration, picking up a token from the environment.
    pub fn from_config(config: &Config, http_cache: bool) -> Result<Self, ForgeError> {
        let mut client = Self::new(&config.api_base_url, config.request_timeout())?;
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                client = client.with_token(token.trim());
            }
        }
        if http_cache {
            client = client.with_http_cache(HttpCache::new(&config.http_cache_dir));
        }
        Ok(client)
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_http_cache(mut self, cache: HttpCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ForgeError> {
        let mut builder = self.http.get(url).query(query);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.build().map_err(|e| ForgeError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let full_url = request.url().to_string();

        let body = match self.cache.as_ref().and_then(|c| c.get(&full_url)) {
            Some(body) => body,
            None => {
                debug!(url = %full_url, "GET");
                let response = self
                    .http
                    .execute(request)
                    .map_err(|e| transport_error(&full_url, e))?;
                let body = read_success(&full_url, response)?;
                if let Some(cache) = &self.cache {
                    cache.put(&full_url, &body);
                }
                body
            }
        };

        serde_json::from_str(&body).map_err(|e| ForgeError::Decode {
            url: full_url,
            message: e.to_string(),
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> ForgeError {
    if err.is_timeout() {
        ForgeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ForgeError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Map a response to its body, or to the matching [`ForgeError`].
fn read_success(url: &str, response: Response) -> Result<String, ForgeError> {
    let status = response.status();
    if status.is_success() {
        return response.text().map_err(|e| transport_error(url, e));
    }

    let headers = response.headers().clone();
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && (headers
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v.as_bytes() == b"0")
                || message.to_ascii_lowercase().contains("rate limit")));
    if rate_limited {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ForgeError::RateLimited {
            url: url.to_string(),
            retry_after,
        });
    }

    Err(match status {
        StatusCode::NOT_FOUND => ForgeError::NotFound {
            url: url.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY => ForgeError::UnprocessableQuery { message },
        _ => ForgeError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        },
    })
}

impl RepositoryFetcher for GitHubClient {
    fn fetch_repository(
        &self,
        project: &ProjectDescriptor,
    ) -> Result<RepositoryMetadata, ForgeError> {
        let url = self.iris.project_iri(project);
        self.get_json(&url, &[])
    }
}

impl CodeSearch for GitHubClient {
    fn search_code(&self, request: &CodeSearchRequest) -> Result<CodeSearchResults, ForgeError> {
        let url = format!("{}/search/code", self.iris.api_base());
        let mut query = vec![("q", request.query.as_str())];
        if let Some(sort) = request.sort.as_param() {
            query.push(("sort", sort));
            query.push(("order", request.order.as_param()));
        }
        self.get_json(&url, &query)
    }
}
