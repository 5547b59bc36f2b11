use crate::config::HttpConfig;
use crate::github::api::GitHubApi;
use crate::github::GitHubError;
use crate::observability::github_metrics;
use crate::settings::GitHubSettings;
use async_trait::async_trait;
use bytes::Bytes;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use http::header::{ACCEPT, AUTHORIZATION};
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use moka::future::Cache;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

type RawResponse = http::Response<BoxBody<Bytes, octocrab::Error>>;

/// Rate-limited, caching GitHub client built on Octocrab.
///
/// Every request waits on a shared `governor` quota. JSON bodies are cached
/// in memory for `cache_ttl_seconds` so repeated reads of the same route
/// within one command are free.
#[derive(Debug)]
pub struct RateLimitedHttpClient {
    octocrab: Octocrab,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    cache: Option<Cache<String, Arc<String>>>,
    base_url: String,
}

impl RateLimitedHttpClient {
    /// Build a client from stored settings; the token must be present
    pub fn from_settings(
        settings: &GitHubSettings,
        default_base_url: &str,
        http_config: &HttpConfig,
    ) -> Result<Self, GitHubError> {
        let token = settings.require_token()?;
        Self::new(token, settings.base_url_or(default_base_url), http_config)
    }

    pub fn new(token: &str, base_url: &str, http_config: &HttpConfig) -> Result<Self, GitHubError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let per_second = NonZeroU32::new(http_config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(http_config.burst_capacity).unwrap_or(per_second);
        let rate_limiter = Arc::new(RateLimiter::direct(
            Quota::per_second(per_second).allow_burst(burst),
        ));

        // Failures are reported once; callers decide how to degrade.
        let octocrab = Octocrab::builder()
            .base_uri(base_url.as_str())?
            .add_header(AUTHORIZATION, format!("token {token}"))
            .add_header(ACCEPT, GITHUB_V3_JSON.to_string())
            .add_retry_config(RetryConfig::None)
            .build()?;

        let cache = (http_config.cache_ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(http_config.cache_capacity)
                .time_to_live(Duration::from_secs(http_config.cache_ttl_seconds))
                .build()
        });

        Ok(Self {
            octocrab,
            rate_limiter,
            cache,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `route`; URLs returned by the API pass through
    pub fn resolve(&self, route: &str) -> String {
        if route.starts_with("http://") || route.starts_with("https://") {
            route.to_string()
        } else if route.starts_with('/') {
            format!("{}{}", self.base_url, route)
        } else {
            format!("{}/{}", self.base_url, route)
        }
    }

    async fn execute(&self, route: &str) -> Result<RawResponse, GitHubError> {
        let url = self.resolve(route);
        let uri: http::Uri = url.parse().map_err(|_| GitHubError::Uri(url.clone()))?;

        let waiting_since = Instant::now();
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;
        if waiting_since.elapsed() > Duration::from_millis(100) {
            github_metrics().record_rate_limit_wait();
        }

        github_metrics().record_request();
        debug!(url = %url, "GitHub GET");

        let response = self.octocrab._get(uri).await.inspect_err(|_| {
            github_metrics().record_error();
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        github_metrics().record_error();
        let body = self.octocrab.body_to_string(response).await.unwrap_or_default();
        warn!(url = %url, status = status.as_u16(), "GitHub API returned an error status");
        Err(GitHubError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_text(&self, route: &str) -> Result<String, GitHubError> {
        let response = self.execute(route).await?;
        Ok(self.octocrab.body_to_string(response).await?)
    }

    /// Clear cache (useful after settings change or in tests)
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            info!("HTTP client cache cleared");
        }
    }
}

#[async_trait]
impl GitHubApi for RateLimitedHttpClient {
    async fn get_json(&self, route: &str) -> Result<serde_json::Value, GitHubError> {
        let key = self.resolve(route);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                github_metrics().record_cache_hit();
                debug!(url = %key, "Cache hit");
                return serde_json::from_str(&cached).map_err(|source| GitHubError::Decode {
                    route: route.to_string(),
                    source,
                });
            }
            github_metrics().record_cache_miss();
        }

        let body = self.fetch_text(route).await?;
        let value = serde_json::from_str(&body).map_err(|source| GitHubError::Decode {
            route: route.to_string(),
            source,
        })?;

        if let Some(cache) = &self.cache {
            cache.insert(key, Arc::new(body)).await;
        }
        Ok(value)
    }

    async fn get_text(&self, route: &str) -> Result<String, GitHubError> {
        self.fetch_text(route).await
    }

    async fn get_bytes(&self, route: &str) -> Result<Vec<u8>, GitHubError> {
        let response = self.execute(route).await?;
        let collected = response.into_body().collect().await?;
        Ok(collected.to_bytes().to_vec())
    }
}
