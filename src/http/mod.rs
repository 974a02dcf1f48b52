//! HTTP client module
//!
//! Provides an HTTP client with retry, rate limiting, and backoff strategies.
//! Transient failures (429, 5xx, timeouts, connection errors) are retried;
//! other client errors fail immediately.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestBody, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
