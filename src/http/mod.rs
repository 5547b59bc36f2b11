pub mod client;


pub use client::{RateLimitedHttpClient, DEFAULT_BASE_URL};
