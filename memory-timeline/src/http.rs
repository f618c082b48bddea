use reqwest::Client;
use std::time::Duration;

/// Build the HTTP client shared by every backend call.
///
/// `Client::clone()` is an `Arc` increment, so the controller hands clones of
/// this one client to each spawned request.
pub fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(5)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}
