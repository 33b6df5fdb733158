use async_trait::async_trait;

use crate::utils::error::Result;

/// Given a URL, return the current price or fail.
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch_price(&self, url: &str) -> Result<f64>;
}
