//! The per-ticker fetch capability

use crate::{CompanyInfo, Result, Ticker};
use async_trait::async_trait;

/// Capability that produces a [`CompanyInfo`] record for a single ticker
///
/// The concrete implementation (prompting, tool invocation, schema coercion)
/// lives behind this trait so the batch orchestrator can be tested with stub
/// implementations that never touch a model or the network.
#[async_trait]
pub trait CompanyFetcher: Send + Sync {
    /// Research one ticker and return its attribute record
    async fn fetch(&self, ticker: &Ticker) -> Result<CompanyInfo>;
}
