//! Batch fetch orchestrator for company-scout
//!
//! Runs one fetch per ticker concurrently (a fan-in gather), collects the
//! successful records, and reports the failures on the side. A fault while
//! processing one ticker never aborts its siblings or the run: the failure is
//! logged with its ticker and becomes an absence in the output.
//!
//! Concurrency is unbounded by default: every ticker is in flight at once,
//! suspended at its network and model calls on the shared runtime. A cap can
//! be set for larger runs where unbounded fan-out would overwhelm the model
//! endpoint.

use futures::stream::{self, StreamExt};
use scout_core::{CompanyFetcher, CompanyInfo, FetchError, Ticker};
use tracing::{info, warn};

/// Configuration for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Maximum number of fetches in flight at once
    ///
    /// `None` launches every ticker immediately, which is the default and
    /// matches the behavior this tool started with.
    pub concurrency: Option<usize>,
}

impl BatchConfig {
    /// Create a config with unbounded concurrency
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of fetches in flight at once
    ///
    /// A cap of 0 is treated as unbounded.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = if concurrency == 0 {
            None
        } else {
            Some(concurrency)
        };
        self
    }
}

/// Outcome of a batch run
///
/// Successful records appear in task-completion order, not input order.
/// Failed tickers are never retried and never appear in `companies`; they are
/// kept here so callers can log or record them.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully fetched records, in completion order
    pub companies: Vec<CompanyInfo>,
    /// Per-ticker failures, in completion order
    pub failures: Vec<FetchError>,
}

impl BatchReport {
    /// Number of tickers that produced a record
    pub fn succeeded(&self) -> usize {
        self.companies.len()
    }

    /// Number of tickers that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Orchestrates concurrent per-ticker fetches
///
/// The orchestrator is a pure function of (ticker list, fetch capability);
/// it holds no state besides its configuration, so the same input and a
/// deterministic fetcher always produce the same success set.
#[derive(Debug, Clone, Default)]
pub struct BatchOrchestrator {
    config: BatchConfig,
}

impl BatchOrchestrator {
    /// Create an orchestrator with the given configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Fetch every ticker concurrently and gather the results
    ///
    /// Launches one fetch per ticker, awaits them all, and splits the
    /// outcomes into successes and failures. An empty ticker list yields an
    /// empty report; a run where every ticker fails yields an empty success
    /// set without an error.
    pub async fn gather<F>(&self, tickers: &[Ticker], fetcher: &F) -> BatchReport
    where
        F: CompanyFetcher + ?Sized,
    {
        // A cap of None means all N in flight at once
        let in_flight = self.config.concurrency.unwrap_or(tickers.len()).max(1);

        info!(
            tickers = tickers.len(),
            in_flight = in_flight,
            "Starting batch fetch"
        );

        let outcomes: Vec<scout_core::Result<CompanyInfo>> = stream::iter(tickers)
            .map(|ticker| async move { fetcher.fetch(ticker).await })
            .buffer_unordered(in_flight)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(info) => report.companies.push(info),
                Err(e) => {
                    warn!(ticker = %e.ticker(), error = %e, "Ticker fetch failed");
                    report.failures.push(e);
                }
            }
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch fetch finished"
        );

        report
    }
}

/// Convenience entry point with default (unbounded) configuration
pub async fn gather<F>(tickers: &[Ticker], fetcher: &F) -> BatchReport
where
    F: CompanyFetcher + ?Sized,
{
    BatchOrchestrator::default().gather(tickers, fetcher).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(ticker: &str) -> CompanyInfo {
        CompanyInfo {
            company_name: format!("{ticker} Corp"),
            ticker: ticker.to_string(),
            sector: "Technology".to_string(),
            founding_year: 2000,
            number_of_employees: 10,
            ceo_tenure_years: 1.0,
            ceo_count_since_2010: 1,
            average_glassdoor_rating: 4.0,
            institutional_ownership_pct: 50.0,
            board_member_count: 5,
            job_positions_open: 3,
        }
    }

    fn tickers(symbols: &[&str]) -> Vec<Ticker> {
        symbols.iter().map(|s| Ticker::new(*s)).collect()
    }

    /// Stub fetcher that fails a chosen set of tickers and can simulate a
    /// per-call delay, counting calls and peak concurrency along the way
    struct StubFetcher {
        fail: HashSet<String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl StubFetcher {
        fn new(fail: &[&str]) -> Self {
            Self {
                fail: fail.iter().map(|s| (*s).to_string()).collect(),
                delay: None,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl CompanyFetcher for StubFetcher {
        async fn fetch(&self, ticker: &Ticker) -> scout_core::Result<CompanyInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail.contains(ticker.as_str()) {
                Err(FetchError::AgentFailed {
                    ticker: ticker.to_string(),
                    reason: "stub failure".to_string(),
                })
            } else {
                Ok(record(ticker.as_str()))
            }
        }
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_report() {
        let fetcher = StubFetcher::new(&[]);
        let report = gather(&[], &fetcher).await;
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_success() {
        let fetcher = StubFetcher::new(&[]);
        let input = tickers(&["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"]);

        let report = gather(&input, &fetcher).await;

        assert_eq!(report.succeeded(), 5);
        assert_eq!(report.failed(), 0);

        // Every input is present exactly once, ignoring order
        let got: HashSet<String> = report.companies.iter().map(|c| c.ticker.clone()).collect();
        let want: HashSet<String> = input.iter().map(|t| t.as_str().to_string()).collect();
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_success_set() {
        let fetcher = StubFetcher::new(&["AAPL", "MSFT", "GOOGL"]);
        let input = tickers(&["AAPL", "MSFT", "GOOGL"]);

        let report = gather(&input, &fetcher).await;

        assert!(report.companies.is_empty());
        assert_eq!(report.failed(), 3);
    }

    #[tokio::test]
    async fn test_mixed_outcomes() {
        // Five identifiers where #2 and #4 fail
        let fetcher = StubFetcher::new(&["MSFT", "AMZN"]);
        let input = tickers(&["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"]);

        let report = gather(&input, &fetcher).await;

        let got: HashSet<&str> = report
            .companies
            .iter()
            .map(|c| c.ticker.as_str())
            .collect();
        assert_eq!(got, HashSet::from(["AAPL", "GOOGL", "TSLA"]));

        let failed: HashSet<&str> = report.failures.iter().map(FetchError::ticker).collect();
        assert_eq!(failed, HashSet::from(["MSFT", "AMZN"]));
    }

    #[tokio::test]
    async fn test_output_never_exceeds_input() {
        let fetcher = StubFetcher::new(&["GOOGL"]);
        let input = tickers(&["AAPL", "MSFT", "GOOGL"]);

        let report = gather(&input, &fetcher).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
        assert!(report.succeeded() <= input.len());
        assert_eq!(report.succeeded() + report.failed(), input.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_run_in_parallel() {
        let delay = Duration::from_millis(50);
        let fetcher = StubFetcher::new(&[]).with_delay(delay);
        let input = tickers(&["A", "B", "C", "D", "E", "F", "G", "H"]);

        let start = tokio::time::Instant::now();
        let report = gather(&input, &fetcher).await;
        let elapsed = start.elapsed();

        assert_eq!(report.succeeded(), 8);
        // Parallel: wall clock approximates one delay, not N of them
        assert!(elapsed < delay * 2, "took {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_cap_is_respected() {
        let fetcher = StubFetcher::new(&[]).with_delay(Duration::from_millis(10));
        let input = tickers(&["A", "B", "C", "D", "E", "F"]);

        let orchestrator = BatchOrchestrator::new(BatchConfig::new().with_concurrency(2));
        let report = orchestrator.gather(&input, &fetcher).await;

        assert_eq!(report.succeeded(), 6);
        assert!(fetcher.peak_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_idempotent_over_deterministic_stub() {
        let fetcher = StubFetcher::new(&["MSFT"]);
        let input = tickers(&["AAPL", "MSFT", "GOOGL"]);

        let first = gather(&input, &fetcher).await;
        let second = gather(&input, &fetcher).await;

        let sorted = |report: &BatchReport| {
            let mut names: Vec<String> =
                report.companies.iter().map(|c| c.ticker.clone()).collect();
            names.sort();
            names
        };
        assert_eq!(sorted(&first), sorted(&second));
    }

    #[test]
    fn test_zero_cap_means_unbounded() {
        let config = BatchConfig::new().with_concurrency(0);
        assert_eq!(config.concurrency, None);

        let config = BatchConfig::new().with_concurrency(3);
        assert_eq!(config.concurrency, Some(3));
    }
}
