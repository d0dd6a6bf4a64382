//! S&P 500 constituent list
//!
//! Scrapes the constituents table from Wikipedia. The symbol cell of each row
//! links to the listing exchange's quote page, which is a much more stable
//! anchor than the table markup itself.

use anyhow::{Context, bail};
use regex::Regex;
use scout_core::Ticker;

const CONSTITUENTS_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Fetch the current S&P 500 ticker symbols
pub async fn fetch_constituents() -> anyhow::Result<Vec<Ticker>> {
    let html = reqwest::get(CONSTITUENTS_URL)
        .await
        .context("requesting constituents page")?
        .error_for_status()
        .context("constituents page returned an error status")?
        .text()
        .await
        .context("reading constituents page body")?;

    let tickers = parse_constituents(&html)?;
    if tickers.is_empty() {
        bail!("no ticker symbols found in constituents page");
    }
    Ok(tickers)
}

/// Pull ticker symbols out of the constituents table HTML
///
/// Matches the exchange quote links in the symbol column, e.g.
/// `<a ... href="https://www.nyse.com/quote/XNYS:MMM">MMM</a>`.
fn parse_constituents(html: &str) -> anyhow::Result<Vec<Ticker>> {
    let symbol_re = Regex::new(
        r#"href="https://www\.(?:nyse\.com/quote|nasdaq\.com/market-activity/stocks|cboe\.com)/[^"]*"[^>]*>([A-Z][A-Z.\-]{0,7})</a>"#,
    )
    .context("compiling symbol pattern")?;

    let mut seen = std::collections::HashSet::new();
    let mut tickers = Vec::new();
    for capture in symbol_re.captures_iter(html) {
        let symbol = &capture[1];
        if seen.insert(symbol.to_string()) {
            tickers.push(Ticker::new(symbol));
        }
    }
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <table class="wikitable sortable" id="constituents">
        <tr>
        <td><a rel="nofollow" class="external text" href="https://www.nyse.com/quote/XNYS:MMM">MMM</a></td>
        <td><a href="/wiki/3M" title="3M">3M</a></td>
        </tr>
        <tr>
        <td><a rel="nofollow" class="external text" href="https://www.nasdaq.com/market-activity/stocks/aapl">AAPL</a></td>
        <td><a href="/wiki/Apple_Inc." title="Apple Inc.">Apple Inc.</a></td>
        </tr>
        <tr>
        <td><a rel="nofollow" class="external text" href="https://www.nyse.com/quote/XNYS:BRK.B">BRK.B</a></td>
        <td><a href="/wiki/Berkshire_Hathaway" title="Berkshire Hathaway">Berkshire Hathaway</a></td>
        </tr>
        </table>
    "#;

    #[test]
    fn test_parse_constituents() {
        let tickers = parse_constituents(SAMPLE_HTML).unwrap();
        let symbols: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(symbols, vec!["MMM", "AAPL", "BRK.B"]);
    }

    #[test]
    fn test_parse_ignores_wiki_links() {
        let tickers = parse_constituents(SAMPLE_HTML).unwrap();
        assert!(tickers.iter().all(|t| t.as_str() != "3M"));
    }

    #[test]
    fn test_parse_deduplicates() {
        let doubled = format!("{SAMPLE_HTML}{SAMPLE_HTML}");
        let tickers = parse_constituents(&doubled).unwrap();
        assert_eq!(tickers.len(), 3);
    }

    #[test]
    fn test_parse_empty_page() {
        let tickers = parse_constituents("<html><body></body></html>").unwrap();
        assert!(tickers.is_empty());
    }
}
