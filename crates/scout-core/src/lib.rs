//! Core types for company-scout
//!
//! This crate defines the domain model shared by every other crate:
//! the [`Ticker`] identifier, the [`CompanyInfo`] record the research agent
//! fills in, the [`CompanyFetcher`] capability trait, and the error type for
//! per-ticker fetch failures.

pub mod company;
pub mod error;
pub mod fetcher;
pub mod ticker;

pub use company::CompanyInfo;
pub use error::{FetchError, Result};
pub use fetcher::CompanyFetcher;
pub use ticker::Ticker;
