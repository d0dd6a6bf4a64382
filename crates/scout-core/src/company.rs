//! The company attribute record filled in by the research agent

use serde::{Deserialize, Serialize};

/// Flat record of company attributes, one per successfully researched ticker
///
/// Field order defines the CSV column order. The values come from an external
/// language model and are treated as opaque here; no validation is performed
/// beyond schema conformance during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Full legal company name
    pub company_name: String,
    /// Ticker symbol the record was researched for
    pub ticker: String,
    /// Sector/industry classification
    pub sector: String,
    /// Year the company was founded
    pub founding_year: i32,
    /// Current total number of employees
    pub number_of_employees: i64,
    /// Current CEO's tenure in years
    pub ceo_tenure_years: f64,
    /// Number of different CEOs since January 1, 2010
    pub ceo_count_since_2010: i32,
    /// Average employee rating on Glassdoor
    pub average_glassdoor_rating: f64,
    /// Percentage of shares held by institutional investors
    pub institutional_ownership_pct: f64,
    /// Total number of board members
    pub board_member_count: i32,
    /// Current number of open job positions, globally
    pub job_positions_open: i64,
}

impl CompanyInfo {
    /// JSON Schema describing this record, in the shape expected by
    /// OpenAI-style `response_format` structured output
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "company_name": { "type": "string" },
                "ticker": { "type": "string" },
                "sector": { "type": "string" },
                "founding_year": { "type": "integer" },
                "number_of_employees": { "type": "integer" },
                "ceo_tenure_years": { "type": "number" },
                "ceo_count_since_2010": { "type": "integer" },
                "average_glassdoor_rating": { "type": "number" },
                "institutional_ownership_pct": { "type": "number" },
                "board_member_count": { "type": "integer" },
                "job_positions_open": { "type": "integer" }
            },
            "required": [
                "company_name",
                "ticker",
                "sector",
                "founding_year",
                "number_of_employees",
                "ceo_tenure_years",
                "ceo_count_since_2010",
                "average_glassdoor_rating",
                "institutional_ownership_pct",
                "board_member_count",
                "job_positions_open"
            ],
            "additionalProperties": false
        })
    }
}
