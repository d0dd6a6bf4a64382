//! System prompts for the company research agent

/// System prompt for the company research agent
///
/// Instructs the model to research every attribute of the company record via
/// the web search tool and answer with JSON matching the CompanyInfo schema.
pub const COMPANY_RESEARCH: &str = r"For a given U.S.-listed company ticker, use the web search tool to find:
- Full company name
- Ticker symbol
- Sector/industry
- Year the company was founded
- Current total number of employees
- Current CEO's tenure in years
- Number of different CEOs the company has had since January 1, 2010
- Average employee rating on Glassdoor
- Percentage of shares held by institutional investors
- Total number of board members
- Current number of job positions open (globally)

Then return exactly the JSON matching the CompanyInfo schema.
Get accurate information from the web. Do deep research for each and every attribute.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_covers_every_field() {
        for topic in [
            "company name",
            "Ticker",
            "Sector",
            "founded",
            "employees",
            "CEO",
            "Glassdoor",
            "institutional",
            "board members",
            "job positions",
        ] {
            assert!(COMPANY_RESEARCH.contains(topic), "missing: {topic}");
        }
    }
}
