//! Dataset output: CSV file and console table

use comfy_table::{Table, presets::UTF8_FULL};
use scout_core::CompanyInfo;
use std::path::Path;

/// Column headers, in CSV/table order
///
/// Must match the field order of [`CompanyInfo`]; the CSV header is derived
/// from the struct by serde, this list drives the console table.
const COLUMNS: [&str; 11] = [
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
    "job_positions_open",
];

/// Write one CSV row per record, header derived from the field names
pub fn write_csv(path: &Path, companies: &[CompanyInfo]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for company in companies {
        writer.serialize(company)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the dataset as a console table
pub fn render_table(companies: &[CompanyInfo]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(COLUMNS);

    for c in companies {
        table.add_row(vec![
            c.company_name.clone(),
            c.ticker.clone(),
            c.sector.clone(),
            c.founding_year.to_string(),
            c.number_of_employees.to_string(),
            format!("{:.1}", c.ceo_tenure_years),
            c.ceo_count_since_2010.to_string(),
            format!("{:.1}", c.average_glassdoor_rating),
            format!("{:.1}", c.institutional_ownership_pct),
            c.board_member_count.to_string(),
            c.job_positions_open.to_string(),
        ]);
    }

    table.to_string()
}
