pub mod csv_rows;

pub use csv_rows::{write_csv, AnalyticsCsvRow, LinkCsvRow, ANALYTICS_CSV_HEADERS, LINK_CSV_HEADERS};
