//! Date handling: section labels from timestamped directory names, and the
//! build stamp shown in every page header.
//!
//! Chart directories are often named after the moment their data was cut:
//!
//! ```text
//! 2024-06-01 10-00-00   →   "June 2024"
//! monthly_overview      →   no date, the name is used as-is
//! ```

use chrono::{Month, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-\d{2} \d{2}-\d{2}-\d{2}").expect("timestamp pattern is valid")
});

/// Extract `"<Month name> <year>"` from the first `YYYY-MM-DD HH-MM-SS`
/// timestamp inside `name`.
///
/// Returns `None` when there is no timestamp or its month is not 01–12.
///
/// ```
/// use coinjoin_web::dates::month_year;
///
/// assert_eq!(month_year("2024-06-01 10-00-00").as_deref(), Some("June 2024"));
/// assert_eq!(month_year("overview"), None);
/// ```
pub fn month_year(name: &str) -> Option<String> {
    let caps = TIMESTAMP.captures(name)?;
    let year = &caps[1];
    let month: u8 = caps[2].parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Some(format!("{} {}", month.name(), year))
}

/// Heading text for a walked directory: its month label, else its name.
pub fn section_label(dir_name: &str) -> String {
    month_year(dir_name).unwrap_or_else(|| dir_name.to_string())
}

/// Per-build values rendered into every page.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStamp {
    /// "Last updated" text in the header.
    pub updated: String,
    /// `YYYY-MM-DD` cache buster appended to image URLs as `?v<version>`.
    pub version: String,
}

impl BuildStamp {
    /// Stamp for a build on `today`. The header date comes from the data
    /// summary when one is available, else `today` as `DD-MM-YYYY`.
    pub fn new(today: NaiveDate, summary_date: Option<String>) -> Self {
        Self {
            updated: summary_date.unwrap_or_else(|| today.format("%d-%m-%Y").to_string()),
            version: today.format("%Y-%m-%d").to_string(),
        }
    }
}
