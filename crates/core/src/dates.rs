//! French long-form dates as printed by the source theme ("5 mars 2020").

use chrono::{Datelike, NaiveDate};

/// Month names, January first
pub const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Parse a "day month year" French date.
///
/// The month is matched case-insensitively against [`FRENCH_MONTHS`], then
/// on its first three characters. Day and year accept trailing non-digit
/// characters ("1er"). Any missing or invalid component yields `None`.
pub fn parse_french_date(input: &str) -> Option<NaiveDate> {
    let mut tokens = input.split_whitespace();
    let day = leading_number(tokens.next()?)?;
    let month = month_number(tokens.next()?)?;
    let year = leading_number(tokens.next()?)?;

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Format as `D monthname YYYY`; `None` formats as an empty string
pub fn format_french_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("{} {} {}", d.day(), FRENCH_MONTHS[d.month0() as usize], d.year()),
        None => String::new(),
    }
}

fn leading_number(token: &str) -> Option<u32> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn month_number(token: &str) -> Option<u32> {
    let name = token
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_lowercase();
    if name.is_empty() {
        return None;
    }

    let index = FRENCH_MONTHS
        .iter()
        .position(|m| *m == name)
        .or_else(|| {
            let prefix: String = name.chars().take(3).collect();
            FRENCH_MONTHS
                .iter()
                .position(|m| m.chars().take(3).collect::<String>() == prefix)
        })?;

    Some(index as u32 + 1)
}
