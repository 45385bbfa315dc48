//! Display helpers: Indonesian dates, view counts and article paragraphs.

use chrono::{DateTime, Datelike, Utc, Weekday};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// `15 Januari 2025`
pub fn format_date(at: &DateTime<Utc>) -> String {
    let month = MONTHS[at.month0() as usize];
    format!("{} {month} {}", at.day(), at.year())
}

/// `Rabu, 15 Januari 2025`
pub fn format_long_date(at: &DateTime<Utc>) -> String {
    format!("{}, {}", weekday_name(at.weekday()), format_date(at))
}

/// View counter with `.` thousands separators: `12.345`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Body text split on newlines, blank lines dropped.
pub fn paragraphs(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn dates_use_indonesian_names() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).single().expect("valid date");
        assert_eq!(format_date(&at), "15 Januari 2025");
        assert_eq!(format_long_date(&at), "Rabu, 15 Januari 2025");
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1.000");
        assert_eq!(format_count(1_234_567), "1.234.567");
    }

    #[test]
    fn paragraphs_skip_blank_lines() {
        assert_eq!(
            paragraphs("Satu\n\n  \nDua\r\nTiga"),
            vec!["Satu", "Dua", "Tiga"]
        );
    }
}
