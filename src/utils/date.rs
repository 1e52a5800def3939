use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

/// Parse ett datum från en sträng (flexibelt format)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Försök olika format
    let formats = [
        "%Y-%m-%d",    // 2024-01-15
        "%Y/%m/%d",    // 2024/01/15
        "%d-%m-%Y",    // 15-01-2024
        "%d/%m/%Y",    // 15/01/2024
        "%Y%m%d",      // 20240115
    ];

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    None
}

/// Parse en tidpunkt (datum + klockslag) från en sträng
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",   // 2024-01-15 18:00:00
        "%Y-%m-%dT%H:%M:%S",   // 2024-01-15T18:00:00
        "%Y-%m-%d %H:%M",      // 2024-01-15 18:00
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    // Endast datum tolkas som midnatt
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formatera ett datum för visning
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formatera en tidpunkt för lagring och visning
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Dagens datum
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Beräkna ålder i hela fyllda år vid ett referensdatum.
/// Jämförelsen görs på (månad, dag) så att skottår inte
/// förskjuter födelsedagen.
pub fn calculate_age(birth: NaiveDate, reference: NaiveDate) -> i32 {
    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
