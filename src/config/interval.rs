//! Human-friendly durations such as `5s`, `30m`, `6h` or `1d`.

use serde::{Deserialize, Deserializer};

/// Parse an interval string into seconds. A bare number is seconds.
pub fn parse_interval(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    let secs = if let Some(hours) = s.strip_suffix('h') {
        scaled(hours, 3600).ok_or_else(|| format!("Invalid hours: {}", hours))?
    } else if let Some(minutes) = s.strip_suffix('m') {
        scaled(minutes, 60).ok_or_else(|| format!("Invalid minutes: {}", minutes))?
    } else if let Some(days) = s.strip_suffix('d') {
        scaled(days, 86400).ok_or_else(|| format!("Invalid days: {}", days))?
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>()
            .map_err(|_| format!("Invalid seconds: {}", secs))?
    } else {
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '5s', '1m', '1h'", s))?
    };

    if secs == 0 {
        return Err("Interval must be greater than zero".to_string());
    }
    Ok(secs)
}

fn scaled(count: &str, unit_secs: u64) -> Option<u64> {
    count.parse::<u64>().ok()?.checked_mul(unit_secs)
}

pub fn format_interval(secs: u64) -> String {
    if secs >= 86400 && secs % 86400 == 0 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Accepts either a string (`"5s"`) or an integer number of seconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Secs(0) => Err(serde::de::Error::custom(
            "Interval must be greater than zero",
        )),
        Raw::Secs(secs) => Ok(secs),
        Raw::Text(text) => parse_interval(&text).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("5s").unwrap(), 5);
        assert_eq!(parse_interval("30m").unwrap(), 1800);
        assert_eq!(parse_interval("1h").unwrap(), 3600);
        assert_eq!(parse_interval("1d").unwrap(), 86400);
        assert_eq!(parse_interval(" 10 ").unwrap(), 10);
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("0s").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_overflow() {
        assert!(parse_interval("18446744073709551615h").is_err());
        assert!(parse_interval("307445734561825861m").is_err());
        assert!(parse_interval("213503982334602d").is_err());
        assert_eq!(parse_interval("18446744073709551615s").unwrap(), u64::MAX);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(5), "5s");
        assert_eq!(format_interval(90), "90s");
        assert_eq!(format_interval(1800), "30m");
        assert_eq!(format_interval(7200), "2h");
        assert_eq!(format_interval(86400), "1d");
    }
}
