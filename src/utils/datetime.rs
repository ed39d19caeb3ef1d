//! Text formats for event dates (`yyyy-MM-dd`) and times (`HH:mm`).

use chrono::{NaiveDate, NaiveTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const TIME_WITH_SECONDS_FORMAT: &str = "%H:%M:%S";

/// Parses a zero-padded `yyyy-MM-dd` date. chrono alone would also take
/// `2024-5-1`, so the input must format back to itself.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == raw)
}

/// Parses a zero-padded `HH:mm`, falling back to `HH:mm:ss`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    [TIME_FORMAT, TIME_WITH_SECONDS_FORMAT]
        .into_iter()
        .find_map(|format| {
            NaiveTime::parse_from_str(raw, format)
                .ok()
                .filter(|time| time.format(format).to_string() == raw)
        })
}

pub fn format_time(time: &NaiveTime) -> String {
    if time.second() == 0 && time.nanosecond() == 0 {
        time.format(TIME_FORMAT).to_string()
    } else {
        time.format(TIME_WITH_SECONDS_FORMAT).to_string()
    }
}

/// Serde adapter so event times go over the wire as `HH:mm`.
pub mod time_format {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_time(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time '{raw}', expected HH:mm")))
    }
}
