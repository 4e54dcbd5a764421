//! Clock-domain conversion for realtime minute buckets.

use chrono::{NaiveTime, TimeZone, Utc};

use crate::types::MinuteBucket;

/// Converts UTC "HH:MM" minute labels into `tz`'s clock domain, pointwise.
///
/// The mapping preserves order and length: entry `i` of the result always
/// corresponds to entry `i` of the input, even when the local day boundary
/// makes the displayed sequence wrap (a window ending "23:40", "00:05" is
/// correct output, not a sorting bug). Labels that do not parse as "HH:MM"
/// pass through unchanged.
pub fn localize_minutes<Tz>(buckets: &[MinuteBucket], tz: &Tz) -> Vec<MinuteBucket>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    buckets
        .iter()
        .map(|bucket| MinuteBucket {
            minute: localize_minute(&bucket.minute, tz).unwrap_or_else(|| {
                tracing::debug!(minute = %bucket.minute, "unparseable minute label, passing through");
                bucket.minute.clone()
            }),
            hits: bucket.hits,
        })
        .collect()
}

/// Converts one UTC "HH:MM" label to `tz`'s 24-hour "HH:MM", resolving the
/// offset against today's UTC date.
fn localize_minute<Tz>(minute: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let time = NaiveTime::parse_from_str(minute, "%H:%M").ok()?;
    let moment = Utc::now().date_naive().and_time(time).and_utc();
    Some(moment.with_timezone(tz).format("%H:%M").to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
