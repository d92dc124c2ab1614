use chrono::{DateTime, Local, NaiveDate, TimeZone};

// Filename-safe local timestamp, e.g. 20240122_153012.
pub fn timestamp_stem<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M%S").to_string()
}

pub fn now_stem() -> String {
    timestamp_stem(&Local::now())
}

// "12 June 2017"
pub fn long_date(d: NaiveDate) -> String {
    d.format("%d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn stem_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 22, 15, 30, 12).unwrap();
        assert_eq!(timestamp_stem(&at), "20240122_153012");
    }

    #[test]
    fn long_date_pads_day() {
        assert_eq!(long_date(NaiveDate::from_ymd_opt(2023, 8, 2).unwrap()), "02 August 2023");
    }
}
