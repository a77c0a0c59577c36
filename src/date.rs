//! Calendar date and time of a packet run, always in UTC.
//!
//! The packet prints the generation date in three shapes: the long form used
//! in letters ("October 18, 2026"), the short US form of the footer
//! ("10/18/2026") and the PDF date string of the info dictionary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn from_number(month: u8) -> Option<Self> {
        let m = match month {
            1 => Month::January,
            2 => Month::February,
            3 => Month::March,
            4 => Month::April,
            5 => Month::May,
            6 => Month::June,
            7 => Month::July,
            8 => Month::August,
            9 => Month::September,
            10 => Month::October,
            11 => Month::November,
            12 => Month::December,
            _ => return None,
        };
        Some(m)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    fn to_time(self) -> time::Month {
        match self {
            Month::January => time::Month::January,
            Month::February => time::Month::February,
            Month::March => time::Month::March,
            Month::April => time::Month::April,
            Month::May => time::Month::May,
            Month::June => time::Month::June,
            Month::July => time::Month::July,
            Month::August => time::Month::August,
            Month::September => time::Month::September,
            Month::October => time::Month::October,
            Month::November => time::Month::November,
            Month::December => time::Month::December,
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl DateTime {
    /// Builds a validated date time
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self, String> {
        let dt = Self {
            date: Date { year, month, day },
            time: Time { hour, minute, second },
        };
        check_date_valid(&dt)?;
        Ok(dt)
    }

    /// Current wall clock time in UTC
    pub fn now() -> Self {
        Self::from_offset_date_time(time::OffsetDateTime::now_utc())
    }

    fn from_offset_date_time(dt: time::OffsetDateTime) -> Self {
        Self {
            date: Date {
                year: dt.year(),
                month: dt.month() as u8,
                day: dt.day(),
            },
            time: Time {
                hour: dt.hour(),
                minute: dt.minute(),
                second: dt.second(),
            },
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year
    }
    pub fn month(&self) -> Month {
        Month::from_number(self.date.month).unwrap_or(Month::January)
    }
    pub fn day(&self) -> u8 {
        self.date.day
    }

    /// `October 18, 2026`
    pub fn long_date(&self) -> String {
        format!("{} {}, {}", self.month().name(), self.date.day, self.date.year)
    }

    /// `10/18/2026`
    pub fn short_date(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.date.month, self.date.day, self.date.year)
    }

    // D:20170505150224+00'00'
    pub fn to_pdf_timestamp(&self) -> String {
        format!(
            "D:{:04}{:02}{:02}{:02}{:02}{:02}+00'00'",
            self.date.year,
            self.date.month,
            self.date.day,
            self.time.hour,
            self.time.minute,
            self.time.second,
        )
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.date.year,
            self.date.month,
            self.date.day,
            self.time.hour,
            self.time.minute,
            self.time.second
        )
    }
}

impl std::str::FromStr for DateTime {
    type Err = String;

    /// Parses `YYYY-MM-DDTHH:MM:SSZ`; the time part is optional
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches('Z');
        let (date_str, time_str) = match s.split_once(['T', ' ']) {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };

        let date_parts: Vec<&str> = date_str.split('-').collect();
        if date_parts.len() != 3 {
            return Err(format!("invalid date '{date_str}'"));
        }
        let year = date_parts[0].parse::<i32>().map_err(|_| "invalid year")?;
        let month = date_parts[1].parse::<u8>().map_err(|_| "invalid month")?;
        let day = date_parts[2].parse::<u8>().map_err(|_| "invalid day")?;

        let (hour, minute, second) = match time_str {
            None => (0, 0, 0),
            Some(t) => {
                let time_parts: Vec<&str> = t.split(':').collect();
                if time_parts.len() < 2 || time_parts.len() > 3 {
                    return Err(format!("invalid time '{t}'"));
                }
                let hour = time_parts[0].parse::<u8>().map_err(|_| "invalid hour")?;
                let minute = time_parts[1].parse::<u8>().map_err(|_| "invalid minute")?;
                let second = match time_parts.get(2) {
                    Some(sec) => sec.parse::<u8>().map_err(|_| "invalid second")?,
                    None => 0,
                };
                (hour, minute, second)
            }
        };

        DateTime::new(year, month, day, hour, minute, second)
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn check_date_valid(dt: &DateTime) -> Result<(), String> {
    let month = Month::from_number(dt.date.month).ok_or_else(|| format!("invalid month {}", dt.date.month))?;
    time::Date::from_calendar_date(dt.date.year, month.to_time(), dt.date.day).map_err(|e| e.to_string())?;
    time::Time::from_hms(dt.time.hour, dt.time.minute, dt.time.second).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DateTime {
        DateTime::new(2026, 10, 18, 9, 5, 7).unwrap()
    }

    #[test]
    fn formats() {
        let dt = sample();
        assert_eq!(dt.long_date(), "October 18, 2026");
        assert_eq!(dt.short_date(), "10/18/2026");
        assert_eq!(dt.to_pdf_timestamp(), "D:20261018090507+00'00'");
        assert_eq!(dt.to_string(), "2026-10-18T09:05:07Z");
    }

    #[test]
    fn parse_roundtrip() {
        let dt: DateTime = "2026-10-18T09:05:07Z".parse().unwrap();
        assert_eq!(dt, sample());
        let date_only: DateTime = "2024-02-29".parse().unwrap();
        assert_eq!(date_only.time, Time { hour: 0, minute: 0, second: 0 });
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!("2023-02-29".parse::<DateTime>().is_err());
        assert!(DateTime::new(2026, 13, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2026, 1, 1, 24, 0, 0).is_err());
    }
}
