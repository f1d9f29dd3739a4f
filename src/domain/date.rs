use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pattern every month/year field must match, shared with the block schemas.
pub const DATE_PATTERN: &str = r"^(0[1-9]|1[0-2])/[0-9]{4}$";

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DATE_PATTERN).unwrap_or_else(|err| panic!("invalid date pattern: {err}"))
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{input}` is not a MM/YYYY date")]
pub struct MonthYearParseError {
    pub input: String,
}

/// Calendar month at month/year granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthYear {
    // Field order matters for the derived ordering.
    year: i32,
    month: u32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: &impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_valid_text(text: &str) -> bool {
        DATE_RE.is_match(text)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for MonthYear {
    type Err = MonthYearParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let error = || MonthYearParseError {
            input: input.to_string(),
        };
        if !DATE_RE.is_match(input) {
            return Err(error());
        }
        let (month, year) = input.split_once('/').ok_or_else(error)?;
        let month = month.parse::<u32>().map_err(|_| error())?;
        let year = year.parse::<i32>().map_err(|_| error())?;
        MonthYear::new(month, year).ok_or_else(error)
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of "now" for values captured when a user toggles an ongoing flag.
pub trait Clock: fmt::Debug + Send + Sync {
    fn current_month(&self) -> MonthYear;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_month(&self) -> MonthYear {
        MonthYear::from_date(&chrono::Local::now().date_naive())
    }
}

/// Clock pinned to a single month.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub MonthYear);

impl Clock for FixedClock {
    fn current_month(&self) -> MonthYear {
        self.0
    }
}
