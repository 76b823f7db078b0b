//! Calendar months used for harvest-time lookup
//!
//! The dataset spells months in German ("Januar" .. "Dezember"). Only these
//! twelve canonical spellings are recognised; anything else stored in a
//! record's `erntemonate` is kept verbatim but never matches a query.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    Januar,
    Februar,
    #[serde(rename = "März")]
    Maerz,
    April,
    Mai,
    Juni,
    Juli,
    August,
    September,
    Oktober,
    November,
    Dezember,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::Januar,
        Month::Februar,
        Month::Maerz,
        Month::April,
        Month::Mai,
        Month::Juni,
        Month::Juli,
        Month::August,
        Month::September,
        Month::Oktober,
        Month::November,
        Month::Dezember,
    ];

    /// Canonical dataset spelling
    pub fn name(self) -> &'static str {
        match self {
            Month::Januar => "Januar",
            Month::Februar => "Februar",
            Month::Maerz => "März",
            Month::April => "April",
            Month::Mai => "Mai",
            Month::Juni => "Juni",
            Month::Juli => "Juli",
            Month::August => "August",
            Month::September => "September",
            Month::Oktober => "Oktober",
            Month::November => "November",
            Month::Dezember => "Dezember",
        }
    }

    /// Exact, case-sensitive match against the canonical spelling.
    pub fn from_name(name: &str) -> Option<Month> {
        Month::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// 1 = Januar .. 12 = Dezember
    pub fn from_number(number: u32) -> Option<Month> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        Month::ALL.get(idx).copied()
    }

    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// Zero-based position, used to address per-month index slots.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Month of the local calendar date. Default for harvest queries.
    pub fn current() -> Month {
        use chrono::Datelike;
        Month::from_number(chrono::Local::now().month()).unwrap_or(Month::Januar)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMonth(pub String);

impl fmt::Display for UnknownMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown month '{}'", self.0)
    }
}

impl std::error::Error for UnknownMonth {}

impl FromStr for Month {
    type Err = UnknownMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::from_name(s).ok_or_else(|| UnknownMonth(s.to_string()))
    }
}
