use crate::ParseError;
use crate::consts::{MAX_DAY, MAX_MONTH, MIN_DAY, MONTH_NAMES, RAMADAN, SHAWWAL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A Hijri month guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HijriMonth(NonZeroU8);

impl HijriMonth {
    /// The month of fasting
    pub const RAMADAN: Self = Self::from_const(RAMADAN);
    /// The month opened by Eid al-Fitr
    pub const SHAWWAL: Self = Self::from_const(SHAWWAL);

    const fn from_const(value: u8) -> Self {
        match NonZeroU8::new(value) {
            Some(non_zero) if value <= MAX_MONTH => Self(non_zero),
            _ => panic!("Hijri month constant out of range"),
        }
    }

    /// Creates a new month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// English transliteration, e.g. "Ramadan"
    pub const fn name(self) -> &'static str {
        MONTH_NAMES[self.0.get() as usize]
    }
}

impl TryFrom<u8> for HijriMonth {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HijriMonth> for u8 {
    fn from(month: HijriMonth) -> Self {
        month.0.get()
    }
}

impl fmt::Display for HijriMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Hijri day of month in the range `MIN_DAY..=MAX_DAY` (1..=30)
///
/// Hijri months alternate between 29 and 30 days depending on the calendar
/// in use, so only the absolute bound is checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HijriDay(NonZeroU8);

impl HijriDay {
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or > `MAX_DAY`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay(value))?;
        if value > MAX_DAY {
            return Err(ParseError::InvalidDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// The first day of any month
    pub const fn first() -> Self {
        match NonZeroU8::new(MIN_DAY) {
            Some(day) => Self(day),
            None => unreachable!(),
        }
    }
}

impl TryFrom<u8> for HijriDay {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HijriDay> for u8 {
    fn from(day: HijriDay) -> Self {
        day.0.get()
    }
}

impl fmt::Display for HijriDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric Hijri date as produced by a calendar conversion.
///
/// Unlike [`HijriMonth`] and [`HijriDay`] the fields are raw: a conversion
/// that cannot produce a field reports `0` for it. Because valid months and
/// days start at 1, a zeroed field never matches a real target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HijriDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl HijriDate {
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// The all-zero date reported when a conversion fails outright
    pub const fn unknown() -> Self {
        Self::new(0, 0, 0)
    }

    /// True if this date falls on the given month and day
    pub const fn matches(&self, month: HijriMonth, day: HijriDay) -> bool {
        self.month == month.get() && self.day == day.get()
    }

    pub const fn is_ramadan(&self) -> bool {
        self.month == RAMADAN
    }

    /// True if every field is in its valid range
    pub const fn is_valid(&self) -> bool {
        self.year != 0
            && self.month >= 1
            && self.month <= MAX_MONTH
            && self.day >= MIN_DAY
            && self.day <= MAX_DAY
    }

    /// Returns the month as a validated type if it is in range
    pub fn month_typed(&self) -> Option<HijriMonth> {
        HijriMonth::new(self.month).ok()
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month_typed() {
            Some(month) if self.is_valid() => {
                write!(f, "{} {} {}", self.day, month.name(), self.year)
            }
            _ => write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day),
        }
    }
}
