/// Number of months in a Hijri year
pub const MAX_MONTH: u8 = 12;

/// Longest possible Hijri month
pub const MAX_DAY: u8 = 30;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for Ramadan
pub const RAMADAN: u8 = 9;
/// Month number for Shawwal (Eid al-Fitr falls on its first day)
pub const SHAWWAL: u8 = 10;

/// English transliterations of the Hijri months (index 0 is unused, months are 1-indexed)
pub const MONTH_NAMES: [&str; 13] = [
    "",                // index 0 unused (months are 1-indexed)
    "Muharram",        // 1
    "Safar",           // 2
    "Rabi' al-Awwal",  // 3
    "Rabi' al-Thani",  // 4
    "Jumada al-Awwal", // 5
    "Jumada al-Thani", // 6
    "Rajab",           // 7
    "Sha'ban",         // 8
    "Ramadan",         // 9
    "Shawwal",         // 10
    "Dhu al-Qi'dah",   // 11
    "Dhu al-Hijjah",   // 12
];

/// Number of consecutive days the forward scan examines.
/// A lunar year is 354 or 355 days, so one full cycle always fits.
pub const SCAN_HORIZON_DAYS: u64 = 450;

/// Label shown while counting down to 1 Ramadan
pub const RAMADAN_LABEL: &str = "Countdown to Ramadan";
/// Label shown during Ramadan while counting down to 1 Shawwal
pub const EID_AL_FITR_LABEL: &str = "Countdown to Eid al-Fitr";

pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;
pub(crate) const SECONDS_PER_DAY: u64 = 86_400;
pub(crate) const SECONDS_PER_HOUR: u64 = 3_600;
pub(crate) const SECONDS_PER_MINUTE: u64 = 60;

/// Civil Islamic epoch: 1 Muharram 1 AH as a day count from 0001-01-01 (day 1)
pub(crate) const ISLAMIC_EPOCH: i64 = 227_015;
/// Days in a 30-year tabular cycle
pub(crate) const TABULAR_CYCLE_DAYS: i64 = 10_631;

/// Default city list endpoint
pub const DEFAULT_CITIES_URL: &str =
    "https://raw.githubusercontent.com/lakuapik/jadwalsholatorg/master/kota.json";
/// Default base for monthly prayer schedules
pub const DEFAULT_PRAYER_SCHEDULE_BASE: &str =
    "https://raw.githubusercontent.com/lakuapik/jadwalsholatorg/master/adzan";
/// Default paginated hadith endpoint
pub const DEFAULT_HADITH_BASE: &str = "https://hadith-api-go.vercel.app/api/v1/hadis";
/// City selected when none is given
pub const DEFAULT_CITY: &str = "semarang";

/// Pages in the hadith collection (4419 records, 10 per page)
pub const HADITH_PAGE_COUNT: u32 = 442;

/// Delay before the first retry
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;
/// Attempts made before a fetch is reported as failed
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Time-of-day separator in schedule entries ("HH:MM")
pub const TIME_SEPARATOR: char = ':';
/// Separator between words in a city slug
pub const SLUG_SEPARATOR: char = '-';
