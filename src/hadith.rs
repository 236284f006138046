use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::HADITH_PAGE_COUNT;

/// Hadith number as published; some collections use non-numeric labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HadithNumber {
    Number(u64),
    Text(String),
}

impl fmt::Display for HadithNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One hadith: the Arabic text and its Indonesian translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HadithRecord {
    pub number: HadithNumber,
    #[serde(default)]
    pub arab: String,
    /// Indonesian translation
    #[serde(default)]
    pub id: String,
}

/// One page of the paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HadithPage {
    #[serde(default)]
    pub data: Vec<HadithRecord>,
}

/// A record together with the page it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedHadith {
    pub page: u32,
    pub record: HadithRecord,
}

impl SelectedHadith {
    pub fn source(&self) -> String {
        format!("Kumpulan Hadits - Halaman {}, No. {}", self.page, self.record.number)
    }
}

impl fmt::Display for SelectedHadith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arab = if self.record.arab.is_empty() {
            "Teks Arab tidak tersedia"
        } else {
            &self.record.arab
        };
        let translation = if self.record.id.is_empty() {
            "Terjemahan tidak tersedia"
        } else {
            &self.record.id
        };
        write!(f, "{}\n\n{arab}\n\n\"{translation}\"", self.source())
    }
}

/// A page number in `1..=HADITH_PAGE_COUNT`
pub fn random_page<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(1..=HADITH_PAGE_COUNT)
}

/// A uniformly chosen record from `page`, or `None` if it is empty
pub fn pick_random<'a, R: Rng + ?Sized>(
    rng: &mut R,
    page: &'a HadithPage,
) -> Option<&'a HadithRecord> {
    if page.data.is_empty() {
        return None;
    }
    page.data.get(rng.random_range(0..page.data.len()))
}

/// URL of one page of the collection
pub fn page_url(base: &str, page: u32) -> String {
    format!("{base}?page={page}")
}
