use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row exactly as exported from the `farmer_data` table joined with the
/// submitting farmer's profile. Everything is optional text until validated.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawRow {
    pub farmer_id: Option<String>,
    #[serde(rename = "name", alias = "farmer_name")]
    pub farmer_name: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub crop: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "yield")]
    pub yield_tons: Option<String>,
    pub wastage: Option<String>,
    pub reason: Option<String>,
    pub created_at: Option<String>,
}

/// A typed crop submission.
///
/// `farmer_id` stays optional and `area` may be non-positive: the dashboard
/// still counts such rows, the ranking engine skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub farmer_id: Option<String>,
    pub farmer_name: String,
    pub province: String,
    pub district: Option<String>,
    pub crop: String,
    pub reason: String,
    /// Acres.
    pub area: f64,
    /// Tons harvested.
    pub yield_tons: f64,
    /// Percent lost, 0..=100.
    pub wastage: f64,
    pub submitted_at: Option<NaiveDateTime>,
}

impl SubmissionRecord {
    pub fn new(farmer_id: &str, area: f64, yield_tons: f64, wastage: f64) -> Self {
        SubmissionRecord {
            farmer_id: Some(farmer_id.to_string()),
            farmer_name: String::new(),
            province: String::new(),
            district: None,
            crop: String::new(),
            reason: String::new(),
            area,
            yield_tons,
            wastage,
            submitted_at: None,
        }
    }

    pub fn with_profile(mut self, name: &str, province: &str) -> Self {
        self.farmer_name = name.to_string();
        self.province = province.to_string();
        self
    }

    pub fn with_district(mut self, district: &str) -> Self {
        self.district = Some(district.to_string());
        self
    }

    pub fn with_crop(mut self, crop: &str, reason: &str) -> Self {
        self.crop = crop.to_string();
        self.reason = reason.to_string();
        self
    }

    /// The trimmed farmer id, if there is a non-blank one.
    pub fn farmer_key(&self) -> Option<&str> {
        self.farmer_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// One farmer's line on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub farmer_id: String,
    pub farmer_name: String,
    pub province: String,
    pub avg_yield_per_acre: f64,
    pub avg_wastage: f64,
    pub score: f64,
    pub rank: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LeaderboardRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Medal")]
    #[tabled(rename = "Medal")]
    pub medal: String,
    #[serde(rename = "Farmer")]
    #[tabled(rename = "Farmer")]
    pub farmer_name: String,
    #[serde(rename = "Province")]
    #[tabled(rename = "Province")]
    pub province: String,
    #[serde(rename = "AvgYieldPerAcre")]
    #[tabled(rename = "AvgYieldPerAcre")]
    pub avg_yield_per_acre: String,
    #[serde(rename = "AvgWastagePct")]
    #[tabled(rename = "AvgWastagePct")]
    pub avg_wastage: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
}

/// Number of submissions sharing one categorical value.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub key: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}
