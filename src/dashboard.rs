//! Filtered analytics summary behind the regional dashboard.
use crate::regional::{crop_distribution, top_n, wastage_reasons, TOP_CROPS};
use crate::types::{CategoryCount, SubmissionRecord};
use crate::util::average;
use chrono::NaiveDateTime;
use log::info;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Crop keys the dashboard knows how to label.
static KNOWN_CROPS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "wheat", "rice", "maize", "barley", "sorghum", "millet", "oats", "cotton", "sugarcane",
        "tobacco", "jute", "kenaf", "chickpea", "lentil", "mungbean", "blackgram", "peas",
        "cowpea", "pigeonpea", "rapeseedmustard", "mustard", "canola", "sunflower", "sesame",
        "groundnut", "soybean", "safflower", "castor", "berseem", "lucerne", "sorghumsudangrass",
        "guineagrass", "maizefodder", "potato", "onion", "tomato", "chili", "okra",
        "cauliflower", "cabbage", "brinjal", "garlic", "ginger", "spinach", "coriander",
        "cucumber", "carrot", "radish", "turnip", "pumpkin", "bittergourd", "bottlegourd",
        "tinda", "peasvegetable", "mango", "citrus", "banana", "dates", "guava", "apple",
        "apricot", "peach", "plum", "pear", "pomegranate", "grapes", "watermelon", "muskmelon",
        "strawberry", "turmeric", "cumin", "fennel", "fenugreek", "blackpepper", "cardamom",
        "nigella", "quinoa", "buckwheat", "flax", "teff",
    ]
    .into_iter()
    .collect()
});

/// Catalogue key for a crop name: lowercase with spaces and dashes dropped,
/// so `"Bitter Gourd"` becomes `"bittergourd"`.
pub fn crop_key(crop: &str) -> String {
    crop.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_known_crop(crop: &str) -> bool {
    KNOWN_CROPS.contains(crop_key(crop).as_str())
}

/// Province / district / crop selection. `None` or `"All"` leaves a
/// dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub province: Option<String>,
    pub district: Option<String>,
    pub crop: Option<String>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "All")
}

impl Filter {
    pub fn matches(&self, r: &SubmissionRecord) -> bool {
        if let Some(p) = constraint(&self.province) {
            if r.province != p {
                return false;
            }
        }
        if let Some(d) = constraint(&self.district) {
            if r.district.as_deref() != Some(d) {
                return false;
            }
        }
        if let Some(c) = constraint(&self.crop) {
            if r.crop != c {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [SubmissionRecord]) -> Vec<&'a SubmissionRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_submissions: usize,
    pub total_yield: f64,
    pub avg_wastage: f64,
    pub top_crops: Vec<String>,
    pub crop_distribution: Vec<CategoryCount>,
    pub wastage_reasons: Vec<CategoryCount>,
    pub latest_submission: Option<NaiveDateTime>,
}

/// Summarize the records selected by `filter`.
pub fn summarize(records: &[SubmissionRecord], filter: &Filter) -> DashboardSummary {
    let selected = filter.apply(records);
    info!(
        "Dashboard over {} of {} submissions ({:?})",
        selected.len(),
        records.len(),
        filter
    );
    if selected.is_empty() {
        return DashboardSummary::default();
    }

    let total_submissions = selected.len();
    let total_yield: f64 = selected.iter().map(|r| r.yield_tons).sum();
    let avg_wastage = average(&selected.iter().map(|r| r.wastage).collect::<Vec<_>>());
    let crops = crop_distribution(selected.iter().copied());
    let reasons = wastage_reasons(selected.iter().copied());
    DashboardSummary {
        total_submissions,
        total_yield,
        avg_wastage,
        top_crops: top_n(&crops, TOP_CROPS),
        crop_distribution: crops,
        wastage_reasons: reasons,
        latest_submission: selected.iter().filter_map(|r| r.submitted_at).max(),
    }
}

/// Values offered in the dashboard's filter drop-downs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub provinces: Vec<String>,
    pub districts: Vec<String>,
    pub crops: Vec<String>,
}

/// Sorted distinct provinces, districts (of `province` when one is given)
/// and catalogued crops present in `records`.
pub fn filter_options(records: &[SubmissionRecord], province: Option<&str>) -> FilterOptions {
    let province = province.map(str::trim).filter(|p| !p.is_empty() && *p != "All");
    let provinces: BTreeSet<&str> = records
        .iter()
        .map(|r| r.province.as_str())
        .filter(|p| !p.is_empty())
        .collect();
    let districts: BTreeSet<&str> = records
        .iter()
        .filter(|r| province.map_or(true, |p| r.province == p))
        .filter_map(|r| r.district.as_deref())
        .collect();
    let crops: BTreeSet<String> = records
        .iter()
        .filter(|r| is_known_crop(&r.crop))
        .map(|r| crop_key(&r.crop))
        .collect();
    FilterOptions {
        provinces: provinces.into_iter().map(str::to_string).collect(),
        districts: districts.into_iter().map(str::to_string).collect(),
        crops: crops.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_timestamp_safe;

    fn sample() -> Vec<SubmissionRecord> {
        let mut first = SubmissionRecord::new("A", 10.0, 50.0, 5.0)
            .with_profile("Asha", "Sindh")
            .with_district("Hyderabad")
            .with_crop("Wheat", "Weather");
        first.submitted_at = parse_timestamp_safe(Some("2024-03-01"));
        let mut second = SubmissionRecord::new("B", 5.0, 40.0, 15.0)
            .with_profile("Bilal", "Sindh")
            .with_district("Sukkur")
            .with_crop("Rice", "Transport");
        second.submitted_at = parse_timestamp_safe(Some("2024-04-10"));
        vec![
            first,
            second,
            SubmissionRecord::new("C", 2.0, 10.0, 10.0)
                .with_profile("Chand", "Punjab")
                .with_district("Lahore")
                .with_crop("Wheat", "Weather"),
            SubmissionRecord::new("D", 0.0, 5.0, 30.0)
                .with_profile("Dina", "Punjab")
                .with_crop("Dragonfruit", "Pest Attack"),
        ]
    }

    #[test]
    fn unfiltered_summary() {
        let s = summarize(&sample(), &Filter::default());
        assert_eq!(s.total_submissions, 4);
        assert_eq!(s.total_yield, 105.0);
        assert_eq!(s.avg_wastage, 15.0);
        assert_eq!(s.top_crops, vec!["Wheat", "Rice", "Dragonfruit"]);
        assert_eq!(s.crop_distribution[0].count, 2);
        assert_eq!(s.wastage_reasons[0].key, "Weather");
        assert_eq!(
            s.latest_submission,
            parse_timestamp_safe(Some("2024-04-10"))
        );
    }

    #[test]
    fn all_means_no_constraint() {
        let filter = Filter {
            province: Some("Sindh".to_string()),
            district: Some("All".to_string()),
            crop: Some("All".to_string()),
        };
        let s = summarize(&sample(), &filter);
        assert_eq!(s.total_submissions, 2);
        assert_eq!(s.total_yield, 90.0);
        assert_eq!(s.avg_wastage, 10.0);
    }

    #[test]
    fn district_and_crop_constraints() {
        let filter = Filter {
            province: Some("Sindh".to_string()),
            district: Some("Sukkur".to_string()),
            crop: None,
        };
        assert_eq!(summarize(&sample(), &filter).top_crops, vec!["Rice"]);

        let filter = Filter {
            crop: Some("Wheat".to_string()),
            ..Filter::default()
        };
        let s = summarize(&sample(), &filter);
        assert_eq!(s.total_submissions, 2);
        assert_eq!(s.latest_submission, parse_timestamp_safe(Some("2024-03-01")));
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let filter = Filter {
            province: Some("Balochistan".to_string()),
            ..Filter::default()
        };
        assert_eq!(summarize(&sample(), &filter), DashboardSummary::default());
        assert_eq!(summarize(&[], &Filter::default()).avg_wastage, 0.0);
    }

    #[test]
    fn options_are_sorted_and_deduplicated() {
        let opts = filter_options(&sample(), None);
        assert_eq!(opts.provinces, vec!["Punjab", "Sindh"]);
        assert_eq!(opts.districts, vec!["Hyderabad", "Lahore", "Sukkur"]);
        assert_eq!(opts.crops, vec!["rice", "wheat"]);

        let opts = filter_options(&sample(), Some("Sindh"));
        assert_eq!(opts.districts, vec!["Hyderabad", "Sukkur"]);
    }

    #[test]
    fn crop_keys_normalise_names() {
        assert_eq!(crop_key("Bitter Gourd"), "bittergourd");
        assert!(is_known_crop("Sugar-cane"));
        assert!(is_known_crop("MANGO"));
        assert!(!is_known_crop("Dragonfruit"));
        assert!(!is_known_crop(""));
    }
}
