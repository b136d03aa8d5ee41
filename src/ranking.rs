//! Farmer leaderboard: per-farmer aggregation, composite score and rank.
//!
//! The whole computation is a pure function of the input records. Records
//! are folded in input order and farmers keep the order in which they were
//! first seen, so the same input always yields the same leaderboard, ties
//! included.
use crate::types::{LeaderboardEntry, LeaderboardRow, SubmissionRecord};
use crate::util::format_number;
use log::{debug, info};
use std::collections::HashMap;

/// Running totals for one farmer over a single ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmerAggregate {
    pub farmer_id: String,
    pub farmer_name: String,
    pub province: String,
    pub total_yield: f64,
    pub total_area: f64,
    pub total_wastage: f64,
    pub count: usize,
}

impl FarmerAggregate {
    fn new(farmer_id: &str) -> Self {
        FarmerAggregate {
            farmer_id: farmer_id.to_string(),
            farmer_name: String::new(),
            province: String::new(),
            total_yield: 0.0,
            total_area: 0.0,
            total_wastage: 0.0,
            count: 0,
        }
    }

    fn add(&mut self, r: &SubmissionRecord) {
        self.total_yield += r.yield_tons;
        self.total_area += r.area;
        self.total_wastage += r.wastage;
        self.count += 1;
        // Profile fields are constant per farmer upstream; if they are not,
        // the last record wins.
        self.farmer_name = r.farmer_name.clone();
        self.province = r.province.clone();
    }

    pub fn avg_yield_per_acre(&self) -> f64 {
        self.total_yield / self.total_area
    }

    pub fn avg_wastage(&self) -> f64 {
        self.total_wastage / self.count as f64
    }

    /// Yield efficiency discounted by the share of the harvest lost.
    pub fn score(&self) -> f64 {
        self.avg_yield_per_acre() * (1.0 - self.avg_wastage() / 100.0)
    }
}

/// Whether a record may take part in ranking: it needs a farmer id, a
/// positive finite area for the per-acre ratio, a finite non-negative yield
/// and a wastage percentage within 0..=100.
pub fn is_rankable(r: &SubmissionRecord) -> bool {
    r.farmer_key().is_some()
        && r.area.is_finite()
        && r.area > 0.0
        && r.yield_tons.is_finite()
        && r.yield_tons >= 0.0
        && r.wastage.is_finite()
        && (0.0..=100.0).contains(&r.wastage)
}

/// Group rankable records by farmer, in first-seen order.
///
/// Every returned aggregate has `count >= 1` and `total_area > 0`.
pub fn aggregate_farmers<'a, I>(records: I) -> Vec<FarmerAggregate>
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut farmers: Vec<FarmerAggregate> = Vec::new();
    let mut skipped = 0usize;
    for r in records {
        let Some(id) = r.farmer_key().filter(|_| is_rankable(r)) else {
            skipped += 1;
            continue;
        };
        let slot = *index.entry(id.to_string()).or_insert_with(|| {
            farmers.push(FarmerAggregate::new(id));
            farmers.len() - 1
        });
        farmers[slot].add(r);
    }
    if skipped > 0 {
        debug!("{} records skipped for ranking (no farmer id or unusable numbers)", skipped);
    }
    farmers
}

/// Podium position for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
        }
    }
}

/// Farmers sorted by score, best first, with ranks `1..=N` assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SubmissionRecord>,
    {
        Self::from_aggregates(aggregate_farmers(records))
    }

    pub fn from_aggregates(farmers: Vec<FarmerAggregate>) -> Self {
        let mut entries: Vec<LeaderboardEntry> = farmers
            .into_iter()
            .map(|f| LeaderboardEntry {
                avg_yield_per_acre: f.avg_yield_per_acre(),
                avg_wastage: f.avg_wastage(),
                score: f.score(),
                farmer_id: f.farmer_id,
                farmer_name: f.farmer_name,
                province: f.province,
                rank: 0,
            })
            .collect();

        // `sort_by` is stable: equal scores keep first-seen order.
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (idx, e) in entries.iter_mut().enumerate() {
            e.rank = idx + 1;
        }
        info!("Ranked {} farmers", entries.len());
        Leaderboard { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` means unranked: the farmer has no valid records.
    pub fn rank_of(&self, farmer_id: &str) -> Option<usize> {
        self.entry_for(farmer_id).map(|e| e.rank)
    }

    pub fn entry_for(&self, farmer_id: &str) -> Option<&LeaderboardEntry> {
        let farmer_id = farmer_id.trim();
        self.entries.iter().find(|e| e.farmer_id == farmer_id)
    }

    pub fn rows(&self) -> Vec<LeaderboardRow> {
        self.entries
            .iter()
            .map(|e| LeaderboardRow {
                rank: e.rank,
                medal: Medal::for_rank(e.rank)
                    .map(|m| m.label().to_string())
                    .unwrap_or_default(),
                farmer_name: e.farmer_name.clone(),
                province: e.province.clone(),
                avg_yield_per_acre: format_number(e.avg_yield_per_acre, 2),
                avg_wastage: format_number(e.avg_wastage, 1),
                score: format_number(e.score, 2),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Leaderboard {
    type Item = &'a LeaderboardEntry;
    type IntoIter = std::slice::Iter<'a, LeaderboardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
