//! Categorical counts for the crop-distribution and wastage-reason charts.
use crate::types::{CategoryCount, SubmissionRecord};
use std::cmp::Reverse;
use std::collections::HashMap;

/// How many crops the dashboard highlights.
pub const TOP_CROPS: usize = 3;

/// Count records per key, keys in first-seen order.
///
/// Records whose key is blank are skipped.
pub fn count_by<'a, I, F>(records: I, key: F) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
    F: Fn(&'a SubmissionRecord) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for r in records {
        let k = key(r).trim();
        if k.is_empty() {
            continue;
        }
        let slot = *index.entry(k).or_insert_with(|| {
            counts.push(CategoryCount {
                key: k.to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }
    counts
}

/// The `n` keys with the highest counts; equal counts keep their order in
/// `counts`.
pub fn top_n(counts: &[CategoryCount], n: usize) -> Vec<String> {
    let mut sorted: Vec<&CategoryCount> = counts.iter().collect();
    sorted.sort_by_key(|c| Reverse(c.count));
    sorted.into_iter().take(n).map(|c| c.key.clone()).collect()
}

pub fn crop_distribution<'a, I>(records: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    count_by(records, |r| r.crop.as_str())
}

pub fn wastage_reasons<'a, I>(records: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    count_by(records, |r| r.reason.as_str())
}

pub fn top_crops<'a, I>(records: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    top_n(&crop_distribution(records), n)
}
