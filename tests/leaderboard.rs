use harvest_rank::loader::read_csv;
use harvest_rank::output::write_csv;
use harvest_rank::{summarize, Filter, Leaderboard, SubmissionRecord, SubmissionSource};
use std::collections::HashMap;

/// Small deterministic generator so the property checks are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn random_records(seed: u64, len: usize) -> Vec<SubmissionRecord> {
    let mut rng = Lcg(seed);
    (0..len)
        .map(|_| {
            let farmer = format!("F{}", rng.below(25));
            // Roughly one record in eight has no usable area.
            let area = if rng.below(8) == 0 {
                0.0
            } else {
                (1 + rng.below(40)) as f64 / 2.0
            };
            let yield_tons = rng.below(200) as f64 / 4.0;
            let wastage = rng.below(101) as f64;
            SubmissionRecord::new(&farmer, area, yield_tons, wastage)
        })
        .collect()
}

#[test]
fn ranks_are_complete_and_monotonic() {
    for seed in 1..20 {
        let records = random_records(seed, 300);
        let board = Leaderboard::compute(&records);

        let mut usable: Vec<&str> = records
            .iter()
            .filter(|r| r.area > 0.0)
            .map(|r| r.farmer_id.as_deref().unwrap())
            .collect();
        usable.sort_unstable();
        usable.dedup();
        assert_eq!(board.len(), usable.len());

        let ranks: Vec<usize> = board.entries().iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=board.len()).collect::<Vec<_>>());

        for pair in board.entries().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn same_input_same_leaderboard() {
    let records = random_records(7, 500);
    assert_eq!(Leaderboard::compute(&records), Leaderboard::compute(&records));
}

#[test]
fn farmers_with_only_zero_area_are_absent() {
    let records = random_records(11, 400);
    let mut has_area: HashMap<&str, bool> = HashMap::new();
    for r in &records {
        let flag = has_area.entry(r.farmer_id.as_deref().unwrap()).or_insert(false);
        *flag |= r.area > 0.0;
    }
    let board = Leaderboard::compute(&records);
    for (farmer, usable) in has_area {
        assert_eq!(board.rank_of(farmer).is_some(), usable, "farmer {}", farmer);
    }
}

#[test]
fn malformed_in_memory_records_are_skipped_not_fatal() {
    let records: Vec<SubmissionRecord> = (0..60)
        .map(|i| {
            let id = format!("F{:02}", i);
            match i % 5 {
                0 => SubmissionRecord::new(&id, 1.0, f64::NAN, 10.0),
                1 => SubmissionRecord::new(&id, 1.0, 4.0, f64::NAN),
                2 => SubmissionRecord::new(&id, 1.0, -(i as f64), 0.0),
                3 => SubmissionRecord::new(&id, 1.0, i as f64, 250.0),
                _ => SubmissionRecord::new(&id, 1.0, (i % 7) as f64, 20.0),
            }
        })
        .collect();
    let board = Leaderboard::compute(&records);

    assert_eq!(board.len(), 12);
    for (i, r) in records.iter().enumerate() {
        let id = r.farmer_id.as_deref().unwrap();
        assert_eq!(board.rank_of(id).is_some(), i % 5 == 4, "farmer {}", id);
    }
    let ranks: Vec<usize> = board.entries().iter().map(|e| e.rank).collect();
    assert_eq!(ranks, (1..=12).collect::<Vec<_>>());
    for pair in board.entries().windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn ties_follow_first_appearance_in_input() {
    let records = vec![
        SubmissionRecord::new("late", 1.0, 3.0, 0.0),
        SubmissionRecord::new("early", 2.0, 6.0, 0.0),
        SubmissionRecord::new("late", 1.0, 3.0, 0.0),
        SubmissionRecord::new("best", 1.0, 9.0, 0.0),
    ];
    let board = Leaderboard::compute(&records);
    let ids: Vec<&str> = board.entries().iter().map(|e| e.farmer_id.as_str()).collect();
    assert_eq!(ids, vec!["best", "late", "early"]);
}

const EXPORT: &str = "\
farmer_id,name,province,district,crop,area,yield,wastage,reason,created_at
A,Asha,Sindh,Hyderabad,wheat,10,50,5,Weather,2024-01-05T10:00:00Z
A,Asha,Sindh,Hyderabad,rice,10,30,15,Transport,2024-02-05T10:00:00Z
B,Bilal,Punjab,Lahore,wheat,5,40,0,Weather,2024-03-05T10:00:00Z
C,Chand,Punjab,Lahore,maize,0,12,3,Pest Attack,2024-03-06T10:00:00Z
D,Dina,Punjab,Lahore,rice,abc,12,3,Weather,2024-03-07T10:00:00Z
";

#[test]
fn export_to_leaderboard_and_dashboard() {
    let (records, report) = read_csv(EXPORT.as_bytes()).unwrap();
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.loaded_rows, 4);

    let board = records.load().map(|(rows, _)| Leaderboard::compute(&rows)).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board.rank_of("B"), Some(1));
    assert_eq!(board.rank_of("A"), Some(2));
    assert_eq!(board.rank_of("C"), None);
    assert_eq!(board.entries()[0].score, 8.0);
    assert_eq!(board.entries()[1].score, 3.6);

    // The zero-area submission still counts on the dashboard.
    let summary = summarize(&records, &Filter::default());
    assert_eq!(summary.total_submissions, 4);
    assert_eq!(summary.top_crops, vec!["wheat", "rice", "maize"]);

    let punjab = Filter {
        province: Some("Punjab".to_string()),
        ..Filter::default()
    };
    let summary = summarize(&records, &punjab);
    assert_eq!(summary.total_submissions, 2);
    assert_eq!(summary.total_yield, 52.0);
}

#[test]
fn leaderboard_csv_export() {
    let (records, _) = read_csv(EXPORT.as_bytes()).unwrap();
    let board = Leaderboard::compute(&records);
    let dir = std::env::temp_dir().join(format!("harvest_rank_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("leaderboard.csv");
    write_csv(&path, &board.rows()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("Rank,Medal,Farmer,Province,AvgYieldPerAcre,AvgWastagePct,Score")
    );
    assert_eq!(lines.next(), Some("1,Gold,Bilal,Punjab,8.00,0.0,8.00"));
    assert_eq!(lines.next(), Some("2,Silver,Asha,Sindh,4.00,10.0,3.60"));
    assert_eq!(lines.next(), None);
    std::fs::remove_dir_all(&dir).unwrap();
}
