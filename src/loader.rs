use crate::error::{
    OpeningCsvSnafu, ParsingJsonSnafu, ReadingFileSnafu, Result, UnknownFormatSnafu,
};
use crate::types::{RawRow, SubmissionRecord};
use crate::util::{non_blank, parse_f64_safe, parse_timestamp_safe};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use serde_json::{Map, Value};
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Why a row never became a [`SubmissionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowRejection {
    /// The reader could not decode the row at all.
    Unreadable,
    MissingArea,
    MissingYield,
    MissingWastage,
    NegativeYield,
    WastageOutOfRange,
}

impl RowRejection {
    pub fn label(&self) -> &'static str {
        match self {
            RowRejection::Unreadable => "unreadable row",
            RowRejection::MissingArea => "missing or non-numeric area",
            RowRejection::MissingYield => "missing or non-numeric yield",
            RowRejection::MissingWastage => "missing or non-numeric wastage",
            RowRejection::NegativeYield => "negative yield",
            RowRejection::WastageOutOfRange => "wastage outside 0-100%",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub rejected: BTreeMap<RowRejection, usize>,
}

impl LoadReport {
    pub fn rejected_rows(&self) -> usize {
        self.rejected.values().sum()
    }

    fn reject(&mut self, reason: RowRejection) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }
}

/// Hands over the already-resolved collection of submissions.
///
/// The analytics code never fetches anything itself: whoever owns the data
/// (a file export, a test fixture, a backend client) implements this and is
/// passed in explicitly.
pub trait SubmissionSource {
    fn load(&self) -> Result<(Vec<SubmissionRecord>, LoadReport)>;
}

impl SubmissionSource for Vec<SubmissionRecord> {
    fn load(&self) -> Result<(Vec<SubmissionRecord>, LoadReport)> {
        let report = LoadReport {
            total_rows: self.len(),
            loaded_rows: self.len(),
            rejected: BTreeMap::new(),
        };
        Ok((self.clone(), report))
    }
}

/// A CSV export of the `farmer_data` table with profile columns joined in.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSource { path: path.into() }
    }
}

impl SubmissionSource for CsvSource {
    fn load(&self) -> Result<(Vec<SubmissionRecord>, LoadReport)> {
        let path = self.path.display().to_string();
        info!("Reading submissions from {:?}", path);
        let file =
            std::fs::File::open(&self.path).context(ReadingFileSnafu { path: &path })?;
        read_csv(file).context(OpeningCsvSnafu { path })
    }
}

/// A JSON array of rows, either flat or with the profile nested under
/// `profiles` the way the backend join returns it.
#[derive(Debug, Clone)]
pub struct JsonSource {
    pub path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSource { path: path.into() }
    }
}

impl SubmissionSource for JsonSource {
    fn load(&self) -> Result<(Vec<SubmissionRecord>, LoadReport)> {
        let path = self.path.display().to_string();
        info!("Reading submissions from {:?}", path);
        let contents =
            std::fs::read_to_string(&self.path).context(ReadingFileSnafu { path: &path })?;
        let rows: Vec<Value> =
            serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
        Ok(clean_json_rows(&rows))
    }
}

/// Pick the source for `path` from an explicit format name, or from the file
/// extension when none is given.
pub fn source_for(path: &Path, format: Option<&str>) -> Result<Box<dyn SubmissionSource>> {
    let format = match format {
        Some(f) => f.to_ascii_lowercase(),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase(),
    };
    match format.as_str() {
        "csv" => Ok(Box::new(CsvSource::new(path))),
        "json" => Ok(Box::new(JsonSource::new(path))),
        _ => UnknownFormatSnafu { format }.fail(),
    }
}

pub fn read_csv<R: Read>(
    reader: R,
) -> std::result::Result<(Vec<SubmissionRecord>, LoadReport), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    // Fail on an unreadable header; individual rows are only counted.
    rdr.headers()?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("row {}: {}", report.total_rows, e);
                report.reject(RowRejection::Unreadable);
                continue;
            }
        };
        let line = report.total_rows;
        push_clean(row, line, &mut records, &mut report);
    }
    report.loaded_rows = records.len();
    info!(
        "Loaded {} of {} rows ({} rejected)",
        report.loaded_rows,
        report.total_rows,
        report.rejected_rows()
    );
    Ok((records, report))
}

pub fn clean_json_rows(rows: &[Value]) -> (Vec<SubmissionRecord>, LoadReport) {
    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for value in rows {
        report.total_rows += 1;
        let Some(obj) = value.as_object() else {
            debug!("row {}: not an object", report.total_rows);
            report.reject(RowRejection::Unreadable);
            continue;
        };
        let line = report.total_rows;
        push_clean(raw_row_from_json(obj), line, &mut records, &mut report);
    }
    report.loaded_rows = records.len();
    info!(
        "Loaded {} of {} rows ({} rejected)",
        report.loaded_rows,
        report.total_rows,
        report.rejected_rows()
    );
    (records, report)
}

fn push_clean(
    row: RawRow,
    line: usize,
    records: &mut Vec<SubmissionRecord>,
    report: &mut LoadReport,
) {
    match clean_row(row) {
        Ok(record) => records.push(record),
        Err(reason) => {
            debug!("row {}: skipped ({})", line, reason.label());
            report.reject(reason);
        }
    }
}

/// Validate one raw row the way the submission form does.
///
/// Area is only required to be a number here. Whether it is usable for a
/// per-acre ratio is the ranking engine's call.
pub fn clean_row(row: RawRow) -> std::result::Result<SubmissionRecord, RowRejection> {
    let area = parse_f64_safe(row.area.as_deref()).ok_or(RowRejection::MissingArea)?;
    let yield_tons =
        parse_f64_safe(row.yield_tons.as_deref()).ok_or(RowRejection::MissingYield)?;
    let wastage =
        parse_f64_safe(row.wastage.as_deref()).ok_or(RowRejection::MissingWastage)?;
    if yield_tons < 0.0 {
        return Err(RowRejection::NegativeYield);
    }
    if !(0.0..=100.0).contains(&wastage) {
        return Err(RowRejection::WastageOutOfRange);
    }

    Ok(SubmissionRecord {
        farmer_id: non_blank(row.farmer_id.as_deref()),
        farmer_name: non_blank(row.farmer_name.as_deref())
            .unwrap_or_else(|| "Unknown Farmer".to_string()),
        province: non_blank(row.province.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
        district: non_blank(row.district.as_deref()),
        crop: non_blank(row.crop.as_deref()).unwrap_or_default(),
        reason: non_blank(row.reason.as_deref()).unwrap_or_default(),
        area,
        yield_tons,
        wastage,
        submitted_at: parse_timestamp_safe(row.created_at.as_deref()),
    })
}

fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn raw_row_from_json(obj: &Map<String, Value>) -> RawRow {
    let profile = obj.get("profiles").and_then(Value::as_object);
    let from_profile = |key: &str| profile.and_then(|p| json_text(p.get(key)));

    RawRow {
        farmer_id: json_text(obj.get("farmer_id")),
        farmer_name: from_profile("name")
            .or_else(|| json_text(obj.get("name")))
            .or_else(|| json_text(obj.get("farmer_name"))),
        province: from_profile("province").or_else(|| json_text(obj.get("province"))),
        district: json_text(obj.get("district")).or_else(|| from_profile("district")),
        crop: json_text(obj.get("crop")),
        area: json_text(obj.get("area")),
        yield_tons: json_text(obj.get("yield")),
        wastage: json_text(obj.get("wastage")),
        reason: json_text(obj.get("reason")),
        created_at: json_text(obj.get("created_at")),
    }
}
