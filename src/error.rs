use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Error opening submissions file {path}"))]
    OpeningCsv { source: csv::Error, path: String },

    #[snafu(display("Error reading submissions file {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Submissions file {path} is not a JSON array of rows"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },

    #[snafu(display("Unknown input format {format:?} (expected csv or json)"))]
    UnknownFormat { format: String },

    #[snafu(display("Error writing {path}"))]
    WritingCsv { source: csv::Error, path: String },

    #[snafu(display("Error encoding {path}"))]
    EncodingJson {
        source: serde_json::Error,
        path: String,
    },

    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
