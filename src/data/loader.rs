use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{DatasetError, LaunchDataset, LaunchRecord};

/// The published launch dataset the dashboard opens by default.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv";

const SITE_COLUMN: &str = "Launch Site";
const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
const CLASS_COLUMN: &str = "class";
const BOOSTER_COLUMN: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Data source: local file or remote URL
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

/// File format, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Parquet,
}

impl DataSource {
    /// `http://` and `https://` strings are URLs, anything else is a path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::Path(PathBuf::from(s))
        }
    }

    fn format(&self) -> Result<Format> {
        let ext = match self {
            DataSource::Path(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_ascii_lowercase(),
            DataSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or("");
                let last = path.rsplit('/').next().unwrap_or("");
                match last.rsplit_once('.') {
                    Some((_, ext)) => ext.to_ascii_lowercase(),
                    // Remote endpoints without an extension serve CSV.
                    None => return Ok(Format::Csv),
                }
            }
        };

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the launch dataset from a file or URL.
pub fn load_source(source: &DataSource) -> Result<LaunchDataset> {
    let dataset = match source {
        DataSource::Path(path) => load_file(path)?,
        DataSource::Url(url) => load_url(url, source.format()?)?,
    };
    log::info!(
        "Loaded {} launches across {} sites from {source}",
        dataset.len(),
        dataset.sites().len()
    );
    Ok(dataset)
}

/// Load a launch dataset from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the published layout, one launch per row
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – same columns as the CSV
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    match DataSource::Path(path.to_path_buf()).format()? {
        Format::Csv => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)
        }
        Format::Json => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening JSON {}", path.display()))?;
            read_json(file)
        }
        Format::Parquet => load_parquet(path),
    }
}

fn load_url(url: &str, format: Format) -> Result<LaunchDataset> {
    log::debug!("Fetching dataset from {url}");
    let mut response = ureq::get(url)
        .call()
        .with_context(|| format!("fetching {url}"))?;
    let body = response
        .body_mut()
        .read_to_string()
        .context("reading response body")?;

    match format {
        Format::Csv => read_csv(body.as_bytes()),
        Format::Json => read_json(body.as_bytes()),
        Format::Parquet => bail!("Parquet datasets must be downloaded first: {url}"),
    }
}

// ---------------------------------------------------------------------------
// CSV / JSON loaders (serde)
// ---------------------------------------------------------------------------

/// One row as it appears in the source table. Extra columns such as
/// `Flight Number` and `Booster Version` are ignored.
#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Launch Site", alias = "site")]
    site: String,
    #[serde(rename = "Payload Mass (kg)", alias = "payload_mass_kg")]
    payload_mass_kg: f64,
    #[serde(rename = "class")]
    class: f64,
    #[serde(rename = "Booster Version Category", alias = "booster_version_category")]
    booster_version_category: String,
}

impl RawLaunchRow {
    fn into_record(self, row: usize) -> Result<LaunchRecord, DatasetError> {
        LaunchRecord::new(
            row,
            self.site,
            self.payload_mass_kg,
            self.class,
            self.booster_version_category,
        )
    }
}

/// CSV layout: header row with column names, one launch per row.
fn read_csv<R: Read>(input: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let mut records = Vec::new();

    for (row_no, result) in reader.deserialize::<RawLaunchRow>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record(row_no)?);
    }

    Ok(LaunchDataset::from_records(records)?)
}

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn read_json<R: Read>(input: R) -> Result<LaunchDataset> {
    let rows: Vec<RawLaunchRow> =
        serde_json::from_reader(input).context("parsing JSON launch records")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record(i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LaunchDataset::from_records(records)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same four columns as the CSV. String columns
/// may be Utf8 or LargeUtf8; numeric columns any of Int32/Int64/Float32/Float64.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let site_col = column(&batch, SITE_COLUMN)?;
        let payload_col = column(&batch, PAYLOAD_COLUMN)?;
        let class_col = column(&batch, CLASS_COLUMN)?;
        let booster_col = column(&batch, BOOSTER_COLUMN)?;

        for i in 0..batch.num_rows() {
            let row = records.len();
            let record = LaunchRecord::new(
                row,
                string_at(site_col, i).with_context(|| format!("Row {row}: '{SITE_COLUMN}'"))?,
                number_at(payload_col, i)
                    .with_context(|| format!("Row {row}: '{PAYLOAD_COLUMN}'"))?,
                number_at(class_col, i).with_context(|| format!("Row {row}: '{CLASS_COLUMN}'"))?,
                string_at(booster_col, i)
                    .with_context(|| format!("Row {row}: '{BOOSTER_COLUMN}'"))?,
            )?;
            records.push(record);
        }
    }

    Ok(LaunchDataset::from_records(records)?)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DatasetError::MissingColumn(name.to_string()))?;
    Ok(batch.column(idx))
}

fn string_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        Ok(arr.value(row).to_string())
    } else if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        Ok(arr.value(row).to_string())
    } else {
        bail!("expected Utf8 column, got {:?}", col.data_type())
    }
}

fn number_at(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        other => bail!("expected numeric column, got {other:?}"),
    };
    value.context("column type does not match its declared data type")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::Outcome;

    const PUBLISHED_CSV: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,VAFB SLC-4E,1,9600.0,F9 FT B1036.1,FT
4,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn source_parsing_distinguishes_urls() {
        assert_eq!(
            DataSource::parse("https://example.org/launches.csv"),
            DataSource::Url("https://example.org/launches.csv".into())
        );
        assert_eq!(
            DataSource::parse("data/launches.csv"),
            DataSource::Path(PathBuf::from("data/launches.csv"))
        );
    }

    #[test]
    fn format_detection() {
        let fmt = |s: &str| DataSource::parse(s).format().ok();
        assert_eq!(fmt("a.CSV"), Some(Format::Csv));
        assert_eq!(fmt("a.json"), Some(Format::Json));
        assert_eq!(fmt("a.pq"), Some(Format::Parquet));
        assert_eq!(fmt("https://host/x/data.json?token=1"), Some(Format::Json));
        assert_eq!(fmt("https://host/api/launches"), Some(Format::Csv));
        assert_eq!(fmt("a.xlsx"), None);
        assert_eq!(fmt(DEFAULT_DATA_URL), Some(Format::Csv));
    }

    #[test]
    fn csv_in_published_layout() {
        let file = write_temp(".csv", PUBLISHED_CSV);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.payload_bounds(), (0.0, 9600.0));
        let third = &ds.records()[2];
        assert_eq!(third.outcome, Outcome::Success);
        assert_eq!(third.booster_version_category, "FT");
    }

    #[test]
    fn csv_with_bad_class_fails() {
        let file = write_temp(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,3,10,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::InvalidOutcome { row: 0, .. })
        ));
    }

    #[test]
    fn csv_missing_column_fails() {
        let file = write_temp(".csv", "Launch Site,class\nA,1\n");
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let file = write_temp(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(err.downcast_ref::<DatasetError>(), Some(&DatasetError::Empty));
    }

    #[test]
    fn json_records_with_snake_case_keys() {
        let file = write_temp(
            ".json",
            r#"[
                {"site": "A", "payload_mass_kg": 100, "class": 1, "booster_version_category": "FT"},
                {"Launch Site": "B", "Payload Mass (kg)": 2.5, "class": 0.0, "Booster Version Category": "B4"}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.sites(), ["A", "B"]);
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
        assert_eq!(ds.payload_bounds(), (2.5, 100.0));
    }

    #[test]
    fn parquet_round_trip() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(SITE_COLUMN, DataType::Utf8, false),
            Field::new(PAYLOAD_COLUMN, DataType::Float64, false),
            Field::new(CLASS_COLUMN, DataType::Int64, false),
            Field::new(BOOSTER_COLUMN, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![100.0, 150.0])),
                Arc::new(Int64Array::from(vec![1, 0])),
                Arc::new(StringArray::from(vec!["FT", "B5"])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].outcome, Outcome::Success);
        assert_eq!(ds.booster_categories(), ["B5", "FT"]);
    }

    #[test]
    fn parquet_missing_column_is_typed() {
        let schema = Arc::new(Schema::new(vec![Field::new(SITE_COLUMN, DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["A"]))],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatasetError>(),
            Some(&DatasetError::MissingColumn(PAYLOAD_COLUMN.to_string()))
        );
    }
}
