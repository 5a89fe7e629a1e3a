//! Result Store
//!
//! Persists the TOTAL2 index and its daily composition as Parquet files
//! written through Arrow record batches. Dates are stored as `Date32`
//! (days since 1970-01-01), so a save/load round-trip is exact.

use crate::constants::{TOTAL2_COMPOSITION_FILE, TOTAL2_INDEX_FILE};
use crate::error::{AppError, Result};
use crate::models::{CompositionRecord, IndexPoint, Total2Result};
use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// `NaiveDate::num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Reader/writer of the processed TOTAL2 files
#[derive(Debug, Clone)]
pub struct ResultStore {
    processed_dir: PathBuf,
}

impl ResultStore {
    pub fn new(processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            processed_dir: processed_dir.into(),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.processed_dir.join(TOTAL2_INDEX_FILE)
    }

    pub fn composition_path(&self) -> PathBuf {
        self.processed_dir.join(TOTAL2_COMPOSITION_FILE)
    }

    /// Both the index and the composition file are present
    pub fn has_results(&self) -> bool {
        self.index_path().exists() && self.composition_path().exists()
    }

    /// Write both files, returning their paths
    pub fn save(&self, result: &Total2Result) -> Result<(PathBuf, PathBuf)> {
        let index_path = self.save_index(&result.index)?;
        let composition_path = self.save_composition(&result.composition)?;
        Ok((index_path, composition_path))
    }

    pub fn save_index(&self, points: &[IndexPoint]) -> Result<PathBuf> {
        let schema = index_schema();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(
                points.iter().map(|p| date_to_days(p.date)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                points.iter().map(|p| p.total2_price).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                points.iter().map(|p| p.total_volume).collect::<Vec<_>>(),
            )),
            Arc::new(UInt32Array::from(
                points.iter().map(|p| p.coin_count).collect::<Vec<_>>(),
            )),
        ];
        let batch = RecordBatch::try_new(Arc::new(schema), columns)?;

        let path = self.index_path();
        write_batch(&path, &batch)?;
        info!(path = %path.display(), rows = points.len(), "Saved TOTAL2 index");
        Ok(path)
    }

    pub fn save_composition(&self, records: &[CompositionRecord]) -> Result<PathBuf> {
        let schema = composition_schema();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(
                records.iter().map(|r| date_to_days(r.date)).collect::<Vec<_>>(),
            )),
            Arc::new(UInt32Array::from(
                records.iter().map(|r| r.rank).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                records.iter().map(|r| r.coin_id.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.volume).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.weight).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.price).collect::<Vec<_>>(),
            )),
        ];
        let batch = RecordBatch::try_new(Arc::new(schema), columns)?;

        let path = self.composition_path();
        write_batch(&path, &batch)?;
        info!(path = %path.display(), rows = records.len(), "Saved TOTAL2 composition");
        Ok(path)
    }

    pub fn load_index(&self) -> Result<Vec<IndexPoint>> {
        let path = self.index_path();
        let mut points = Vec::new();

        for batch in read_batches(&path, "TOTAL2 index")? {
            let dates = column::<Date32Array>(&batch, "date")?;
            let prices = column::<Float64Array>(&batch, "total2_price")?;
            let volumes = column::<Float64Array>(&batch, "total_volume")?;
            let counts = column::<UInt32Array>(&batch, "coin_count")?;

            for i in 0..batch.num_rows() {
                points.push(IndexPoint {
                    date: days_to_date(dates.value(i))?,
                    total2_price: prices.value(i),
                    total_volume: volumes.value(i),
                    coin_count: counts.value(i),
                });
            }
        }

        Ok(points)
    }

    pub fn load_composition(&self) -> Result<Vec<CompositionRecord>> {
        let path = self.composition_path();
        let mut records = Vec::new();

        for batch in read_batches(&path, "TOTAL2 composition")? {
            let dates = column::<Date32Array>(&batch, "date")?;
            let ranks = column::<UInt32Array>(&batch, "rank")?;
            let coins = column::<StringArray>(&batch, "coin_id")?;
            let volumes = column::<Float64Array>(&batch, "volume")?;
            let weights = column::<Float64Array>(&batch, "weight")?;
            let prices = column::<Float64Array>(&batch, "price")?;

            for i in 0..batch.num_rows() {
                records.push(CompositionRecord {
                    date: days_to_date(dates.value(i))?,
                    rank: ranks.value(i),
                    coin_id: coins.value(i).to_string(),
                    volume: volumes.value(i),
                    weight: weights.value(i),
                    price: prices.value(i),
                });
            }
        }

        Ok(records)
    }
}

fn index_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("total2_price", DataType::Float64, false),
        Field::new("total_volume", DataType::Float64, false),
        Field::new("coin_count", DataType::UInt32, false),
    ])
}

fn composition_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("rank", DataType::UInt32, false),
        Field::new("coin_id", DataType::Utf8, false),
        Field::new("volume", DataType::Float64, false),
        Field::new("weight", DataType::Float64, false),
        Field::new("price", DataType::Float64, false),
    ])
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn read_batches(path: &Path, what: &str) -> Result<Vec<RecordBatch>> {
    if !path.exists() {
        return Err(AppError::MissingResult(format!(
            "{} not found at {}. Run `halvix total2` first.",
            what,
            path.display()
        )));
    }
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| AppError::Storage(format!("Missing column '{}'", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| AppError::Storage(format!("Unexpected type for column '{}'", name)))
}

fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn days_to_date(days: i32) -> Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
        .ok_or_else(|| AppError::Storage(format!("Date32 value out of range: {}", days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_date32_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
        assert_eq!(days_to_date(19_723).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_missing_index_is_missing_result() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path().join("processed"));

        assert!(!store.has_results());
        match store.load_index() {
            Err(AppError::MissingResult(msg)) => assert!(msg.contains("halvix total2")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            store.load_composition(),
            Err(AppError::MissingResult(_))
        ));
    }

    #[test]
    fn test_index_without_composition_is_incomplete() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());

        store.save_index(&[]).unwrap();
        assert!(!store.has_results());

        store.save_composition(&[]).unwrap();
        assert!(store.has_results());
    }

    #[test]
    fn test_empty_composition_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());

        store.save_composition(&[]).unwrap();
        assert!(store.load_composition().unwrap().is_empty());
    }
}
