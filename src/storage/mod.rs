//! Storage backend (Arrow/Parquet)
//!
//! Edge and vertex collections are loaded once, in bulk, before a run and
//! then handed to [`MemoryGraphStore`](crate::store::MemoryGraphStore). The
//! harness never writes to a collection after loading.
//!
//! Columns are addressed by name so the same loader serves any schema that
//! has an edge "from" column and an edge "to" column (for example the LDBC
//! `person_knows_person` table with `person1_id` / `person2_id`).

use crate::{Error, Result};
use arrow::array::{Array, Int64Array, StringArray};
use arrow::compute;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use std::path::Path;

/// A named table held as Arrow record batches
pub struct Collection {
    batches: Vec<RecordBatch>,
}

impl Collection {
    /// Create a collection from existing batches
    ///
    /// Useful for testing and benchmarking
    #[must_use]
    pub fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Load a collection from a Parquet file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref())
            .map_err(|e| Error::StorageError(format!("Failed to open Parquet file: {e}")))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::StorageError(format!("Failed to parse Parquet file: {e}")))?;

        let reader = builder
            .build()
            .map_err(|e| Error::StorageError(format!("Failed to create Parquet reader: {e}")))?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch
                .map_err(|e| Error::StorageError(format!("Failed to read record batch: {e}")))?;
            batches.push(batch);
        }

        tracing::debug!(
            path = %path.as_ref().display(),
            batches = batches.len(),
            "loaded parquet collection"
        );

        Ok(Self { batches })
    }

    /// Total number of rows across all batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Read an integer column as `i64`, across all batches in order.
    ///
    /// Any integer width is accepted and widened. Nulls are rejected because
    /// a vertex id must always be present.
    ///
    /// # Errors
    /// Returns error if the column is missing, not castable to Int64, or
    /// contains nulls
    pub fn id_column(&self, name: &str) -> Result<Vec<i64>> {
        let mut out = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let index = batch
                .schema()
                .index_of(name)
                .map_err(|_| Error::StorageError(format!("Column not found: {name}")))?;
            let column = compute::cast(batch.column(index), &DataType::Int64)?;
            let array = column
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| Error::Other("Failed to downcast to Int64Array".to_string()))?;
            if array.null_count() > 0 {
                return Err(Error::StorageError(format!(
                    "Column {name} contains {} null ids",
                    array.null_count()
                )));
            }
            out.extend(array.values().iter().copied());
        }
        Ok(out)
    }

    /// Read a column as optional strings, across all batches in order.
    ///
    /// # Errors
    /// Returns error if the column is missing or cannot be cast to Utf8
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let mut out = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let index = batch
                .schema()
                .index_of(name)
                .map_err(|_| Error::StorageError(format!("Column not found: {name}")))?;
            let column = compute::cast(batch.column(index), &DataType::Utf8)?;
            let array = column
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::Other("Failed to downcast to StringArray".to_string()))?;
            out.extend(array.iter().map(|v| v.map(str::to_string)));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn edge_batch(from: Vec<i32>, to: Vec<i32>) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("person1_id", DataType::Int32, false),
            Field::new("person2_id", DataType::Int32, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(Int32Array::from(from)), Arc::new(Int32Array::from(to))],
        )
        .unwrap()
    }

    #[test]
    fn test_id_column_widens_and_concatenates() {
        let collection = Collection::new(vec![
            edge_batch(vec![1, 2], vec![2, 3]),
            edge_batch(vec![3], vec![1]),
        ]);

        assert_eq!(collection.num_rows(), 3);
        assert_eq!(collection.id_column("person1_id").unwrap(), vec![1, 2, 3]);
        assert_eq!(collection.id_column("person2_id").unwrap(), vec![2, 3, 1]);
    }

    #[test]
    fn test_missing_column() {
        let collection = Collection::new(vec![edge_batch(vec![1], vec![2])]);
        let err = collection.id_column("nope").unwrap_err();
        assert!(err.to_string().contains("Column not found: nope"));
    }

    #[test]
    fn test_null_ids_rejected() {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int32, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int32Array::from(vec![Some(1), None]))],
        )
        .unwrap();
        let collection = Collection::new(vec![batch]);

        assert!(collection.id_column("id").is_err());
    }

    #[test]
    fn test_text_column() {
        let schema = Arc::new(Schema::new(vec![Field::new("firstName", DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec![Some("Ada"), None]))],
        )
        .unwrap();
        let collection = Collection::new(vec![batch]);

        assert_eq!(
            collection.text_column("firstName").unwrap(),
            vec![Some("Ada".to_string()), None]
        );
    }
}
