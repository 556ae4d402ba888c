//! Loading Parquet collections into the in-memory graph store

use arrow::array::{Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use reach_bench::seed::SeedPoint;
use reach_bench::storage::Collection;
use reach_bench::store::{ConnectionRule, MemoryGraphStore, ReachabilityStore};
use reach_bench::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("reach-bench-{}-{name}.parquet", std::process::id()))
}

fn write_parquet(path: &Path, batch: &RecordBatch, row_group_size: usize) {
    let file = File::create(path).unwrap();
    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props)).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

/// person_knows_person: 1 -> 2 -> 3 -> 1, 3 -> 4
fn knows_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("person1_id", DataType::Int64, false),
        Field::new("person2_id", DataType::Int64, false),
        Field::new("creationDate", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 3])),
            Arc::new(Int64Array::from(vec![2, 3, 1, 4])),
            Arc::new(StringArray::from(vec!["2010-01-01"; 4])),
        ],
    )
    .unwrap()
}

fn person_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("firstName", DataType::Utf8, true),
        Field::new("lastName", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 3, 4])),
            Arc::new(StringArray::from(vec![Some("Ada"), Some("Alan"), None, Some("Edsger")])),
            Arc::new(StringArray::from(vec![Some("Lovelace"), Some("Turing"), None, None])),
        ],
    )
    .unwrap()
}

#[test]
fn test_load_parquet_into_store() {
    let edges_path = temp_path("knows");
    let persons_path = temp_path("person");
    // two row groups so the edge collection spans several batches
    write_parquet(&edges_path, &knows_batch(), 2);
    write_parquet(&persons_path, &person_batch(), 1024);

    let edges = Collection::load_parquet(&edges_path).unwrap();
    let persons = Collection::load_parquet(&persons_path).unwrap();
    assert_eq!(edges.num_rows(), 4);

    let store = MemoryGraphStore::from_collections(
        &edges,
        &["person1_id", "person2_id"],
        &persons,
        "id",
        &["firstName", "lastName"],
    )
    .unwrap();

    assert_eq!(store.edge_count(), 4);
    assert_eq!(store.vertex_count().unwrap(), 4);
    assert_eq!(
        store.find_vertices(&[1, 3, 4]).unwrap(),
        vec![
            SeedPoint::new(1, "Ada Lovelace"),
            SeedPoint::new(3, "3"),
            SeedPoint::new(4, "Edsger"),
        ]
    );

    // seed 1: root (1,2); depth 0 expands 2 -> (2,3); depth 1 expands 3 -> (3,1), (3,4)
    let rows = store
        .bounded_reachability(&[1], &ConnectionRule::default(), 1)
        .unwrap();
    let targets: Vec<i64> = rows.iter().map(|r| r.record.target).collect();
    assert_eq!(targets, vec![3, 1, 4]);
    assert_eq!(rows.iter().map(|r| r.depth).collect::<Vec<_>>(), vec![0, 1, 1]);

    std::fs::remove_file(edges_path).ok();
    std::fs::remove_file(persons_path).ok();
}

#[test]
fn test_load_missing_file() {
    let result = Collection::load_parquet(temp_path("does-not-exist"));
    match result {
        Err(Error::StorageError(message)) => assert!(message.contains("Failed to open")),
        other => panic!("expected storage error, got {:?}", other.map(|c| c.num_rows())),
    }
}

#[test]
fn test_missing_edge_column() {
    let edges = Collection::new(vec![knows_batch()]);
    let persons = Collection::new(vec![person_batch()]);

    let result = MemoryGraphStore::from_collections(
        &edges,
        &["person1_id", "knows_id"],
        &persons,
        "id",
        &[],
    );

    assert!(matches!(result, Err(Error::StorageError(m)) if m.contains("knows_id")));
}

#[test]
fn test_unknown_rule_field_is_query_failure() {
    let store = MemoryGraphStore::from_collections(
        &Collection::new(vec![knows_batch()]),
        &["person1_id", "person2_id"],
        &Collection::new(vec![person_batch()]),
        "id",
        &[],
    )
    .unwrap();

    let rule = ConnectionRule::new("creationDate", "person1_id");
    let result = store.bounded_reachability(&[1], &rule, 3);

    assert!(matches!(result, Err(Error::QueryFailure(_))));
}
