//! Equality delete filter: predicate behaviour on data batches.


use eqdel_core::prelude::{DataType, Field, FieldId, Scalar};
use eqdel_delete::{
    ColumnHandle, DeleteError, DeleteFilter, EqualityDeleteFilter, MemoryPageSource, RowPredicate,
};
use test_data_gen::{batch, field, id_name_rows, layout, table_schema};

fn filter_with(rows: &[(i64, Option<&str>)]) -> EqualityDeleteFilter {
    let source = MemoryPageSource::from_batches([id_name_rows(rows)]);
    EqualityDeleteFilter::read_equality_deletes(source, &layout(&[1, 2]), &table_schema())
        .expect("Filter build failed")
}

#[test]
fn test_matching_row_is_dropped_others_kept() {
    let filter = filter_with(&[(1, Some("a"))]);
    let predicate = filter
        .create_predicate(&layout(&[1, 2]))
        .expect("Predicate creation failed");

    let data = id_name_rows(&[(1, Some("a")), (1, Some("b")), (2, Some("a"))]);
    assert!(!predicate.keep(&data, 0));
    assert!(predicate.keep(&data, 1));
    assert!(predicate.keep(&data, 2));
}

#[test]
fn test_delete_schema_is_field_id_selection_of_table() {
    // Delete file lists name before id; the delete schema follows table order.
    let source = MemoryPageSource::new();
    let filter =
        EqualityDeleteFilter::read_equality_deletes(source, &layout(&[2, 1]), &table_schema())
            .expect("Filter build failed");
    assert_eq!(
        filter.schema().field_ids(),
        vec![FieldId::new(1), FieldId::new(2)]
    );
    assert!(filter.is_empty());
}

#[test]
fn test_column_order_independence() {
    // Delete file written as [id, name]; data file laid out as [name, id].
    let filter = filter_with(&[(3, Some("x")), (7, Some("y"))]);

    let data_layout = layout(&[2, 1]);
    let data = batch(
        &["name", "id"],
        vec![
            vec!["x".into(), Scalar::I64(3)],
            vec!["y".into(), Scalar::I64(3)],
            vec!["y".into(), Scalar::I64(7)],
        ],
    );

    let predicate = filter.predicate(&data_layout).expect("Predicate creation failed");
    assert_eq!(predicate.projection().positions(), &[1, 0]);
    assert_eq!(
        predicate.selection(&data).unwrap(),
        vec![false, true, false]
    );
}

#[test]
fn test_delete_file_column_order_is_normalized() {
    // Delete file itself written as [name, id].
    let deletes = batch(&["name", "id"], vec![vec!["a".into(), Scalar::I64(1)]]);
    let filter = EqualityDeleteFilter::read_equality_deletes(
        MemoryPageSource::from_batches([deletes]),
        &layout(&[2, 1]),
        &table_schema(),
    )
    .expect("Filter build failed");

    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let data = id_name_rows(&[(1, Some("a")), (1, Some("b"))]);
    assert!(!predicate.keep(&data, 0));
    assert!(predicate.keep(&data, 1));
}

#[test]
fn test_extra_non_identifier_column_is_ignored() {
    let filter = filter_with(&[(1, Some("a"))]);

    // category (3) is not part of the delete key.
    let data_layout = layout(&[3, 1, 2]);
    let data = batch(
        &["category", "id", "name"],
        vec![
            vec!["books".into(), Scalar::I64(1), "a".into()],
            vec!["games".into(), Scalar::I64(1), "a".into()],
            vec![Scalar::Null, Scalar::I64(2), "a".into()],
        ],
    );

    let predicate = filter.create_predicate(&data_layout).expect("Extra column rejected");
    assert_eq!(
        predicate.selection(&data).unwrap(),
        vec![false, false, true]
    );
}

#[test]
fn test_missing_identifier_column_is_schema_mismatch() {
    let filter = filter_with(&[(1, Some("a"))]);
    let err = filter.create_predicate(&layout(&[1, 3])).err().expect("expected create_predicate to fail");
    match err {
        DeleteError::SchemaMismatch { field_id, name } => {
            assert_eq!(field_id, FieldId::new(2));
            assert_eq!(name, "name");
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_type_mismatch_between_layouts() {
    let filter = filter_with(&[(1, Some("a"))]);
    let mut wrong = field(1);
    wrong.data_type = eqdel_core::prelude::DataType::Int32;
    let data_layout = vec![
        ColumnHandle::new(wrong, 0),
        ColumnHandle::new(field(2), 1),
    ];
    assert!(matches!(
        filter.create_predicate(&data_layout),
        Err(DeleteError::TypeMismatch { .. })
    ));
}

#[test]
fn test_null_key_matches_only_null() {
    let filter = filter_with(&[(1, None)]);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();

    let data = id_name_rows(&[(1, None), (1, Some("")), (1, Some("a")), (2, None)]);
    assert_eq!(
        predicate.selection(&data).unwrap(),
        vec![false, true, true, true]
    );
}

#[test]
fn test_non_null_key_never_matches_null_probe() {
    let filter = filter_with(&[(1, Some("a"))]);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let data = id_name_rows(&[(1, None)]);
    assert!(predicate.keep(&data, 0));
}

#[test]
fn test_duplicate_delete_records_are_idempotent() {
    let once = filter_with(&[(1, Some("a"))]);
    let thrice = filter_with(&[(1, Some("a")), (1, Some("a")), (1, Some("a"))]);

    assert_eq!(once.len(), 1);
    assert_eq!(thrice.len(), 1);
    assert_eq!(thrice.rows_read(), 3);

    let data = id_name_rows(&[(1, Some("a")), (1, Some("b"))]);
    let a = once.create_predicate(&layout(&[1, 2])).unwrap();
    let b = thrice.create_predicate(&layout(&[1, 2])).unwrap();
    assert_eq!(a.selection(&data).unwrap(), b.selection(&data).unwrap());
}

#[test]
fn test_keep_is_order_independent_and_repeatable() {
    let filter = filter_with(&[(2, Some("b")), (4, Some("d"))]);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let data = id_name_rows(&[
        (1, Some("a")),
        (2, Some("b")),
        (3, Some("c")),
        (4, Some("d")),
    ]);

    let forward: Vec<bool> = (0..4).map(|p| predicate.keep(&data, p)).collect();
    let backward: Vec<bool> = (0..4).rev().map(|p| predicate.keep(&data, p)).collect();
    let backward: Vec<bool> = backward.into_iter().rev().collect();
    assert_eq!(forward, vec![true, false, true, false]);
    assert_eq!(forward, backward);
    assert_eq!(forward, predicate.selection(&data).unwrap());
}

#[test]
fn test_filter_batch_keeps_all_columns_in_order() {
    let filter = filter_with(&[(2, Some("b"))]);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let data = id_name_rows(&[(1, Some("a")), (2, Some("b")), (3, Some("c"))]);

    let out = predicate.filter_batch(&data).unwrap();
    assert_eq!(out.num_rows(), 2);
    assert_eq!(out.columns[0].values, vec![Scalar::I64(1), Scalar::I64(3)]);
    assert_eq!(out.columns[1].values, vec![Scalar::from("a"), Scalar::from("c")]);
}

#[test]
fn test_narrow_batch_is_reported_not_panicked() {
    let filter = filter_with(&[(1, Some("a"))]);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let narrow = batch(&["id"], vec![vec![Scalar::I64(1)]]);
    assert!(matches!(
        predicate.filter_batch(&narrow),
        Err(DeleteError::BatchShape(_))
    ));
    assert!(matches!(
        predicate.selection(&narrow),
        Err(DeleteError::BatchShape(_))
    ));
    assert!(predicate.check_batch(&narrow).is_err());
}

#[test]
#[should_panic]
fn test_keep_past_last_row_panics() {
    let filter = filter_with(&[(1, Some("a"))]);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let data = id_name_rows(&[(1, Some("a"))]);
    predicate.check_batch(&data).expect("batch shape");
    predicate.keep(&data, 1);
}

#[test]
fn test_one_filter_serves_multiple_layouts() {
    let filter = filter_with(&[(5, Some("e"))]);

    let p1 = filter.create_predicate(&layout(&[1, 2])).unwrap();
    let p2 = filter.create_predicate(&layout(&[3, 2, 1])).unwrap();

    let d1 = id_name_rows(&[(5, Some("e"))]);
    let d2 = batch(
        &["category", "name", "id"],
        vec![vec!["c".into(), "e".into(), Scalar::I64(5)]],
    );
    assert!(!p1.keep(&d1, 0));
    assert!(!p2.keep(&d2, 0));
}

#[test]
fn test_and_combines_predicates() {
    let first = filter_with(&[(1, Some("a"))]);
    let second = filter_with(&[(2, Some("b"))]);

    let both = first
        .predicate(&layout(&[1, 2]))
        .unwrap()
        .and(second.predicate(&layout(&[1, 2])).unwrap());

    let data = id_name_rows(&[(1, Some("a")), (2, Some("b")), (3, Some("c"))]);
    assert_eq!(both.selection(&data).unwrap(), vec![false, false, true]);
}

#[test]
fn test_nested_struct_identifier_uses_structural_equality() {
    let location = |lat: f64, lon: f64| Scalar::Struct(vec![Scalar::F64(lat), Scalar::F64(lon)]);

    let deletes = batch(
        &["id", "location"],
        vec![vec![Scalar::I64(1), location(1.5, 2.5)]],
    );
    let filter = EqualityDeleteFilter::read_equality_deletes(
        MemoryPageSource::from_batches([deletes]),
        &layout(&[1, 4]),
        &table_schema(),
    )
    .expect("Filter build failed");

    let data = batch(
        &["location", "id"],
        vec![
            vec![location(1.5, 2.5), Scalar::I64(1)],
            vec![location(1.5, 9.0), Scalar::I64(1)],
            vec![Scalar::Null, Scalar::I64(1)],
        ],
    );
    let predicate = filter.create_predicate(&layout(&[4, 1])).unwrap();
    assert_eq!(
        predicate.selection(&data).unwrap(),
        vec![false, true, true]
    );
}

#[test]
fn test_struct_child_identifier_ignores_sibling_fields() {
    let lon_only = Field::new(4, "location", DataType::Struct(vec![field(6)]), true);
    let delete_layout = vec![
        ColumnHandle::new(field(1), 0),
        ColumnHandle::new(lon_only.clone(), 1),
    ];
    let deletes = batch(
        &["id", "location"],
        vec![vec![Scalar::I64(1), Scalar::Struct(vec![Scalar::F64(2.5)])]],
    );
    let filter = EqualityDeleteFilter::read_equality_deletes(
        MemoryPageSource::from_batches([deletes]),
        &delete_layout,
        &table_schema(),
    )
    .expect("Filter build failed");
    assert_eq!(filter.schema().fields, vec![field(1), lon_only]);

    let location = |lat: f64, lon: f64| Scalar::Struct(vec![Scalar::F64(lat), Scalar::F64(lon)]);
    let data = batch(
        &["location", "id"],
        vec![
            vec![location(1.0, 2.5), Scalar::I64(1)],
            vec![location(7.0, 2.5), Scalar::I64(1)],
            vec![location(1.0, 3.0), Scalar::I64(1)],
            vec![location(1.0, 2.5), Scalar::I64(2)],
            vec![Scalar::Null, Scalar::I64(1)],
        ],
    );
    let predicate = filter.create_predicate(&layout(&[4, 1])).unwrap();
    assert_eq!(
        predicate.selection(&data).unwrap(),
        vec![false, false, true, true, true]
    );
}

#[test]
fn test_filter_is_shareable_behind_trait_object() {
    let filter: Box<dyn DeleteFilter> = Box::new(filter_with(&[(1, Some("a"))]));
    assert_eq!(filter.schema().len(), 2);
    let predicate = filter.create_predicate(&layout(&[1, 2])).unwrap();
    assert!(!predicate.keep(&id_name_rows(&[(1, Some("a"))]), 0));
}
