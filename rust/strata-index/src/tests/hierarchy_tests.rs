use strata_common::error::ErrorKind;

use crate::{
    IndexHierarchy, Label, LabelType,
    constructor::IndexConstructor,
    flat_index::FlatIndex,
    tests::{label_set, rows},
};

fn sample() -> IndexHierarchy {
    IndexHierarchy::from_labels(rows(&[["x", "1"], ["x", "2"], ["y", "1"]])).unwrap()
}

#[test]
fn test_from_labels_builds_levels_in_order_of_appearance() {
    let index = sample();
    assert_eq!(index.depth(), 2);
    assert_eq!(index.len(), 3);
    assert_eq!(index.level(0).unwrap().labels(), &[Label::from("x"), Label::from("y")]);
    assert_eq!(index.level(1).unwrap().labels(), &[Label::from("1"), Label::from("2")]);
    assert_eq!(index.positions_at(0), Some(&[0, 0, 1][..]));
    assert_eq!(index.positions_at(1), Some(&[0, 1, 0][..]));
    assert_eq!(index.positions_at(2), None);
    assert_eq!(index.labels_at(1), Some(vec![Label::from("x"), Label::from("2")]));
    assert_eq!(index.labels_at(3), None);
}

#[test]
fn test_positions_at_depths() {
    let index = sample();
    let columns = index.positions_at_depths(&[1, 0]).unwrap();
    assert_eq!(columns, vec![&[0u64, 1, 0][..], &[0u64, 0, 1][..]]);

    let err = index.positions_at_depths(&[2]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

#[test]
fn test_duplicate_rows_rejected() {
    let err = IndexHierarchy::from_labels(rows(&[["a", "b"], ["a", "c"], ["a", "b"]]))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DuplicateRow { .. }));
}

#[test]
fn test_ragged_rows_rejected() {
    let rows = vec![
        vec![Label::from("a"), Label::from(1)],
        vec![Label::from("b")],
    ];
    let err = IndexHierarchy::from_labels(rows).unwrap_err();
    assert!(err.is_depth_mismatch());
}

#[test]
fn test_from_labels_without_rows() {
    let err = IndexHierarchy::from_labels(Vec::<Vec<Label>>::new()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let ctors = [IndexConstructor::Typed(LabelType::Int), IndexConstructor::Plain];
    let index =
        IndexHierarchy::from_labels_with(Vec::<Vec<Label>>::new(), Some(&ctors[..]), None).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.depth(), 2);
    assert_eq!(index.index_constructors(), ctors);
}

#[test]
fn test_from_labels_with_constructors_and_name() {
    let ctors = [IndexConstructor::Plain, IndexConstructor::Typed(LabelType::Int)];
    let index = IndexHierarchy::from_labels_with(
        vec![vec![Label::from("a"), Label::from(1)], vec![Label::from("b"), Label::from(2)]],
        Some(&ctors[..]),
        Some("ix".to_string()),
    )
    .unwrap();
    assert_eq!(index.name(), Some("ix"));
    assert_eq!(index.index_constructors(), ctors);
    assert_eq!(index.level(1).unwrap().label_type(), LabelType::Int);

    let err = IndexHierarchy::from_labels_with(
        vec![vec![Label::from("a"), Label::from("one")]],
        Some(&ctors[..]),
        None,
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::LabelTypeMismatch { .. }));

    let err = IndexHierarchy::from_labels_with(vec![vec![Label::from("a")]], Some(&ctors[..]), None)
        .unwrap_err();
    assert!(err.is_depth_mismatch());
}

#[test]
fn test_new_validates_columns() {
    let levels = || {
        vec![
            FlatIndex::from_labels(["a", "b"]).unwrap(),
            FlatIndex::from_labels([1, 2, 3]).unwrap(),
        ]
    };

    let index = IndexHierarchy::new(levels(), vec![vec![0, 1, 1], vec![2, 0, 2]], None).unwrap();
    assert_eq!(index.len(), 3);

    let err = IndexHierarchy::new(levels(), vec![vec![0, 2], vec![0, 0]], None).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::PositionOutOfBounds {
            depth: 0,
            position: 2,
            len: 2
        }
    ));

    let err = IndexHierarchy::new(levels(), vec![vec![0, 1], vec![0]], None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let err = IndexHierarchy::new(levels(), vec![vec![0, 1]], None).unwrap_err();
    assert!(err.is_depth_mismatch());

    let err = IndexHierarchy::new(levels(), vec![vec![1, 1], vec![2, 2]], None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DuplicateRow { .. }));

    let err = IndexHierarchy::new(Vec::new(), Vec::new(), None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

#[test]
fn test_from_product() {
    let index = IndexHierarchy::from_product(
        vec![
            FlatIndex::from_labels(["a", "b"]).unwrap(),
            FlatIndex::from_labels([1, 2, 3]).unwrap(),
        ],
        None,
    )
    .unwrap();
    assert_eq!(index.len(), 6);
    let labels = index.iter_labels().collect::<Vec<_>>();
    assert_eq!(labels[0], vec![Label::from("a"), Label::from(1)]);
    assert_eq!(labels[2], vec![Label::from("a"), Label::from(3)]);
    assert_eq!(labels[3], vec![Label::from("b"), Label::from(1)]);
    assert_eq!(labels[5], vec![Label::from("b"), Label::from(3)]);

    let empty = IndexHierarchy::from_product(
        vec![
            FlatIndex::from_labels(["a", "b"]).unwrap(),
            FlatIndex::empty(IndexConstructor::Plain),
        ],
        None,
    )
    .unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.depth(), 2);
}

#[test]
fn test_position_of_and_contains() {
    let index = sample();
    assert_eq!(index.position_of(&[Label::from("y"), Label::from("1")]), Some(2));
    assert_eq!(index.position_of(&[Label::from("y"), Label::from("2")]), None);
    assert_eq!(index.position_of(&[Label::from("z"), Label::from("1")]), None);
    assert_eq!(index.position_of(&[Label::from("y")]), None);
    assert!(index.contains(&[Label::from("x"), Label::from("2")]));
}

#[test]
fn test_position_of_on_product() {
    let index = IndexHierarchy::from_product(
        vec![
            FlatIndex::from_labels([1, 2, 3, 4]).unwrap(),
            FlatIndex::from_labels(["p", "q"]).unwrap(),
        ],
        None,
    )
    .unwrap();
    for (row, labels) in index.iter_labels().enumerate() {
        assert_eq!(index.position_of(&labels), Some(row));
    }
}

#[test]
fn test_empty() {
    let err = IndexHierarchy::empty(&[], None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let index = IndexHierarchy::empty(&IndexConstructor::defaults(3), Some("e".into())).unwrap();
    assert_eq!(index.depth(), 3);
    assert!(index.is_empty());
    assert_eq!(index.name(), Some("e"));
    assert_eq!(index.iter_labels().count(), 0);
}

#[test]
fn test_with_name_is_alias() {
    let index = sample();
    let renamed = index.with_name(Some("other".to_string()));
    assert_eq!(renamed.name(), Some("other"));
    assert!(renamed.is_alias_of(&index));
    assert_eq!(renamed.shallow_copy_key(), index.shallow_copy_key());
    assert!(index.clone().is_alias_of(&index));
}

#[test]
fn test_equal_but_not_alias() {
    let a = sample();
    let b = sample();
    assert!(a.equals(&b));
    assert!(!a.is_alias_of(&b));
    assert_ne!(a.shallow_copy_key(), b.shallow_copy_key());

    let reordered = IndexHierarchy::from_labels(rows(&[["x", "2"], ["x", "1"], ["y", "1"]])).unwrap();
    assert!(!a.equals(&reordered));
    assert_eq!(label_set(&a), label_set(&reordered));
}
