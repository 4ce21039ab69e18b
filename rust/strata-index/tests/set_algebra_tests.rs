use std::collections::BTreeSet;

use strata_index::{
    FlatIndex, IndexConstructor, IndexHierarchy, Label, LabelType, SetOpConfig, difference,
    intersection, set_ops::union_with_config, union,
};

fn sorted_rows(index: &IndexHierarchy) -> BTreeSet<Vec<Label>> {
    index.iter_labels().collect()
}

fn calendar(years: &[i64], months: &[&str]) -> IndexHierarchy {
    IndexHierarchy::from_product(
        vec![
            FlatIndex::from_labels(years.iter().copied()).unwrap(),
            FlatIndex::from_labels(months.iter().copied()).unwrap(),
        ],
        Some("calendar".to_string()),
    )
    .unwrap()
}

#[test]
fn test_product_indices() {
    let early = calendar(&[2020, 2021], &["jan", "feb", "mar"]);
    let late = calendar(&[2021, 2022], &["feb", "mar", "apr"]);

    let shared = intersection(&[&early, &late]).unwrap();
    assert_eq!(shared.len(), 2);
    assert_eq!(shared.name(), Some("calendar"));
    assert_eq!(
        sorted_rows(&shared),
        BTreeSet::from([
            vec![Label::from(2021), Label::from("feb")],
            vec![Label::from(2021), Label::from("mar")],
        ])
    );
    assert_eq!(shared.level(0).unwrap().labels(), &[Label::from(2021)]);
    assert_eq!(shared.level(0).unwrap().label_type(), LabelType::Int);
    assert_eq!(shared.level(1).unwrap().len(), 2);

    let all = union(&[&early, &late]).unwrap();
    assert_eq!(all.len(), 6 + 6 - 2);
    assert_eq!(all.level(0).unwrap().len(), 3);
    assert_eq!(all.level(1).unwrap().len(), 4);

    let only_early = difference(&[&early, &late]).unwrap();
    assert_eq!(only_early.len(), 4);
    assert!(only_early.contains(&[Label::from(2020), Label::from("mar")]));
    assert!(!only_early.contains(&[Label::from(2021), Label::from("mar")]));
    assert!(only_early.contains(&[Label::from(2021), Label::from("jan")]));
}

#[test]
fn test_many_inputs() {
    let a = calendar(&[1, 2, 3], &["a", "b"]);
    let b = calendar(&[2, 3, 4], &["a", "b"]);
    let c = calendar(&[3, 4, 5], &["b", "c"]);

    let shared = intersection(&[&a, &b, &c]).unwrap();
    assert_eq!(
        sorted_rows(&shared),
        BTreeSet::from([vec![Label::from(3), Label::from("b")]])
    );

    let all = union(&[&a, &b, &c]).unwrap();
    assert_eq!(all.len(), 5 * 2 + 2);

    let rest = difference(&[&a, &b, &c]).unwrap();
    assert_eq!(
        sorted_rows(&rest),
        BTreeSet::from([
            vec![Label::from(1), Label::from("a")],
            vec![Label::from(1), Label::from("b")],
        ])
    );
}

#[test]
fn test_chained_operations() {
    let a = IndexHierarchy::from_labels([["p", "x"], ["p", "y"], ["q", "x"]]).unwrap();
    let b = IndexHierarchy::from_labels([["q", "x"], ["r", "z"]]).unwrap();
    let c = IndexHierarchy::from_labels([["p", "y"], ["r", "z"]]).unwrap();

    let ab = a.union(&b).unwrap();
    let abc = ab.difference(&c).unwrap();
    assert_eq!(
        sorted_rows(&abc),
        BTreeSet::from([
            vec![Label::from("p"), Label::from("x")],
            vec![Label::from("q"), Label::from("x")],
        ])
    );
    let back = abc.intersection(&a).unwrap();
    assert_eq!(sorted_rows(&back), sorted_rows(&abc));
}

#[test]
fn test_empty_result_keeps_shape() {
    let ctors = [
        IndexConstructor::Typed(LabelType::Str),
        IndexConstructor::Typed(LabelType::Bool),
    ];
    let a = IndexHierarchy::from_labels_with(
        [[Label::from("k"), Label::from(true)]],
        Some(&ctors[..]),
        Some("flags".to_string()),
    )
    .unwrap();
    let b = IndexHierarchy::from_labels_with(
        [[Label::from("k"), Label::from(false)]],
        Some(&ctors[..]),
        Some("flags".to_string()),
    )
    .unwrap();

    let none = intersection(&[&a, &b]).unwrap();
    assert!(none.is_empty());
    assert_eq!(none.depth(), 2);
    assert_eq!(none.name(), Some("flags"));
    assert_eq!(none.index_constructors(), ctors);
    assert_eq!(none.level(1).unwrap().label_type(), LabelType::Bool);
}

#[test]
fn test_narrow_fixed_width_limit() {
    let a = calendar(&[1, 2, 3, 4, 5, 6, 7, 8, 9], &["a", "b", "c", "d", "e"]);
    let b = calendar(&[9, 10, 11], &["e", "f"]);
    let wide = union(&[&a, &b]).unwrap();
    for bits in [1, 4, 7, 8, 64] {
        let config = SetOpConfig::default().with_fixed_width_limit(bits);
        let result = union_with_config(&[&a, &b], &config).unwrap();
        assert_eq!(sorted_rows(&result), sorted_rows(&wide), "limit {bits}");
    }
}
