// Property tests for schema derivation and draft editing.
// Soak: PROPTEST_CASES=10000 cargo test --release --test schema_props

use proptest::prelude::*;
use rowdeck::core::schema::{
    ADDED_COLUMN_PREFIX, derive_initial_schema, looks_like_image_header, validate_for_confirmation,
};
use rowdeck::core::{ColumnConfig, DataType, SchemaDraft};
use rowdeck::error::SchemaViolation;
use std::collections::{BTreeSet, HashSet};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Header names: mostly plain words, sometimes image-like, sometimes
/// colliding with the names added columns receive.
fn arb_header() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{1,8}",
        2 => prop::sample::select(vec!["Photo", "image_url", "Link", "FOTO", "imagen"]).prop_map(String::from),
        1 => (1u64..6).prop_map(|n| format!("{ADDED_COLUMN_PREFIX}{n}")),
    ]
}

/// Distinct headers, as the keys of a decoded record always are.
fn arb_distinct_headers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(arb_header(), 1..12).prop_map(|set: BTreeSet<String>| {
        set.into_iter().collect()
    })
}

/// Option text: short values with stray padding and frequent repeats.
fn arb_option() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(vec!["open", "closed", " open", "open ", "Open", ""]).prop_map(String::from),
        1 => "[a-c ]{0,3}",
    ]
}

fn arb_type() -> impl Strategy<Value = DataType> {
    prop::sample::select(DataType::ALL.to_vec())
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn derived_schema_has_at_most_one_image_column(headers in prop::collection::vec(arb_header(), 0..12)) {
        let columns = derive_initial_schema(&headers);
        prop_assert_eq!(columns.len(), headers.len());
        let urls: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.data_type == DataType::Url)
            .map(|(i, _)| i)
            .collect();
        prop_assert!(urls.len() <= 1);
        let first_match = headers.iter().position(|h| looks_like_image_header(h));
        prop_assert_eq!(urls.first().copied(), first_match);
        for (column, header) in columns.iter().zip(&headers) {
            prop_assert_eq!(&column.original_header, header);
            prop_assert_eq!(&column.display_name, header);
        }
    }

    #[test]
    fn added_columns_never_collide(
        headers in prop::collection::vec(arb_header(), 0..8),
        reserved in prop::collection::vec(arb_header(), 0..4),
        adds in 1usize..8,
    ) {
        let mut draft = SchemaDraft::from_headers(&headers).with_reserved(reserved.clone());
        let mut taken: HashSet<String> = headers.iter().cloned().collect();
        taken.extend(reserved);
        for _ in 0..adds {
            let index = draft.add_column();
            let header = draft.columns()[index].original_header.clone();
            prop_assert!(draft.is_added(index));
            prop_assert!(taken.insert(header));
        }
    }

    #[test]
    fn validation_reports_first_violation(types in prop::collection::vec(arb_type(), 0..6)) {
        let columns: Vec<ColumnConfig> = types
            .iter()
            .enumerate()
            .map(|(i, t)| ColumnConfig::new(format!("c{i}")).with_type(*t))
            .collect();
        let urls = types.iter().filter(|t| **t == DataType::Url).count();
        let bare_select = types.contains(&DataType::Select);

        let result = validate_for_confirmation(&columns);
        if urls > 1 {
            prop_assert_eq!(result, Err(SchemaViolation::MultipleImageColumns { count: urls }));
        } else if bare_select {
            let is_select_violation = matches!(result, Err(SchemaViolation::SelectWithoutOptions { .. }));
            prop_assert!(is_select_violation);
        } else if columns.is_empty() {
            prop_assert_eq!(result, Err(SchemaViolation::NoColumns));
        } else {
            prop_assert_eq!(result, Ok(()));
        }
    }

    #[test]
    fn removing_a_column_drops_exactly_that_column(
        headers in arb_distinct_headers(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut draft = SchemaDraft::from_headers(&headers);
        let index = pick.index(headers.len());
        let removed = draft.remove_column(index).expect("index in range");

        prop_assert_eq!(&removed.original_header, &headers[index]);
        prop_assert_eq!(draft.len(), headers.len() - 1);
        prop_assert!(draft.columns().iter().all(|c| c.original_header != removed.original_header));
        prop_assert!(draft.remove_column(draft.len()).is_err());
    }

    #[test]
    fn options_never_repeat(values in prop::collection::vec(arb_option(), 0..24)) {
        let mut draft = SchemaDraft::from_columns(
            vec![ColumnConfig::new("status").with_type(DataType::Select)],
            &["status"],
        );
        for value in &values {
            let before = draft.columns()[0].options.len();
            let changed = draft.add_option(0, value).expect("column exists");
            prop_assert_eq!(changed, draft.columns()[0].options.len() == before + 1);
        }

        let options = &draft.columns()[0].options;
        let distinct: HashSet<&String> = options.iter().collect();
        prop_assert_eq!(distinct.len(), options.len());
        prop_assert!(options.iter().all(|o| !o.is_empty() && o.trim() == o.as_str()));
    }
}
