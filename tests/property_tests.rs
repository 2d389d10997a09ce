//! Property tests for the attribute store.

use std::sync::Arc;

use proptest::prelude::*;

use game_attrs::core::OwnerId;
use game_attrs::kinds::INTEGER;
use game_attrs::schema::Schema;
use game_attrs::store::AttributeStore;

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn schema() -> Arc<Schema> {
    let mut source = String::from("header\n");
    for (rank, name) in NAMES.iter().enumerate() {
        source.push_str(&format!("{name},integer,0,,yes,{name},,,{}\n", rank % 3));
    }
    Arc::new(Schema::parse(&source).unwrap())
}

proptest! {
    #[test]
    fn generate_then_remove_leaves_no_trace(
        picks in proptest::collection::vec(0usize..NAMES.len(), 1..20)
    ) {
        let mut store = AttributeStore::new(schema());
        store.register(OwnerId(1)).unwrap();
        let mut manager = store.manager(OwnerId(1)).unwrap();

        for &i in &picks {
            let name = NAMES[i];
            if manager.contains(name) {
                prop_assert!(manager.generate(name).is_err());
            } else {
                manager.generate(name).unwrap();
                prop_assert!(manager.contains(name));
            }
        }
        for name in NAMES {
            if manager.contains(name) {
                manager.remove(name).unwrap();
            }
            prop_assert!(!manager.contains(name));
        }
        prop_assert!(manager.attributes().unwrap().is_empty());
        prop_assert_eq!(manager.description(), "");
    }

    #[test]
    fn copies_are_independent(
        values in proptest::collection::vec(-50i64..50, NAMES.len()),
        bump in 1i64..10
    ) {
        let mut store = AttributeStore::new(schema());
        store.register(OwnerId(1)).unwrap();
        store.register(OwnerId(2)).unwrap();
        {
            let mut donor = store.manager(OwnerId(1)).unwrap();
            for (name, value) in NAMES.iter().zip(&values) {
                donor.generate_with(name, *value, INTEGER).unwrap();
            }
        }
        let before = store.description(OwnerId(1)).unwrap().to_string();

        let mut recipient = store.manager(OwnerId(2)).unwrap();
        recipient.copy_from(OwnerId(1)).unwrap();
        prop_assert_eq!(recipient.description(), before.as_str());
        for name in NAMES {
            let value = *recipient.value(name, INTEGER).unwrap();
            recipient.set_value(name, value + bump, INTEGER).unwrap();
        }

        let donor = store.manager(OwnerId(1)).unwrap();
        for (name, value) in NAMES.iter().zip(&values) {
            prop_assert_eq!(*donor.value(name, INTEGER).unwrap(), *value);
        }
        prop_assert_eq!(donor.description(), before.as_str());
    }

    #[test]
    fn description_is_sorted_by_rank(order in Just(NAMES.to_vec()).prop_shuffle()) {
        let mut store = AttributeStore::new(schema());
        store.register(OwnerId(1)).unwrap();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        for name in &order {
            manager.generate(name).unwrap();
        }

        let lines: Vec<&str> = manager.description().lines().collect();
        prop_assert_eq!(lines.len(), NAMES.len());
        let ranks: Vec<usize> = lines
            .iter()
            .map(|line| {
                let name = line.split(':').next().unwrap_or_default();
                NAMES.iter().position(|n| *n == name).unwrap_or_default() % 3
            })
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ranks, sorted);

        // Within a rank, lines follow generation order
        for rank in 0..3 {
            let in_rank: Vec<&str> = lines
                .iter()
                .map(|line| line.split(':').next().unwrap_or_default())
                .filter(|name| NAMES.iter().position(|n| n == name).unwrap_or_default() % 3 == rank)
                .collect();
            let expected: Vec<&str> = order
                .iter()
                .copied()
                .filter(|name| NAMES.iter().position(|n| n == name).unwrap_or_default() % 3 == rank)
                .collect();
            prop_assert_eq!(in_rank, expected);
        }
    }
}
