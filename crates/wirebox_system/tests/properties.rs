//! Property tests for resolution identity and one-shot dispatch.
//!
//! Keys and notification counts are generated; the identity rules for each
//! mapping kind must hold for all of them.


use std::sync::Arc;

use proptest::prelude::*;
use test_utils::{Counter, UserModel, counting_handler, load};
use wirebox_system::prelude::*;

fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_.]{0,15}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_singleton_is_stable(key in arb_key(), calls in 2..8usize) {
        let system = System::new();
        system.map_singleton_of::<UserModel>(&key).unwrap();

        let first = system.get_object(&key).unwrap();
        for _ in 1..calls {
            prop_assert!(Arc::ptr_eq(&first, &system.get_object(&key).unwrap()));
        }
    }

    #[test]
    fn prop_class_is_always_fresh(key in arb_key(), calls in 2..8usize) {
        let system = System::new();
        system.map_class_of::<UserModel>(&key).unwrap();

        let instances: Vec<Instance> = (0..calls)
            .map(|_| system.get_object(&key).unwrap())
            .collect();
        for (i, a) in instances.iter().enumerate() {
            for b in &instances[i + 1..] {
                prop_assert!(!Arc::ptr_eq(a, b));
            }
        }
    }

    #[test]
    fn prop_instantiate_differs_from_cache(key in arb_key()) {
        let system = System::new();
        system.map_singleton_of::<UserModel>(&key).unwrap();

        let cached = system.get_object(&key).unwrap();
        prop_assert!(!Arc::ptr_eq(&cached, &system.instantiate(&key).unwrap()));
    }

    #[test]
    fn prop_instantiate_value_is_value(key in arb_key()) {
        let system = System::new();
        system.map_value(&key, UserModel::default()).unwrap();

        prop_assert!(Arc::ptr_eq(
            &system.instantiate(&key).unwrap(),
            &system.get_object(&key).unwrap()
        ));
    }

    #[test]
    fn prop_unmap_forgets_key(key in arb_key()) {
        let system = System::new();
        system.map_singleton_of::<UserModel>(&key).unwrap();
        system.unmap(&key);

        prop_assert!(!system.has_mapping(&key));
        let missing = matches!(system.get_object(&key), Err(SystemError::MissingMapping(_)));
        prop_assert!(missing);
    }

    #[test]
    fn prop_one_shot_fires_once(event in arb_key(), notifications in 1..10usize) {
        let system = System::new();
        let (count, handler) = counting_handler();
        system.map_singleton_of::<Counter>("counter").unwrap();
        system.map_handler(&event, "counter", "hit", true).unwrap();
        system.map_handler(&event, Receiver::Unattached, handler, true).unwrap();

        for _ in 0..notifications {
            system.notify(&event, ()).unwrap();
        }
        prop_assert_eq!(system.get::<Counter>("counter").unwrap().hits(), 1);
        prop_assert_eq!(load(&count), 1);
    }
}
