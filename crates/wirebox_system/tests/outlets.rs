//! Tests for outlet rules and property injection.


use std::sync::Arc;

use test_utils::{Counter, Open, UserModel, View};
use wirebox_system::prelude::*;

fn view_system() -> System {
    let system = System::new();
    system
        .map_singleton_of::<UserModel>("userModel")
        .unwrap()
        .map_class_of::<View>("view")
        .unwrap()
        .map_outlet("userModel", "view", "model")
        .unwrap();
    system
}

#[test]
fn outlet_injects_resolved_source() {
    let system = view_system();

    let view = system.get::<View>("view").unwrap();
    let model = view.model.get().expect("model injected");
    let expected = system.get::<UserModel>("userModel").unwrap();
    assert!(Arc::ptr_eq(model, &expected));
}

#[test]
fn injection_happens_before_setup() {
    let system = view_system();

    let view = system.get::<View>("view").unwrap();
    assert_eq!(view.setup_calls, 1);
    assert!(view.model_seen_in_setup);
}

#[test]
fn each_transient_receives_a_fresh_class_source() {
    let system = System::new();
    system
        .map_class_of::<UserModel>("userModel")
        .unwrap()
        .map_class_of::<View>("view")
        .unwrap()
        .map_outlet("userModel", "view", "model")
        .unwrap();

    let a = system.get::<View>("view").unwrap();
    let b = system.get::<View>("view").unwrap();
    assert!(!Arc::ptr_eq(a.model.get().unwrap(), b.model.get().unwrap()));
}

#[test]
fn each_transient_shares_a_singleton_source() {
    let system = view_system();

    let a = system.get::<View>("view").unwrap();
    let b = system.get::<View>("view").unwrap();
    assert!(Arc::ptr_eq(a.model.get().unwrap(), b.model.get().unwrap()));
}

#[test]
fn global_outlet_applies_to_every_key() {
    let system = System::new();
    system
        .map_singleton_of::<UserModel>("model")
        .unwrap()
        .map_class_of::<View>("view")
        .unwrap()
        .map_class_of::<View>("sidebar")
        .unwrap()
        .map_global_outlet("model")
        .unwrap();

    assert!(system.get::<View>("view").unwrap().model.is_filled());
    assert!(system.get::<View>("sidebar").unwrap().model.is_filled());
}

#[test]
fn global_string_is_global_scope() {
    let system = System::new();
    system.map_outlet("model", "global", "model").unwrap();

    assert!(system.has_outlet(Scope::Global, "model"));
    assert!(!system.has_outlet("model", "model"));
}

#[test]
fn rules_apply_global_first_then_keyed() {
    let system = System::new();
    system
        .map_outlet("a", "view", "first_keyed")
        .unwrap()
        .map_outlet("b", Scope::Global, "first_global")
        .unwrap()
        .map_outlet("c", "view", "second_keyed")
        .unwrap()
        .map_outlet("d", Scope::Global, "second_global")
        .unwrap();

    let order: Vec<String> = system
        .outlets_for("view")
        .into_iter()
        .map(|rule| rule.property)
        .collect();
    assert_eq!(
        order,
        vec!["first_global", "second_global", "first_keyed", "second_keyed"]
    );
}

#[test]
fn non_strict_mode_injects_undeclared_properties() {
    let system = System::with_config(SystemConfig::new().with_strict_injections(false));
    system
        .map_singleton_of::<UserModel>("model")
        .unwrap()
        .map_class_of::<Open>("open")
        .unwrap()
        .map_outlet("model", "open", "anything")
        .unwrap();

    let open = system.get::<Open>("open").unwrap();
    assert_eq!(open.injected, vec!["anything"]);
}

#[test]
fn strict_mode_skips_undeclared_properties() {
    let system = System::new();
    system
        .map_singleton_of::<UserModel>("model")
        .unwrap()
        .map_class_of::<Open>("open")
        .unwrap()
        .map_outlet("model", "open", "anything")
        .unwrap();

    let open = system.get::<Open>("open").unwrap();
    assert!(open.injected.is_empty());
}

#[test]
fn strict_mode_does_not_resolve_skipped_sources() {
    let system = System::new();
    system
        .map_class_of::<Open>("open")
        .unwrap()
        .map_outlet("ghost", "open", "anything")
        .unwrap();

    // `ghost` is unmapped but never needed.
    assert!(system.get_object("open").is_ok());
}

#[test]
fn missing_source_fails_resolution() {
    let system = System::new();
    system
        .map_class_of::<View>("view")
        .unwrap()
        .map_outlet("userModel", "view", "model")
        .unwrap();

    assert!(matches!(
        system.get_object("view"),
        Err(SystemError::MissingMapping(key)) if key == "userModel"
    ));
}

#[test]
fn wrong_source_type_is_reported() {
    let system = System::new();
    system
        .map_singleton_of::<Counter>("counter")
        .unwrap()
        .map_class_of::<View>("view")
        .unwrap()
        .map_outlet("counter", "view", "model")
        .unwrap();

    match system.get_object("view") {
        Err(SystemError::Injection {
            target,
            property,
            source_key,
            source: InjectError::TypeMismatch { .. },
        }) => {
            assert_eq!(target, "view");
            assert_eq!(property, "model");
            assert_eq!(source_key, "counter");
        }
        other => panic!("expected injection error, got {other:?}"),
    }
}

#[test]
fn remapping_outlet_replaces_source() {
    let system = System::new();
    system
        .map_outlet("a", "view", "model")
        .unwrap()
        .map_outlet("b", "view", "model")
        .unwrap();

    let rules = system.outlets_for("view");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].source, "b");
}

#[test]
fn unmap_outlet_removes_rule() {
    let system = view_system();

    assert!(system.unmap_outlet("view", "model"));
    assert!(!system.unmap_outlet("view", "model"));

    let view = system.get::<View>("view").unwrap();
    assert!(!view.model.is_filled());
}

#[test]
fn value_mappings_receive_existing_outlets() {
    let system = System::new();
    system
        .map_singleton_of::<UserModel>("userModel")
        .unwrap()
        .map_outlet("userModel", "view", "model")
        .unwrap()
        .map_value("view", View::default())
        .unwrap();

    let view = system.get::<View>("view").unwrap();
    assert!(view.model.is_filled());
}

#[test]
fn inject_into_external_instance() {
    let system = view_system();

    let mut view = View::default();
    system.inject_into("view", &mut view).unwrap();
    assert!(view.model.is_filled());
    assert_eq!(view.setup_calls, 1);
}

#[test]
fn auto_mapped_outlets_follow_keys() {
    let system = System::with_config(SystemConfig::new().with_auto_map_outlets(true));
    system
        .map_singleton_of::<UserModel>("model")
        .unwrap()
        .map_class_of::<View>("view")
        .unwrap();

    assert!(system.has_outlet(Scope::Global, "model"));
    assert!(system.has_outlet(Scope::Global, "view"));
    assert!(system.get::<View>("view").unwrap().model.is_filled());
}

#[test]
fn empty_outlet_arguments_are_invalid() {
    let system = System::new();
    assert!(system.map_outlet("", "view", "model").is_err());
    assert!(system.map_outlet("a", "view", "").is_err());
    assert!(system.map_outlet("a", "", "model").is_err());
    assert_eq!(system.outlet_count(), 0);
}

#[test]
fn keyed_outlet_defaults_property_to_source() {
    let system = System::new();
    system
        .map_singleton_of::<UserModel>("model")
        .unwrap()
        .map_class_of::<View>("view")
        .unwrap()
        .map_outlet_to("model", "view")
        .unwrap();

    assert!(system.has_outlet("view", "model"));
    assert!(!system.has_outlet(Scope::Global, "model"));
    assert!(system.get::<View>("view").unwrap().model.is_filled());
}
