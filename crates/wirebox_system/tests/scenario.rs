//! End-to-end wiring scenario.
//!
//! A singleton model, a transient view with a `model` outlet and a `render`
//! handler, driven by a single notification.


use std::sync::Arc;

use test_utils::{UserModel, View};
use wirebox_system::prelude::*;

#[test]
fn show_renders_view_with_injected_model() {
    let system = System::new();
    system
        .map_singleton_of::<UserModel>("userModel")
        .unwrap()
        .map_singleton_of::<View>("view")
        .unwrap()
        .map_outlet("userModel", "view", "model")
        .unwrap()
        .map_handler("show", "view", "render", false)
        .unwrap();

    system.notify("show", (42_i32,)).unwrap();

    let view = system.get::<View>("view").unwrap();
    assert_eq!(view.renders(), vec![42]);
    assert_eq!(view.setup_calls, 1);
    assert!(view.model_seen_in_setup);

    let model = system.get::<UserModel>("userModel").unwrap();
    assert!(Arc::ptr_eq(view.model.get().unwrap(), &model));
    assert_eq!(model.name, "ada");
}

#[test]
fn plugin_wires_the_same_scenario() {
    struct ShowPlugin;

    impl Plugin for ShowPlugin {
        fn build(&self, system: &System) -> Result<(), SystemError> {
            system
                .map_singleton_of::<UserModel>("userModel")?
                .map_singleton_of::<View>("view")?
                .map_outlet("userModel", "view", "model")?
                .map_handler("show", "view", "render", true)?;
            Ok(())
        }
    }

    let system = System::new();
    system.add_plugin(ShowPlugin).unwrap();

    system.notify("show", (1_i32,)).unwrap();
    system.notify("show", (2_i32,)).unwrap();

    let view = system.get::<View>("view").unwrap();
    assert_eq!(view.renders(), vec![1]);
}

#[test]
fn handler_can_resolve_through_the_notification() {
    let system = System::new();
    let lookup = HandlerFn::new(|_, notification| {
        let model = notification.system().get::<UserModel>("userModel")?;
        if model.name == "ada" {
            Ok(())
        } else {
            Err("unexpected model".into())
        }
    });

    system
        .map_singleton_of::<UserModel>("userModel")
        .unwrap()
        .map_handler("check", Receiver::Unattached, lookup, false)
        .unwrap();

    system.notify("check", ()).unwrap();
}
