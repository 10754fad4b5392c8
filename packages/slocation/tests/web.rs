#![cfg(all(target_family = "wasm", feature = "web"))]

use std::{cell::RefCell, rc::Rc};

use slocation::{LocationConfig, LocationContext, LocationHost, WebHost};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn context() -> (Rc<WebHost>, LocationContext) {
    let host = Rc::new(WebHost::try_new(LocationConfig::default()).expect("running in a browser"));
    (host.clone(), LocationContext::new(host))
}

#[wasm_bindgen_test]
fn push_state_is_observed_synchronously() {
    tracing_wasm::set_as_global_default();
    let (host, location) = context();
    let paths = Rc::new(RefCell::new(Vec::new()));
    let sink = paths.clone();
    let _sub = location.subscribe(move |location| sink.borrow_mut().push(location.pathname.clone()));

    let depth = host.depth();
    location.goto("/slocation-push", false).unwrap();
    assert_eq!(host.depth(), depth + 1);
    assert_eq!(paths.borrow().last().map(String::as_str), Some("/slocation-push"));
}

#[wasm_bindgen_test]
fn replace_state_keeps_history_length() {
    let (host, location) = context();
    let _sub = location.subscribe(|_| {});

    let depth = host.depth();
    location
        .replace_state(serde_json::json!({ "kept": true }), "", Some("/slocation-replace?x=1"))
        .unwrap();
    assert_eq!(host.depth(), depth);

    let snapshot = location.get();
    assert_eq!(snapshot.pathname, "/slocation-replace");
    assert_eq!(snapshot.search, "?x=1");
    assert_eq!(snapshot, host.current_snapshot());
}

#[wasm_bindgen_test]
fn cross_origin_push_is_rejected() {
    let (_host, location) = context();
    let err = location
        .push_state(serde_json::Value::Null, "", Some("https://example.invalid/"))
        .unwrap_err();
    assert!(matches!(err, slocation::NavigationError::Rejected { operation: "pushState", .. }));
}
