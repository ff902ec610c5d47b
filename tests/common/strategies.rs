#![allow(dead_code)]

use proptest::prelude::*;
use serde_json::Value;

/// Strategy for route keys that never collide with the reserved keys
pub fn route_key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,15}"
        .prop_filter("reserved route key", |key| {
            !matches!(key.to_lowercase().as_str(), "controller" | "action" | "area")
        })
}

/// Strategy for non-null scalar argument values
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,24}".prop_map(Value::from),
    ]
}

/// Strategy for argument values that may be null
pub fn optional_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        3 => scalar_value_strategy(),
    ]
}

/// Strategy for non-empty constraint values
pub fn constraint_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,15}"
}
