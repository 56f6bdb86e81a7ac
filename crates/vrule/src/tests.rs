//! Property-based tests for the compiler and evaluation engine.

#[cfg(test)]
mod property_tests {
    use crate::registry::Registry;
    use crate::report::{codes, Errors};
    use crate::rule::compile;
    use crate::validator::Validator;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::sync::Arc;

    // Strategy for arbitrary JSON leaves and shallow containers
    fn json_value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-1000i64..1000).prop_map(|n| json!(n)),
            "[a-z0-9 ]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(2, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-c]", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    // Strategy for records over a fixed set of fields
    fn record_strategy() -> impl Strategy<Value = Value> {
        prop::collection::btree_map(
            prop_oneof![Just("a"), Just("b"), Just("c"), Just("meta")],
            json_value_strategy(),
            0..4,
        )
        .prop_map(|m| {
            Value::Object(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
        })
    }

    // Strategy for well-formed rule strings
    fn rule_strategy() -> impl Strategy<Value = String> {
        let step = prop_oneof![
            Just("string".to_string()),
            Just("number".to_string()),
            Just("!null".to_string()),
            Just("min:1".to_string()),
            Just("max:3".to_string()),
            Just("in:<meta>".to_string()),
            Just("unknown_rule".to_string()),
        ];
        let iterable = prop_oneof![
            Just(String::new()),
            Just("[]".to_string()),
            Just("[unique]".to_string()),
            Just("[min:1|max:4]".to_string()),
            Just("{}".to_string()),
        ];
        (
            any::<bool>(),
            iterable,
            prop::collection::vec(step, 1..4),
        )
            .prop_map(|(sometimes, iterable, steps)| {
                format!(
                    "{}{}{}",
                    if sometimes { "?" } else { "" },
                    iterable,
                    steps.join("|")
                )
            })
    }

    // Alternatives share one iterable wrapper so they always compile together
    fn alternatives_strategy() -> impl Strategy<Value = Value> {
        (
            prop_oneof![Just(""), Just("?"), Just("[]"), Just("?{}")],
            prop_oneof![Just("string"), Just("number|min:2"), Just("!null")],
            prop_oneof![Just("boolean"), Just("max:1"), Just("in:<meta>")],
        )
            .prop_map(|(prefix, left, right)| {
                json!([format!("{prefix}{left}"), format!("{prefix}{right}")])
            })
    }

    fn schema_strategy() -> impl Strategy<Value = Value> {
        (rule_strategy(), rule_strategy(), alternatives_strategy())
            .prop_map(|(a, b, c)| json!({"a": a, "b": {"x": b}, "c": c}))
    }

    fn validator(schema: &Value) -> Validator {
        Validator::with_registry(schema, Arc::new(Registry::with_builtins())).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // For any compiled validator, check agrees with validate.
        #[test]
        fn check_agrees_with_validate(schema in schema_strategy(), record in record_strategy()) {
            let v = validator(&schema);
            prop_assert_eq!(v.check(&record), v.validate(&record).is_valid);
        }

        // Validating twice yields structurally equal reports.
        #[test]
        fn validation_is_idempotent(schema in schema_strategy(), record in record_strategy()) {
            let v = validator(&schema);
            prop_assert_eq!(v.validate(&record), v.validate(&record));
        }

        // count is the number of failing paths and is_valid is count == 0.
        #[test]
        fn count_matches_failing_paths(schema in schema_strategy(), record in record_strategy()) {
            let report = validator(&schema).validate(&record);
            match &report.errors {
                Errors::NoData => prop_assert!(false, "record was supplied"),
                Errors::Fields(fields) => {
                    prop_assert_eq!(report.count, fields.len());
                    prop_assert_eq!(report.is_valid, report.count == 0);
                    for errors in fields.values() {
                        prop_assert!(errors.entries().next().is_some());
                    }
                }
            }
        }

        // Only alternation leaves use the nested shape.
        #[test]
        fn shape_follows_clause_count(schema in schema_strategy(), record in record_strategy()) {
            let report = validator(&schema).validate(&record);
            if let Some(errors) = report.errors.get("a") {
                prop_assert!(errors.as_flat().is_some());
            }
            if let Some(errors) = report.errors.get("b.x") {
                prop_assert!(errors.as_flat().is_some());
            }
            if let Some(errors) = report.errors.get("c") {
                prop_assert_eq!(errors.as_alternatives().map(|l| l.len()), Some(2));
            }
        }

        // At most one uniqueness finding per field, whatever the duplicates.
        #[test]
        fn unique_reported_at_most_once(items in prop::collection::vec(0i64..3, 0..12)) {
            let v = validator(&json!({"a": "[unique]number"}));
            let report = v.validate(&json!({"a": items}));
            let count = report
                .errors
                .get("a")
                .map(|e| e.entries().filter(|e| e.msg == codes::ITERABLE_UNIQUE).count())
                .unwrap_or(0);
            prop_assert!(count <= 1);
        }

        // Compiled rules render back to an equivalent rule string.
        #[test]
        fn display_recompiles_to_same_node(rule in rule_strategy()) {
            let node = compile(&rule).unwrap();
            prop_assert_eq!(compile(&node.to_string()).unwrap(), node);
        }

        // Arbitrary input never panics the compiler.
        #[test]
        fn compiler_never_panics(rule in "\\PC{0,24}") {
            let _ = compile(&rule);
        }
    }
}
