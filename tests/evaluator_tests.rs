use jsonlogic_engine::{Bindings, EvalError, Evaluator, Positional, Record, Rule, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn eval(rule: serde_json::Value) -> Result<Value, EvalError> {
    eval_with(rule, json!(null))
}

fn eval_with(rule: serde_json::Value, data: serde_json::Value) -> Result<Value, EvalError> {
    let rule = Rule::translate(&rule).unwrap();
    let data = Value::from(data);
    rule.evaluate(&Record::new(&data))
}

fn eval_ok(rule: serde_json::Value) -> Value {
    eval(rule).unwrap()
}

fn array(values: Vec<Value>) -> Value {
    Value::Array(values)
}

/// Evaluates with an in-memory log sink and returns the result and the
/// logged text.
fn eval_logged(rule: serde_json::Value) -> (Value, String) {
    let rule = Rule::translate(&rule).unwrap();
    let mut evaluator = Evaluator::with_log(Vec::new());
    let result = evaluator.evaluate(rule.root(), &Record::new(&Value::Null)).unwrap();
    let log = String::from_utf8(evaluator.into_log()).unwrap();
    (result, log)
}

// Relational chains

#[test]
fn test_relational_two_operands() {
    assert_eq!(eval_ok(json!({"<": [1, 2]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({">": [1, 2]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"<=": [2, 2]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({">=": [1.5, 2]})), Value::Bool(false));
}

#[test]
fn test_relational_between() {
    assert_eq!(eval_ok(json!({"<": [1, 2, 3]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"<": [1, 3, 2]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"<=": [1, 1, 2]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"<": [1, 1, 2]})), Value::Bool(false));
}

#[test]
fn test_relational_ignores_operands_beyond_three() {
    assert_eq!(eval_ok(json!({"<": [1, 2, 3, 0, 0]})), Value::Bool(true));
}

#[test]
fn test_relational_stops_at_first_failing_pair() {
    let (result, log) = eval_logged(json!({"<": [3, 1, {"log": 2}]}));
    assert_eq!(result, Value::Bool(false));
    assert_eq!(log, "");

    let (result, log) = eval_logged(json!({"<": [1, 3, {"log": 5}]}));
    assert_eq!(result, Value::Bool(true));
    assert_eq!(log, "5\n");
}

#[test]
fn test_relational_strings() {
    assert_eq!(eval_ok(json!({"<": ["abc", "abd"]})), Value::Bool(true));
    // two strings compare as text, not as numbers
    assert_eq!(eval_ok(json!({"<": ["10", "9"]})), Value::Bool(true));
}

#[test]
fn test_relational_string_with_number() {
    assert_eq!(eval_ok(json!({"<": [2, "10"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({">": ["2.5", 2.25]})), Value::Bool(true));
}

#[test]
fn test_relational_rejects_bool_and_null() {
    assert!(matches!(eval(json!({"<": [true, 1]})), Err(EvalError::Type { op: "<", .. })));
    assert!(matches!(eval(json!({">=": [null, 0]})), Err(EvalError::Type { .. })));
}

// Equality

#[test]
fn test_loose_equality_coerces_strings() {
    assert_eq!(eval_ok(json!({"==": [1, "1"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"==": ["1.5", 1.5]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"!=": [1, "2"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"==": ["a", "a"]})), Value::Bool(true));
}

#[test]
fn test_loose_equality_mixed_numbers() {
    assert_eq!(eval_ok(json!({"==": [1, 1.0]})), Value::Bool(true));
    assert_eq!(
        eval_ok(json!({"==": [18446744073709551615u64, 18446744073709551615u64]})),
        Value::Bool(true)
    );
}

#[test]
fn test_loose_equality_unparsable_string() {
    assert_eq!(
        eval(json!({"==": [1, "one"]})),
        Err(EvalError::Coercion {
            value: "one".to_string(),
            target: "int"
        })
    );
}

#[test]
fn test_loose_equality_rejects_null() {
    assert!(matches!(eval(json!({"==": [null, null]})), Err(EvalError::Type { op: "==", .. })));
}

#[test]
fn test_strict_equality_never_faults() {
    assert_eq!(eval_ok(json!({"===": [1, "1"]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"===": [1, 1]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"===": [null, null]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"===": [true, 1]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"!==": [1, 1.0]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"!==": ["a", "a"]})), Value::Bool(false));
}

#[test]
fn test_signed_unsigned_out_of_range() {
    assert!(matches!(
        eval(json!({"==": [-1, 18446744073709551615u64]})),
        Err(EvalError::Range { op: "==", .. })
    ));
}

// Logic

#[test]
fn test_and_or_return_raw_values() {
    assert_eq!(eval_ok(json!({"or": [0, "", 2]})), Value::Int(2));
    assert_eq!(eval_ok(json!({"and": [1, 0, 3]})), Value::Int(0));
    assert_eq!(eval_ok(json!({"and": [true, "a"]})), Value::from("a"));
    assert_eq!(eval_ok(json!({"or": [false, 0]})), Value::Int(0));
}

#[test]
fn test_and_or_short_circuit() {
    let (result, log) = eval_logged(json!({"and": [false, {"log": "x"}]}));
    assert_eq!(result, Value::Bool(false));
    assert_eq!(log, "");

    let (result, log) = eval_logged(json!({"or": [{"log": 1}, {"log": 2}]}));
    assert_eq!(result, Value::Int(1));
    assert_eq!(log, "1\n");
}

#[test]
fn test_not_and_double_not_return_bools() {
    assert_eq!(eval_ok(json!({"!": [false, "ignored"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"!": [[]]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"!!": ["0"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"!!": [0.0]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"!!": [[0]]})), Value::Bool(true));
}

#[test]
fn test_object_has_no_truth_value() {
    let result = eval_with(json!({"!": {"var": ""}}), json!({"a": 1}));
    assert!(matches!(result, Err(EvalError::Type { op: "!", .. })));
}

#[test]
fn test_if_chains() {
    assert_eq!(eval_ok(json!({"if": [true, "yes", "no"]})), Value::from("yes"));
    assert_eq!(eval_ok(json!({"if": [false, "yes", "no"]})), Value::from("no"));
    assert_eq!(eval_ok(json!({"if": [false, "a", true, "b", "c"]})), Value::from("b"));
    assert_eq!(eval_ok(json!({"if": [false, "a", 0, "b", "c"]})), Value::from("c"));
    assert_eq!(eval_ok(json!({"if": [false, "a"]})), Value::Null);
    assert_eq!(eval_ok(json!({"if": ["only"]})), Value::from("only"));
    assert_eq!(eval_ok(json!({"if": []})), Value::Null);
}

#[test]
fn test_if_skips_untaken_branches() {
    let (result, log) = eval_logged(json!({"if": [true, "a", {"log": "b"}]}));
    assert_eq!(result, Value::from("a"));
    assert_eq!(log, "");
}

#[test]
fn test_short_operator_faults_only_when_reached() {
    assert_eq!(eval_ok(json!({"if": [true, 1, {"==": [1]}]})), Value::Int(1));
    assert_eq!(eval_ok(json!({"or": [true, {"map": [[1]]}]})), Value::Bool(true));
    assert_eq!(
        eval(json!({"if": [false, 1, {"==": [1]}]})),
        Err(EvalError::Arity {
            op: "==",
            min: 2,
            found: 1
        })
    );
    assert!(matches!(eval(json!({"+": []})), Err(EvalError::Arity { op: "+", found: 0, .. })));
}

// Arithmetic

#[test]
fn test_addition_folds() {
    assert_eq!(eval_ok(json!({"+": [1, 2, 3]})), Value::Int(6));
    assert_eq!(eval_ok(json!({"+": [1, "2"]})), Value::Int(3));
    assert_eq!(eval_ok(json!({"+": [1, 2.5]})), Value::Double(3.5));
    assert_eq!(eval_ok(json!({"+": ["1.5", "1"]})), Value::Double(2.5));
    assert_eq!(eval_ok(json!({"+": [7]})), Value::Int(7));
}

#[test]
fn test_addition_overflow_falls_back_to_double() {
    assert_eq!(
        eval_ok(json!({"+": [9223372036854775807i64, 1]})),
        Value::Double(9223372036854775808.0)
    );
}

#[test]
fn test_multiplication() {
    assert_eq!(eval_ok(json!({"*": [2, "3", 4]})), Value::Int(24));
    assert_eq!(eval_ok(json!({"*": [0.5, 3]})), Value::Double(1.5));
}

#[test]
fn test_min_max() {
    assert_eq!(eval_ok(json!({"min": [3, 1, 2]})), Value::Int(1));
    assert_eq!(eval_ok(json!({"max": [1, 2.5]})), Value::Double(2.5));
    assert_eq!(eval_ok(json!({"max": ["4", 3]})), Value::Int(4));
}

#[test]
fn test_null_arithmetic_asymmetry() {
    assert_eq!(eval_ok(json!({"+": [null, null]})), Value::Null);
    assert!(matches!(eval(json!({"+": [null, 1]})), Err(EvalError::Type { op: "+", .. })));
    assert!(matches!(eval(json!({"*": [2, null]})), Err(EvalError::Type { op: "*", .. })));
}

#[test]
fn test_bool_in_arithmetic_is_type_error() {
    assert!(matches!(eval(json!({"+": [true, 1]})), Err(EvalError::Type { op: "+", .. })));
    assert!(matches!(eval(json!({"-": [1, false]})), Err(EvalError::Type { op: "-", .. })));
}

#[test]
fn test_unparsable_string_in_fold() {
    assert!(matches!(eval(json!({"+": [1, "abc"]})), Err(EvalError::Coercion { .. })));
}

#[test]
fn test_non_finite_strings_are_not_numbers() {
    assert!(matches!(eval(json!({"*": ["inf"]})), Err(EvalError::Coercion { .. })));
    assert!(matches!(eval(json!({"+": [1, "NaN"]})), Err(EvalError::Coercion { .. })));
    assert!(matches!(eval(json!({"<": [1.5, "1e400"]})), Err(EvalError::Coercion { .. })));
}

#[test]
fn test_out_of_range_string_never_equals_int_limit() {
    assert!(matches!(
        eval(json!({"==": ["99999999999999999999", 9223372036854775807i64]})),
        Err(EvalError::Coercion { target: "int", .. })
    ));
    assert!(matches!(
        eval(json!({"==": ["1e19", 9223372036854775807i64]})),
        Err(EvalError::Coercion { target: "int", .. })
    ));
    assert_eq!(
        eval_ok(json!({"==": ["9223372036854775807", 9223372036854775807i64]})),
        Value::Bool(true)
    );
}

#[test]
fn test_subtraction() {
    assert_eq!(eval_ok(json!({"-": [10, 3]})), Value::Int(7));
    assert_eq!(eval_ok(json!({"-": [5]})), Value::Int(-5));
    assert_eq!(eval_ok(json!({"-": [1.5, 1]})), Value::Double(0.5));
    assert_eq!(eval_ok(json!({"-": [10, 3, 100]})), Value::Int(7));
}

#[test]
fn test_binary_arithmetic_does_not_parse_strings() {
    assert!(matches!(eval(json!({"-": ["5", 1]})), Err(EvalError::Type { op: "-", .. })));
    assert!(matches!(eval(json!({"/": [6, "2"]})), Err(EvalError::Type { op: "/", .. })));
}

#[test]
fn test_division() {
    assert_eq!(eval_ok(json!({"/": [7, 2]})), Value::Double(3.5));
    assert_eq!(eval_ok(json!({"/": [6, 2]})), Value::Int(3));
    assert_eq!(eval_ok(json!({"/": [-6, 3]})), Value::Int(-2));
    assert_eq!(eval_ok(json!({"/": [1.0, 4]})), Value::Double(0.25));
    assert_eq!(eval_ok(json!({"/": [2]})), Value::Int(0));
}

#[test]
fn test_integer_division_by_zero_is_null() {
    assert_eq!(eval_ok(json!({"/": [1, 0]})), Value::Null);
}

#[test]
fn test_modulo() {
    assert_eq!(eval_ok(json!({"%": [7, 3]})), Value::Int(1));
    assert_eq!(eval_ok(json!({"%": [-7, 3]})), Value::Int(-1));
    assert_eq!(eval_ok(json!({"%": [5, 0]})), Value::Null);
    assert!(matches!(eval(json!({"%": [7.5, 2]})), Err(EvalError::Type { op: "%", .. })));
}

// Strings

#[test]
fn test_cat() {
    assert_eq!(eval_ok(json!({"cat": ["a", 1, true]})), Value::from("a1true"));
    assert_eq!(eval_ok(json!({"cat": ["x", null, 2.5]})), Value::from("xnull2.5"));
    assert_eq!(eval_ok(json!({"cat": "solo"})), Value::from("solo"));
    assert!(matches!(eval(json!({"cat": ["a", [1]]})), Err(EvalError::Type { op: "cat", .. })));
}

#[test]
fn test_substr() {
    assert_eq!(eval_ok(json!({"substr": ["jsonlogic", 4]})), Value::from("logic"));
    assert_eq!(eval_ok(json!({"substr": ["jsonlogic", -5]})), Value::from("logic"));
    assert_eq!(eval_ok(json!({"substr": ["jsonlogic", 1, 3]})), Value::from("son"));
    assert_eq!(eval_ok(json!({"substr": ["jsonlogic", 4, -2]})), Value::from("log"));
    assert_eq!(eval_ok(json!({"substr": ["abc", 10]})), Value::from(""));
    assert_eq!(eval_ok(json!({"substr": ["héllo", 1, 2]})), Value::from("él"));
}

#[test]
fn test_in() {
    assert_eq!(eval_ok(json!({"in": ["Spring", "Springfield"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"in": ["i", "team"]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"in": [2, [1, 2, 3]]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"in": ["2", [1, 2, 3]]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"in": ["x", null]})), Value::Bool(false));
}

#[test]
fn test_regex() {
    assert_eq!(eval_ok(json!({"regex": ["^a.c$", "abc"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"regex": ["b", "abc"]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"regex": ["^b", "abc"]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"regex": ["^4", 42]})), Value::Bool(true));
}

#[test]
fn test_computed_regex_pattern() {
    let rule = json!({"regex": [{"var": "p"}, "abc"]});
    assert_eq!(eval_with(rule.clone(), json!({"p": "a+"})), Ok(Value::Bool(true)));
    assert!(matches!(
        eval_with(rule, json!({"p": "["})),
        Err(EvalError::Regex { ref pattern, .. }) if pattern == "["
    ));
}

// Arrays

#[test]
fn test_array_literal_evaluates_elements() {
    assert_eq!(
        eval_ok(json!([1, {"+": [1, 1]}, "x"])),
        array(vec![Value::Int(1), Value::Int(2), Value::from("x")])
    );
}

#[test]
fn test_merge() {
    assert_eq!(
        eval_ok(json!({"merge": [[1, 2], 3, [4, [5]]]})),
        array(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Int(4),
            array(vec![Value::Int(5)])
        ])
    );
    assert_eq!(eval_ok(json!({"merge": [[]]})), array(vec![]));
}

#[test]
fn test_map_and_filter() {
    let data = json!({"xs": [1, 2, 3]});
    assert_eq!(
        eval_with(json!({"map": [{"var": "xs"}, {"*": [{"var": ""}, 2]}]}), data.clone()).unwrap(),
        array(vec![Value::Int(2), Value::Int(4), Value::Int(6)])
    );
    assert_eq!(
        eval_with(json!({"filter": [{"var": "xs"}, {">": [{"var": ""}, 1]}]}), data).unwrap(),
        array(vec![Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn test_map_over_records() {
    let data = json!({"people": [{"name": "Ada"}, {"name": "Grace"}]});
    assert_eq!(
        eval_with(json!({"map": [{"var": "people"}, {"var": "name"}]}), data).unwrap(),
        array(vec![Value::from("Ada"), Value::from("Grace")])
    );
}

#[test]
fn test_map_rejects_non_array() {
    assert!(matches!(eval(json!({"map": [5, {"var": ""}]})), Err(EvalError::Type { op: "map", .. })));
}

#[test]
fn test_reduce() {
    let data = json!({"xs": [1, 2, 3, 4]});
    let sum = json!({"reduce": [
        {"var": "xs"},
        {"+": [{"var": "current"}, {"var": "accumulator"}]},
        0
    ]});
    assert_eq!(eval_with(sum, data.clone()).unwrap(), Value::Int(10));

    let product = json!({"reduce": [
        {"var": "xs"},
        {"*": [{"var": "current"}, {"var": "accumulator"}]},
        1
    ]});
    assert_eq!(eval_with(product, data).unwrap(), Value::Int(24));
}

#[test]
fn test_reduce_without_initial_starts_at_null() {
    let rule = json!({"reduce": [[1, 2], {"var": "accumulator"}]});
    assert_eq!(eval_ok(rule), Value::Null);
}

#[test]
fn test_all_none_some() {
    let positive = json!({">": [{"var": ""}, 0]});
    assert_eq!(eval_ok(json!({"all": [[1, 2, 3], positive]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"all": [[1, -2, 3], positive]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"all": [[], positive]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"none": [[-1, -2], positive]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"none": [[-1, 2], positive]})), Value::Bool(false));
    assert_eq!(eval_ok(json!({"some": [[-1, 2], positive]})), Value::Bool(true));
    assert_eq!(eval_ok(json!({"some": [[], positive]})), Value::Bool(false));
}

#[test]
fn test_scans_treat_null_as_empty() {
    let data = json!({});
    let pred = json!({"==": [{"var": ""}, 1]});
    assert_eq!(eval_with(json!({"some": [{"var": "missing"}, pred]}), data.clone()), Ok(Value::Bool(false)));
    assert_eq!(eval_with(json!({"none": [{"var": "missing"}, pred]}), data), Ok(Value::Bool(true)));
}

#[test]
fn test_some_stops_at_first_match() {
    let (result, log) = eval_logged(json!({"some": [[1, 2, 3], {"log": {"var": ""}}]}));
    assert_eq!(result, Value::Bool(true));
    assert_eq!(log, "1\n");
}

// Variables

#[test]
fn test_var_lookup() {
    let data = json!({"a": 1, "b": {"c": "deep"}, "list": [10, 20]});
    assert_eq!(eval_with(json!({"var": "a"}), data.clone()), Ok(Value::Int(1)));
    assert_eq!(eval_with(json!({"var": "b.c"}), data.clone()), Ok(Value::from("deep")));
    assert_eq!(eval_with(json!({"var": "list.1"}), data.clone()), Ok(Value::Int(20)));
    assert_eq!(eval_with(json!({"var": "missing"}), data.clone()), Ok(Value::Null));
    assert_eq!(eval_with(json!({"var": "b.missing"}), data), Ok(Value::Null));
}

#[test]
fn test_var_literal_dotted_key_wins() {
    let data = json!({"a.b": "flat", "a": {"b": "nested"}});
    assert_eq!(eval_with(json!({"var": "a.b"}), data), Ok(Value::from("flat")));
}

#[test]
fn test_var_numeric_name_indexes_array() {
    assert_eq!(eval_with(json!({"var": 1}), json!(["x", "y"])), Ok(Value::from("y")));
}

#[test]
fn test_var_computed_name() {
    let rule = json!({"var": {"cat": ["user_", {"var": "which"}]}});
    let data = json!({"which": "b", "user_a": 1, "user_b": 2});
    assert_eq!(eval_with(rule, data), Ok(Value::Int(2)));
}

#[test]
fn test_var_null_name_is_whole_record() {
    let data = json!({"a": 1});
    assert_eq!(eval_with(json!({"var": null}), data.clone()), Ok(Value::from(data.clone())));
    assert_eq!(eval_with(json!({"var": [null]}), data.clone()), Ok(Value::from(data)));

    let rule = Rule::translate(&json!({"var": null})).unwrap();
    assert!(!rule.has_computed_names());
    assert!(rule.free_variables().is_empty());
}

#[test]
fn test_var_name_must_have_text_form() {
    assert!(matches!(eval(json!({"var": [[1]]})), Err(EvalError::Type { op: "var", .. })));
}

#[test]
fn test_closure_bindings_receive_slots() {
    let rule = Rule::translate(&json!({"+": [{"var": "a"}, {"var": "b"}, {"var": "a"}]})).unwrap();
    let lookup = |name: &str, slot: Option<usize>| -> Option<Value> {
        match (name, slot) {
            ("a", Some(0)) => Some(Value::Int(10)),
            ("b", Some(1)) => Some(Value::Int(1)),
            _ => None,
        }
    };
    assert_eq!(rule.evaluate(&lookup), Ok(Value::Int(21)));
}

#[test]
fn test_closure_bindings_see_unresolved_slot() {
    let rule = Rule::translate(&json!({"var": {"cat": ["x"]}})).unwrap();
    let lookup = |name: &str, slot: Option<usize>| -> Option<Value> {
        assert_eq!(slot, None);
        Some(Value::from(name))
    };
    assert_eq!(rule.evaluate(&lookup), Ok(Value::from("x")));
}

#[test]
fn test_positional_bindings() {
    let rule = Rule::translate(&json!({"and": [
        {">": [{"var": "age"}, 17]},
        {"==": [{"var": "country"}, "NZ"]}
    ]}))
    .unwrap();
    let row = [Value::Int(30), Value::from("NZ")];
    let bindings = Positional::new(rule.free_variables(), &row);
    assert_eq!(rule.evaluate(&bindings), Ok(Value::Bool(true)));

    let row = [Value::Int(12), Value::from("NZ")];
    let bindings = Positional::new(rule.free_variables(), &row);
    assert_eq!(rule.evaluate(&bindings), Ok(Value::Bool(false)));
}

#[test]
fn test_positional_falls_back_to_name_search() {
    let names = vec!["a".to_string(), "b".to_string()];
    let values = [Value::Int(1), Value::Int(2)];
    let bindings = Positional::new(&names, &values);
    assert_eq!(bindings.lookup("b", None), Some(Value::Int(2)));
    assert_eq!(bindings.lookup("zzz", None), None);
}

// Log sink

#[test]
fn test_log_returns_operand_and_writes_json() {
    let (result, log) = eval_logged(json!({"log": "apple"}));
    assert_eq!(result, Value::from("apple"));
    assert_eq!(log, "\"apple\"\n");

    let (result, log) = eval_logged(json!({"log": [[1, 2.0]]}));
    assert_eq!(result, array(vec![Value::Int(1), Value::Double(2.0)]));
    assert_eq!(log, "[1,2.0]\n");
}

#[test]
fn test_evaluator_is_reusable_across_records() {
    let rule = Rule::translate(&json!({"log": {"var": "n"}})).unwrap();
    let mut evaluator = Evaluator::with_log(Vec::new());
    for n in 1..=3 {
        let data = Value::from(json!({ "n": n }));
        let result = evaluator.evaluate(rule.root(), &Record::new(&data)).unwrap();
        assert_eq!(result, Value::Int(n));
    }
    assert_eq!(String::from_utf8(evaluator.into_log()).unwrap(), "1\n2\n3\n");
}

#[test]
fn test_failing_log_sink_does_not_fail_evaluation() {
    struct Broken;

    impl std::io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let rule = Rule::translate(&json!({"log": 1})).unwrap();
    let mut evaluator = Evaluator::with_log(Broken);
    assert_eq!(evaluator.evaluate(rule.root(), &Record::new(&Value::Null)), Ok(Value::Int(1)));
}

#[test]
fn test_free_function_evaluate() {
    let rule = Rule::translate(&json!({"+": [1, 1]})).unwrap();
    let data = Value::Null;
    assert_eq!(jsonlogic_engine::evaluate(rule.root(), &Record::new(&data)), Ok(Value::Int(2)));
}
