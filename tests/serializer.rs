use livesource::{
    kind::Kind,
    number::number_to_source,
    serializer::{NoSelectors, SeenSet, Serializer, SerializerConfig},
    value::{ErrorKind, Intrinsic, ObjectClass, ObjectRef, Prototype, Value},
    LiveSourceError, SelectorRegistry,
};

fn source(value: &Value) -> String {
    Serializer::new(&NoSelectors)
        .to_source(value)
        .expect("value should serialize")
}

fn push_element(array: &Value, element: Value) {
    let object = array.as_object().expect("array is an object");
    if let ObjectClass::Array(elements) = &mut object.borrow_mut().class {
        elements.push(Some(element));
    }
}

#[test]
fn renders_primitive_literals() {
    assert_eq!(source(&Value::Undefined), "undefined");
    assert_eq!(source(&Value::Null), "null");
    assert_eq!(source(&Value::Bool(true)), "true");
    assert_eq!(source(&Value::Number(42.0)), "42");
    assert_eq!(source(&Value::Number(-0.0)), "-0");
    assert_eq!(source(&Value::Number(0.0)), "0");
    assert_eq!(source(&Value::Number(f64::NAN)), "NaN");
    assert_eq!(source(&Value::Number(f64::NEG_INFINITY)), "-Infinity");
}

#[test]
fn formats_numbers_like_the_language() {
    let cases = [
        (0.1, "0.1"),
        (100.0, "100"),
        (123.456, "123.456"),
        (-1.5, "-1.5"),
        (0.000001, "0.000001"),
        (1e-7, "1e-7"),
        (1.5e-7, "1.5e-7"),
        (1e21, "1e+21"),
        (123456789012345680000.0, "123456789012345680000"),
        (f64::MAX, "1.7976931348623157e+308"),
        (5e-324, "5e-324"),
    ];
    for (value, expected) in cases {
        assert_eq!(number_to_source(value), expected, "formatting {value:e}");
    }
}

#[test]
fn quotes_and_escapes_strings() {
    assert_eq!(source(&Value::string("abc")), "\"abc\"");
    assert_eq!(
        source(&Value::string("say \"hi\"\n\tand \\ leave")),
        r#""say \"hi\"\n\tand \\ leave""#
    );
    assert_eq!(source(&Value::string("\u{1}")), "\"\\u0001\"");
    assert_eq!(source(&Value::string("snow ☃")), "\"snow ☃\"");
}

#[test]
fn functions_render_their_definition_text() {
    let text = "function add(a, b) {\n  return a + b;  // sum\n}";
    assert_eq!(source(&Value::function(text)), text);
    assert_eq!(
        source(&Value::native_function("parseInt")),
        "function parseInt() { [native code] }"
    );
}

#[test]
fn renders_regexps_and_dates() {
    assert_eq!(source(&Value::regexp("a+b", "gi")), "/a+b/gi");
    assert_eq!(source(&Value::regexp("", "")), "/(?:)/");
    assert_eq!(
        source(&Value::date(0.0)),
        "Date('1970-01-01T00:00:00.000Z')"
    );
    assert_eq!(
        source(&Value::date(1_500_000_000_123.0)),
        "Date('2017-07-14T02:40:00.123Z')"
    );
    assert_eq!(source(&Value::date(f64::NAN)), "Date('null')");
}

#[test]
fn renders_arrays_with_holes() {
    let numbers = Value::array(vec![Value::Number(1.0), Value::string("two")]);
    assert_eq!(source(&numbers), "[1, \"two\"]");
    let sparse = Value::sparse_array(vec![
        Some(Value::Number(1.0)),
        None,
        Some(Value::Number(3.0)),
    ]);
    assert_eq!(source(&sparse), "[1, , 3]");
    let trailing = Value::sparse_array(vec![Some(Value::Number(1.0)), None]);
    assert_eq!(source(&trailing), "[1, ,]");
    assert_eq!(source(&Value::sparse_array(vec![None])), "[,]");
    assert_eq!(source(&Value::array(Vec::new())), "[]");
    let nested = Value::array(vec![numbers, Value::Null]);
    assert_eq!(source(&nested), "[[1, \"two\"], null]");
}

#[test]
fn long_arrays_fall_back_to_selectors() {
    let long = Value::array(vec![Value::Number(0.0); 101]);
    let exact = Value::array(vec![Value::Number(0.0); 100]);
    let mut registry = SelectorRegistry::new();
    registry.bind("$.long", long.clone());
    let serializer = Serializer::new(&registry);
    assert_eq!(serializer.to_source(&long).unwrap(), "$.long");
    assert!(serializer.to_source(&exact).unwrap().starts_with("[0, 0"));

    let strict = Serializer::new(&registry).with_config(SerializerConfig { max_array_len: 2 });
    let short = Value::array(vec![Value::Number(1.0); 3]);
    assert!(matches!(
        strict.to_source(&short),
        Err(LiveSourceError::NoSelector { kind: "object" })
    ));
}

#[test]
fn cyclic_arrays_fall_back_to_selectors() {
    let looped = Value::array(vec![Value::Number(1.0)]);
    push_element(&looped, looped.clone());

    let mut registry = SelectorRegistry::new();
    registry.bind("$.loop", looped.clone());
    assert_eq!(Serializer::new(&registry).to_source(&looped).unwrap(), "$.loop");

    let err = Serializer::new(&NoSelectors).to_source(&looped).unwrap_err();
    assert!(matches!(err, LiveSourceError::NoSelector { kind: "object" }));
}

#[test]
fn inner_cycle_only_replaces_the_inner_array() {
    let outer = Value::array(Vec::new());
    let inner = Value::array(vec![Value::Number(2.0)]);
    push_element(&inner, outer.clone());
    push_element(&outer, Value::Number(1.0));
    push_element(&outer, inner.clone());

    let mut registry = SelectorRegistry::new();
    registry.bind("$.inner", inner);
    let text = Serializer::new(&registry).to_source(&outer).unwrap();
    assert_eq!(text, "[1, $.inner]");
}

#[test]
fn shared_elements_send_the_array_to_its_selector() {
    let day = Value::date(0.0);
    let pair = Value::array(vec![day.clone(), day.clone()]);
    let mut registry = SelectorRegistry::new();
    registry.bind("$.pair", pair.clone());
    let serializer = Serializer::new(&registry);

    let mut seen = SeenSet::new();
    assert_eq!(serializer.to_source_with(&pair, &mut seen).unwrap(), "$.pair");
    assert_eq!(seen.len(), 2);

    let err = Serializer::new(&NoSelectors).to_source(&pair).unwrap_err();
    assert!(matches!(err, LiveSourceError::NoSelector { kind: "object" }));
}

#[test]
fn visited_values_stay_registered_for_the_whole_call() {
    let day = Value::date(0.0);
    let serializer = Serializer::new(&NoSelectors);
    let mut seen = SeenSet::new();
    assert_eq!(
        serializer.to_source_with(&day, &mut seen).unwrap(),
        "Date('1970-01-01T00:00:00.000Z')"
    );
    assert!(seen.contains(day.as_object().unwrap()));
    let err = serializer.to_source_with(&day, &mut seen).unwrap_err();
    assert!(matches!(err, LiveSourceError::Recursion));
}

#[test]
fn self_referential_object_terminates() {
    let object = Value::object();
    object.as_object().unwrap().set("self", object.clone());
    let mut registry = SelectorRegistry::new();
    registry.bind("$.a", object.clone());
    assert_eq!(Serializer::new(&registry).to_source(&object).unwrap(), "$.a");
    assert!(Serializer::new(&NoSelectors).to_source(&object).is_err());
}

#[test]
fn renders_known_error_kinds() {
    let err = Value::error(ErrorKind::TypeError, Some(Value::string("bad")));
    assert_eq!(source(&err), "TypeError(\"bad\")");
    let uri = Value::error(ErrorKind::UriError, Some(Value::string("%")));
    assert_eq!(source(&uri), "URIError(\"%\")");
    let plain = Value::error(ErrorKind::Error, None);
    assert_eq!(source(&plain), "Error(\"\")");
    let undefined = Value::error(ErrorKind::RangeError, Some(Value::Undefined));
    assert_eq!(source(&undefined), "RangeError()");
    let denied = Value::error(
        ErrorKind::PermissionError,
        Some(Value::array(vec![Value::Number(1.0)])),
    );
    assert_eq!(source(&denied), "PermissionError([1])");
}

#[test]
fn errors_without_source_form_use_selectors() {
    let looped = Value::error(ErrorKind::EvalError, None);
    looped.as_object().unwrap().set("message", looped.clone());

    let custom_proto = ObjectRef::new(
        Prototype::Intrinsic(Intrinsic::ErrorPrototype(ErrorKind::Error)),
        ObjectClass::Ordinary,
    );
    let custom = Value::Object(ObjectRef::new(
        Prototype::Object(custom_proto),
        ObjectClass::Error,
    ));
    assert_eq!(Kind::of(&custom), Kind::Error(None));

    let mut registry = SelectorRegistry::new();
    registry.bind("$.looped", looped.clone());
    registry.bind("$.custom", custom.clone());
    let serializer = Serializer::new(&registry);
    assert_eq!(serializer.to_source(&looped).unwrap(), "$.looped");
    assert_eq!(serializer.to_source(&custom).unwrap(), "$.custom");
}

#[test]
fn classifies_by_prototype_and_slots() {
    assert_eq!(Kind::of(&Value::Null), Kind::Absent);
    assert_eq!(Kind::of(&Value::function("function () {}")), Kind::Function);
    assert_eq!(Kind::of(&Value::regexp("x", "")), Kind::RegExp);
    assert_eq!(Kind::of(&Value::array(Vec::new())), Kind::Array);
    assert_eq!(Kind::of(&Value::object()), Kind::Object);
    assert_eq!(
        Kind::of(&Value::error(ErrorKind::SyntaxError, None)),
        Kind::Error(Some(ErrorKind::SyntaxError))
    );

    // A regexp slot behind an ordinary prototype is not a regexp.
    let disguised = Value::Object(ObjectRef::new(
        Prototype::Intrinsic(Intrinsic::ObjectPrototype),
        ObjectClass::RegExp {
            pattern: "x".into(),
            flags: String::new(),
        },
    ));
    assert_eq!(Kind::of(&disguised), Kind::Object);
}

#[test]
fn symbols_and_objects_need_selectors() {
    let symbol = Value::symbol(Some("tag"));
    let object = Value::object();
    let serializer = Serializer::new(&NoSelectors);

    let err = serializer.to_source(&symbol).unwrap_err();
    assert_eq!(err.to_string(), "[symbol with no known selector]");
    let err = serializer.to_source(&object).unwrap_err();
    assert_eq!(err.to_string(), "[object with no known selector]");

    let by_closure = |value: &Value| match value {
        Value::Symbol(_) => Some("Symbol.iterator".to_string()),
        _ => None,
    };
    assert_eq!(
        Serializer::new(&by_closure).to_source(&symbol).unwrap(),
        "Symbol.iterator"
    );
}

#[test]
fn empty_selectors_count_as_missing() {
    let empty = |_: &Value| Some(String::new());
    let err = Serializer::new(&empty).to_source(&Value::object()).unwrap_err();
    assert!(matches!(err, LiveSourceError::NoSelector { .. }));
}

#[test]
fn safe_serialization_reports_missing_selectors_as_text() {
    let serializer = Serializer::new(&NoSelectors);
    assert_eq!(
        serializer.to_source_safe(&Value::object()).unwrap(),
        "[object with no known selector]"
    );
    assert_eq!(serializer.to_source_safe(&Value::Number(1.0)).unwrap(), "1");
}

#[test]
fn seen_set_is_fresh_for_each_call() {
    let shared = Value::array(vec![Value::Number(1.0)]);
    let serializer = Serializer::new(&NoSelectors);
    assert_eq!(serializer.to_source(&shared).unwrap(), "[1]");
    assert_eq!(serializer.to_source(&shared).unwrap(), "[1]");
}
