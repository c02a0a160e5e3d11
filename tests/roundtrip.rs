use livesource::{
    date,
    diagnostics::DiagnosticKind,
    parser::parse_expression_at,
    reify::reify,
    serializer::NoSelectors,
    value::{ErrorKind, ObjectClass, Value},
    LiveSourceError, SelectorRegistry, Serializer, Session, SessionConfig,
};

fn render(value: &Value) -> String {
    Serializer::new(&NoSelectors)
        .to_source(value)
        .expect("value renders")
}

fn read_back(source: &str) -> Value {
    let expr = parse_expression_at(source, 0).expect("rendered text parses");
    reify(source, &expr, &SelectorRegistry::new()).expect("rendered text reifies")
}

fn roundtrip(value: &Value) -> Value {
    read_back(&render(value))
}

#[test]
fn numbers_survive_a_round_trip() {
    let numbers = [
        0.0,
        -0.0,
        1.5,
        -42.0,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        1e21,
        1e-7,
        0.1 + 0.2,
        f64::MAX,
        f64::MIN_POSITIVE,
        5e-324,
    ];
    for n in numbers {
        let back = roundtrip(&Value::Number(n));
        assert!(
            back.same_value(&Value::Number(n)),
            "{n} came back as {back:?}"
        );
    }
}

#[test]
fn strings_survive_a_round_trip() {
    for text in ["", "plain", "quote \" and ' mixed", "line\nbreak\ttab", "\u{1}\u{1F600}", "back\\slash"] {
        let back = roundtrip(&Value::string(text));
        assert!(matches!(back, Value::String(ref s) if &**s == text), "{text:?}");
    }
}

#[test]
fn arrays_keep_their_holes() {
    let value = Value::sparse_array(vec![
        Some(Value::Number(1.0)),
        None,
        Some(Value::string("x")),
        None,
    ]);
    let back = roundtrip(&value);
    let object = back.as_object().expect("array object");
    let ObjectClass::Array(elements) = &object.borrow().class else {
        panic!("expected array");
    };
    assert_eq!(elements.len(), 4);
    assert!(elements[1].is_none());
    assert!(elements[3].is_none());
    assert_eq!(render(&back), render(&value));
}

#[test]
fn definitions_render_identically_after_a_round_trip() {
    let values = [
        Value::regexp("a[/]b", "g"),
        Value::regexp("", ""),
        Value::date(1_500_000_000_123.0),
        Value::date(f64::NAN),
        Value::function("function add(a, b) { return a + b; }"),
        Value::error(ErrorKind::TypeError, Some(Value::string("bad"))),
        Value::error(ErrorKind::RangeError, None),
        Value::array(vec![Value::Bool(true), Value::Null, Value::Undefined]),
    ];
    for value in values {
        let text = render(&value);
        assert_eq!(render(&read_back(&text)), text);
    }
}

fn time_of(value: &Value) -> f64 {
    match value.as_object().map(|object| object.borrow().class.clone()) {
        Some(ObjectClass::Date { time }) => time,
        _ => panic!("expected a date, got {value:?}"),
    }
}

#[test]
fn dates_round_trip_across_the_whole_valid_range() {
    let cases = [
        (8.64e15, "Date('+275760-09-13T00:00:00.000Z')"),
        (-8.64e15, "Date('-271821-04-20T00:00:00.000Z')"),
        (253_402_300_800_000.0, "Date('+010000-01-01T00:00:00.000Z')"),
        (-62_198_755_200_000.0, "Date('-000001-01-01T00:00:00.000Z')"),
    ];
    for (time, text) in cases {
        let value = Value::date(time);
        assert_eq!(render(&value), text);
        assert_eq!(time_of(&read_back(text)), time, "{text}");
    }

    assert_eq!(render(&Value::date(8.64e15 + 1.0)), "Date('null')");
    assert_eq!(date::parse_json_text("+275760-09-13T00:00:00.001Z"), None);
    assert_eq!(date::parse_json_text("+002020-02-30T00:00:00.000Z"), None);
}

#[test]
fn session_names_objects_by_history() {
    let mut session = Session::new();
    assert_eq!(session.inspect("{a: 1}").expect("object inspects"), "$1");
    assert_eq!(session.inspect("$1").expect("binding inspects"), "$1");
    assert_eq!(session.registry().len(), 1);

    assert_eq!(session.inspect("[$1]").expect("array inspects"), "[$1]");
    assert_eq!(session.registry().len(), 2);

    // The second `$1` is already visited, so the array is named instead.
    assert_eq!(session.inspect("[$1, $1]").expect("array inspects"), "$3");
    assert_eq!(session.registry().len(), 3);
}

#[test]
fn session_renders_primitives_literally() {
    let mut session = Session::new();
    assert_eq!(session.inspect("-0").expect("negative zero"), "-0");
    assert_eq!(session.inspect("'hi'").expect("string"), "\"hi\"");
    assert_eq!(session.inspect("0x10").expect("hex"), "16");
    assert_eq!(
        session.inspect("new TypeError('boom')").expect("error"),
        "TypeError(\"boom\")"
    );
    assert_eq!(
        session
            .inspect("Date('2017-07-14T02:40:00.123Z')")
            .expect("date"),
        "Date('2017-07-14T02:40:00.123Z')"
    );
}

#[test]
fn session_binds_symbols() {
    let mut session = Session::new();
    assert_eq!(session.inspect("Symbol('x')").expect("symbol"), "$1");
    let bound = session.registry().lookup("$1").expect("symbol bound");
    assert!(matches!(bound, Value::Symbol(symbol) if symbol.description() == Some("x")));
}

#[test]
fn session_uses_configured_prefix() {
    let mut session = Session::with_config(SessionConfig {
        history_prefix: "_".to_string(),
        ..SessionConfig::default()
    });
    assert_eq!(session.inspect("{}").expect("object"), "_1");
    assert_eq!(session.inspect("_1").expect("binding"), "_1");
}

#[test]
fn session_reports_errors() {
    let mut session = Session::new();

    let err = session.inspect("1; 2").unwrap_err();
    assert!(err.is_syntax());

    match session.inspect("foo").unwrap_err() {
        LiveSourceError::Diagnostic(diag) => {
            assert_eq!(diag.kind, DiagnosticKind::Evaluate);
            assert_eq!(diag.message, "`foo` is not bound");
        }
        other => panic!("unexpected error {other:?}"),
    }

    match session.inspect("1 + 2").unwrap_err() {
        LiveSourceError::Diagnostic(diag) => assert_eq!(diag.kind, DiagnosticKind::Evaluate),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(session.registry().is_empty());
}

#[test]
fn registry_resolves_first_binding_and_forgets_unbound_paths() {
    let target = Value::object();
    let mut registry = SelectorRegistry::new();
    registry.bind("app.config", target.clone());
    registry.bind("alias", target.clone());
    registry.bind("count", Value::Number(1.0));

    let serializer = Serializer::new(&registry);
    assert_eq!(serializer.to_source(&target).expect("bound"), "app.config");
    assert_eq!(serializer.to_source(&Value::Number(1.0)).expect("primitive"), "1");

    let back = reify(
        "app.config",
        &parse_expression_at("app.config", 0).expect("path parses"),
        &registry,
    )
    .expect("path resolves");
    assert!(back.same_value(&target));

    assert!(registry.unbind("app.config").is_some());
    assert_eq!(
        Serializer::new(&registry).to_source(&target).expect("alias"),
        "alias"
    );
    assert_eq!(registry.len(), 2);
}
