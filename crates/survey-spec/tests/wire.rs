use serde_json::json;

use survey_spec::{
    AnswerError, AnswerRecord, deserialize, normalize, sanitize_value, serialize, serialize_value,
    set_value,
};

fn question(id: &str, kind: &str) -> survey_spec::QuestionSpec {
    normalize(&json!({ "id": id, "type": kind }))
}

fn valid_record_value() -> serde_json::Value {
    json!({
        "uid": "test",
        "text": "",
        "value": 0,
        "lat": 0,
        "lon": 0,
        "time_begin": 0,
        "time_end": 0,
        "time_zone_delta": 0,
        "dst_delta": 0,
    })
}

#[test]
fn blank_record_serializes_to_defaults() {
    let row = serialize(&AnswerRecord::with_uid("test")).unwrap();
    assert_eq!(row, "test::0:0:0:0:0:0:0");
}

#[test]
fn uid_is_required() {
    assert!(matches!(
        serialize(&AnswerRecord::default()),
        Err(AnswerError::EmptyRequired(_))
    ));

    let mut loose = valid_record_value();
    loose["uid"] = serde_json::Value::Null;
    assert!(serialize_value(&loose).is_err());

    loose["uid"] = json!("test");
    assert_eq!(serialize_value(&loose).unwrap(), "test::0:0:0:0:0:0:0");
}

#[test]
fn record_shape_is_closed() {
    let mut extra = valid_record_value();
    extra["additional_property"] = json!(true);
    assert!(matches!(
        serialize_value(&extra),
        Err(AnswerError::ShapeMismatch(_))
    ));

    let mut missing = valid_record_value();
    missing.as_object_mut().unwrap().remove("dst_delta");
    assert!(matches!(
        serialize_value(&missing),
        Err(AnswerError::ShapeMismatch(_))
    ));

    assert!(matches!(
        serialize_value(&json!("not an object")),
        Err(AnswerError::ShapeMismatch(_))
    ));
}

#[test]
fn answered_questions_serialize_in_field_order() {
    let answer = set_value(&question("int", "INT"), &json!(2)).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "int::2:0:0:0:0:0:0");

    let answer = set_value(&question("fixedpoint", "FIXEDPOINT"), &json!(0.2)).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "fixedpoint::0.2:0:0:0:0:0:0");

    let answer = set_value(&question("multichoice", "MULTICHOICE"), &json!(["A", "B"])).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "multichoice:A,B:0:0:0:0:0:0:0");

    let answer = set_value(&question("latlon", "LATLON"), &json!([2, 3])).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "latlon::0:2:3:0:0:0:0");

    let answer = set_value(&question("datetime", "DATETIME"), &json!(2)).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "datetime::0:0:0:2:0:0:0");

    let answer = set_value(&question("timerange", "TIMERANGE"), &json!([1, 2])).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "timerange::0:0:0:1:2:0:0");

    let answer = set_value(&question("text", "TEXT"), &json!("T")).unwrap();
    assert_eq!(serialize(&answer).unwrap(), "text:T:0:0:0:0:0:0:0");
}

#[test]
fn sanitize_escapes_reserved_characters() {
    assert_eq!(sanitize_value("  padded  "), "padded");
    assert_eq!(sanitize_value("a:b"), "a\\:b");
    assert_eq!(sanitize_value("it's"), "it\\'s");
    assert_eq!(sanitize_value("say \"hi\""), "say \\\"hi\\\"");
    assert_eq!(sanitize_value("line\r\nbreak"), "line break");
    assert_eq!(sanitize_value("line\nbreak"), "line break");
    assert_eq!(sanitize_value("line\rbreak"), "line break");
}

#[test]
fn embedded_colons_survive_a_round_trip() {
    let answer = set_value(&question("test", "TEXT"), &json!("my answer is: test")).unwrap();
    let row = serialize(&answer).unwrap();
    assert_eq!(row, "test:my answer is\\: test:0:0:0:0:0:0:0");

    let decoded = deserialize(&row).unwrap();
    assert_eq!(decoded.text, "my answer is: test");
    assert_eq!(decoded, answer);
}

#[test]
fn escaped_colons_are_not_field_boundaries() {
    let decoded = deserialize("test:my answer is\\: test:0:0:0:0:0:0:0").unwrap();
    assert_eq!(
        decoded,
        AnswerRecord {
            uid: "test".into(),
            text: "my answer is: test".into(),
            ..AnswerRecord::default()
        }
    );
}

#[test]
fn round_trip_preserves_every_field() {
    let record = AnswerRecord {
        uid: "q1".into(),
        text: "hello world".into(),
        value: 1.5,
        lat: -10.25,
        lon: 20.0,
        time_begin: 3,
        time_end: 86400,
        time_zone_delta: -3600,
        dst_delta: 3600,
    };
    let row = serialize(&record).unwrap();
    assert_eq!(deserialize(&row).unwrap(), record);
}

#[test]
fn round_trip_through_the_dispatcher() {
    let cases = [
        (question("int", "INT"), json!(42)),
        (question("seq", "DAYTIME_SEQUENCE"), json!([60, 120, 120])),
        (question("multi", "MULTISELECT"), json!(["A", "B"])),
        (question("geo", "LATLON"), json!([-45.5, 170.25])),
        (question("range", "TIMERANGE"), json!([0, 5])),
        (question("quoted", "TEXT"), json!("it's \"quoted\": fine")),
    ];
    for (q, raw) in cases {
        let answer = set_value(&q, &raw).unwrap();
        let row = serialize(&answer).unwrap();
        assert_eq!(deserialize(&row).unwrap(), answer, "row {row}");
    }
}

#[test]
fn deserialize_requires_exactly_nine_fields() {
    assert!(matches!(
        deserialize("test:short"),
        Err(AnswerError::ShapeMismatch(_))
    ));
    assert!(matches!(
        deserialize("test::0:0:0:0:0:0:0:extra"),
        Err(AnswerError::ShapeMismatch(_))
    ));
    assert!(matches!(deserialize(""), Err(AnswerError::ShapeMismatch(_))));
}

#[test]
fn deserialize_requires_a_uid() {
    assert!(matches!(
        deserialize(":text:0:0:0:0:0:0:0"),
        Err(AnswerError::EmptyRequired(_))
    ));
}

#[test]
fn deserialize_rejects_malformed_numeric_fields() {
    assert!(matches!(
        deserialize("test::x:0:0:0:0:0:0"),
        Err(AnswerError::InvalidType(_))
    ));
    assert!(matches!(
        deserialize("test::0:95:0:0:0:0:0"),
        Err(AnswerError::OutOfRange(_))
    ));
    assert!(matches!(
        deserialize("test::0:0:190:0:0:0:0"),
        Err(AnswerError::OutOfRange(_))
    ));
    assert!(matches!(
        deserialize("test::0:0:0:-5:0:0:0"),
        Err(AnswerError::OutOfRange(_))
    ));
    assert!(matches!(
        deserialize("test::0:0:0:0:0:0.5:0"),
        Err(AnswerError::InvalidType(_))
    ));
}

#[test]
fn deserialize_allows_negative_zone_deltas() {
    let decoded = deserialize("test::0:0:0:0:0:-3600:0").unwrap();
    assert_eq!(decoded.time_zone_delta, -3600);
}
