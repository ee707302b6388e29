use anyhow::Result;
use move_binary_data::utils::encoding::{decode_base64, encode_base64};
use move_binary_data::utils::path::{self, KeyPath};
use move_binary_data::{
    convert_batch, BinaryEntry, BinaryMap, BinaryPayload, Converted, Converter, ConverterSettings,
    ErrorPolicy, Record,
};
use serde_json::{json, Value};

fn sample_records() -> Vec<Record> {
    vec![
        Record::new(json!({"id": 1, "tags": ["a", "b"]}))
            .with_binary("data", BinaryPayload::new(encode_base64(b"{\"n\":1}"), "application/json"))
            .with_binary("thumb", BinaryPayload::new(encode_base64(&[0, 1, 2]), "image/png")),
        Record::new(json!({"id": 2, "nested": {"deep": {"x": null}}}))
            .with_binary("data", BinaryPayload::new(encode_base64(b"[true,false]"), "application/json")),
        Record::new(json!({"id": 3}))
            .with_binary("data", BinaryPayload::new(encode_base64("\"żółw\"".as_bytes()), "application/json")),
    ]
}

fn record_of(converted: Converted) -> Record {
    converted.into_record().expect("record should not be dropped")
}

/// Binary to JSON on a single key adds exactly the destination value and
/// removes exactly the source payload.
#[test]
fn test_partial_binary_to_json_adds_destination_and_removes_source() -> Result<()> {
    let settings = ConverterSettings {
        set_all_data: false,
        json_parse: true,
        destination_key: "decoded.payload".to_string(),
        ..ConverterSettings::binary_to_json()
    };
    let converter = Converter::from_settings(&settings)?;
    let destination = KeyPath::parse("decoded.payload");
    let source = KeyPath::parse("data");

    for input in sample_records() {
        let output = record_of(converter.convert(input.clone())?);

        let mut expected_structured = input.structured.clone();
        let payload = match path::get(&BinaryEntry::Group(input.binary.clone().unwrap()), &source) {
            Some(BinaryEntry::Payload(payload)) => payload.clone(),
            other => panic!("unexpected source entry {:?}", other),
        };
        let decoded: Value = serde_json::from_slice(&decode_base64(&payload.data)?)?;
        path::set(&mut expected_structured, &destination, decoded);
        assert_eq!(output.structured, expected_structured);

        let mut expected_binary = input.binary.clone().unwrap();
        expected_binary.remove("data");
        assert_eq!(output.binary, Some(expected_binary));
    }
    Ok(())
}

#[test]
fn test_round_trip_reproduces_original_value() -> Result<()> {
    let to_binary = Converter::from_settings(&ConverterSettings {
        convert_all_data: false,
        source_key: "doc".to_string(),
        destination_key: "doc".to_string(),
        keep_source: true,
        ..ConverterSettings::json_to_binary()
    })?;
    let to_json = Converter::from_settings(&ConverterSettings {
        set_all_data: false,
        json_parse: true,
        source_key: "doc".to_string(),
        destination_key: "restored".to_string(),
        keep_source: true,
        ..ConverterSettings::binary_to_json()
    })?;

    let originals = [
        json!({"title": "t", "items": [1, 2.5, null, {"k": "v"}], "flag": false}),
        json!("just a string with \"quotes\" and ünïcödé"),
        json!([]),
        json!(42),
    ];
    for original in originals {
        let record = Record::new(json!({"doc": original.clone(), "other": 1}));
        let encoded = record_of(to_binary.convert(record)?);
        assert_eq!(encoded.structured["doc"], original);

        let restored = record_of(to_json.convert(encoded)?);
        assert_eq!(restored.structured["restored"], original);
        assert_eq!(restored.structured["doc"], original);
        assert!(restored.binary.unwrap().contains_key("doc"));
    }
    Ok(())
}

#[test]
fn test_keep_source_flag_controls_removal() -> Result<()> {
    let input = Record::new(json!({"a": {"b": 1, "c": 2}, "d": 3}));
    for keep_source in [true, false] {
        let converter = Converter::from_settings(&ConverterSettings {
            convert_all_data: false,
            source_key: "a.b".to_string(),
            keep_source,
            ..ConverterSettings::json_to_binary()
        })?;
        let output = record_of(converter.convert(input.clone())?);
        if keep_source {
            assert_eq!(output.structured, input.structured);
        } else {
            assert_eq!(output.structured, json!({"a": {"c": 2}, "d": 3}));
        }
    }
    Ok(())
}

#[test]
fn test_dropped_records_shrink_batch_by_exact_count() -> Result<()> {
    let mut records = sample_records();
    records.insert(1, Record::new(json!({"id": "no binary"})));
    records.push(
        Record::new(json!({"id": "wrong key"}))
            .with_binary("other", BinaryPayload::new(encode_base64(b"{}"), "application/json")),
    );
    let input_len = records.len();

    let outcome = convert_batch(records, &ConverterSettings::binary_to_json(), ErrorPolicy::Halt)?;

    assert_eq!(outcome.dropped, vec![1, 4]);
    assert_eq!(outcome.records.len(), input_len - 2);
    let structured: Vec<Value> = outcome.records.into_iter().map(|r| r.structured).collect();
    assert_eq!(structured, vec![json!({"n": 1}), json!([true, false]), json!("żółw")]);
    Ok(())
}

#[test]
fn test_json_to_binary_whole_record_scenario() -> Result<()> {
    let record = Record {
        structured: json!({"a": 1}),
        binary: Some(BinaryMap::new()),
    };
    let outcome = convert_batch(vec![record], &ConverterSettings::json_to_binary(), ErrorPolicy::Halt)?;

    assert_eq!(
        serde_json::to_value(&outcome.records)?,
        json!([{
            "json": {},
            "binary": {"data": {"data": encode_base64(b"{\"a\":1}"), "mimeType": "application/json"}}
        }])
    );
    Ok(())
}

#[test]
fn test_binary_to_json_whole_record_scenario() -> Result<()> {
    let record: Record = serde_json::from_value(json!({
        "json": {},
        "binary": {"data": {"data": encode_base64(b"{\"x\":5}"), "mimeType": "application/json"}}
    }))?;
    let settings = ConverterSettings {
        encoding: "utf8".to_string(),
        ..ConverterSettings::binary_to_json()
    };
    let outcome = convert_batch(vec![record], &settings, ErrorPolicy::Halt)?;

    assert_eq!(serde_json::to_value(&outcome.records)?, json!([{"json": {"x": 5}, "binary": {}}]));
    Ok(())
}

#[test]
fn test_input_records_are_left_untouched_by_cloned_conversion() -> Result<()> {
    let records = sample_records();
    let snapshot = records.clone();
    let converter = Converter::from_settings(&ConverterSettings::binary_to_json())?;

    for record in &records {
        converter.convert(record.clone())?;
    }
    assert_eq!(records, snapshot);
    Ok(())
}
