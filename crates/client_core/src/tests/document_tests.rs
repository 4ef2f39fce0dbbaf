use super::*;

#[test]
fn legacy_single_day_payload_becomes_one_day() {
    let raw = r#"{
        "tripTitle": "3 Days in Kyoto",
        "dateDisplay": "Oct 12 - Oct 14",
        "dayHeader": "Day 1",
        "daySubHeader": "Traditional Kyoto",
        "dateShort": "OCT 12",
        "mapPins": [
            { "id": 1, "name": "Kinkaku-ji", "lng": 135.729243, "lat": 35.03937 }
        ],
        "timeline": [
            { "time": "09:30 AM", "title": "Kinkaku-ji", "pinId": 1 }
        ]
    }"#;

    let itinerary = parse_itinerary(raw).expect("parse");

    assert_eq!(itinerary.title, "3 Days in Kyoto");
    assert_eq!(itinerary.day_count(), 1);
    let day = &itinerary.days[0];
    assert_eq!(day.header, "Day 1");
    assert_eq!(day.subtitle, "Traditional Kyoto");
    assert_eq!(day.date_label, "OCT 12");
    assert_eq!(day.pins[0].id, Some(PinId::new("1")));
    assert_eq!(
        day.pins[0].coordinate,
        Some(Coordinate::new(135.729243, 35.03937))
    );
    assert_eq!(day.timeline[0].pin_ref, Some(PinId::new("1")));
}

#[test]
fn empty_days_array_falls_back_to_top_level_day() {
    let raw = r#"{ "days": [], "timeline": [ { "title": "Arrive" } ] }"#;
    let itinerary = parse_itinerary(raw).expect("parse");
    assert_eq!(itinerary.day_count(), 1);
    assert_eq!(itinerary.days[0].header, "Day 1");
    assert_eq!(itinerary.days[0].timeline[0].title, "Arrive");
}

#[test]
fn multi_day_payload_defaults_missing_headers() {
    let raw = r#"{
        "days": [
            { "dayHeader": "Arrival", "mapPins": [] },
            { "mapPins": null, "timeline": null }
        ]
    }"#;
    let itinerary = parse_itinerary(raw).expect("parse");
    assert_eq!(itinerary.days[0].header, "Arrival");
    assert_eq!(itinerary.days[1].header, "Day 2");
    assert!(itinerary.days[1].pins.is_empty());
}

#[test]
fn sequence_accepts_positive_whole_numbers_only() {
    let raw = r#"{
        "mapPins": [
            { "id": "a", "seq": 3 },
            { "id": "b", "seq": "2" },
            { "id": "c", "seq": 0 },
            { "id": "d", "seq": -1 },
            { "id": "e", "seq": 1.5 },
            { "id": "f", "seq": "soon" },
            { "id": "g" }
        ]
    }"#;
    let itinerary = parse_itinerary(raw).expect("parse");
    let sequences: Vec<Option<u32>> = itinerary.days[0]
        .pins
        .iter()
        .map(|pin| pin.sequence)
        .collect();
    assert_eq!(
        sequences,
        vec![Some(3), Some(2), None, None, None, None, None]
    );
}

#[test]
fn pin_reference_aliases_follow_precedence() {
    let raw = r#"{
        "timeline": [
            { "title": "a", "mapPinId": 7 },
            { "title": "b", "pin_id": "x" },
            { "title": "c", "pinId": 2, "mapPinId": 9 },
            { "title": "d", "pinId": "" }
        ]
    }"#;
    let itinerary = parse_itinerary(raw).expect("parse");
    let refs: Vec<Option<PinId>> = itinerary.days[0]
        .timeline
        .iter()
        .map(|event| event.pin_ref.clone())
        .collect();
    assert_eq!(
        refs,
        vec![
            Some(PinId::new("7")),
            Some(PinId::new("x")),
            Some(PinId::new("2")),
            None
        ]
    );
}

#[test]
fn zero_and_textual_coordinates_are_coerced() {
    let raw = r#"{
        "mapPins": [
            { "id": 1, "lng": 0, "lat": 35.0 },
            { "id": 2, "lng": "135.77", "lat": "34.96" },
            { "id": 3 }
        ]
    }"#;
    let itinerary = parse_itinerary(raw).expect("parse");
    let pins = &itinerary.days[0].pins;
    assert_eq!(pins[0].coordinate, None);
    assert_eq!(pins[1].coordinate, Some(Coordinate::new(135.77, 34.96)));
    assert_eq!(pins[2].coordinate, None);
}

#[test]
fn tags_accept_structured_and_bare_forms() {
    let raw = r#"{
        "timeline": [
            {
                "title": "Lunch",
                "isExtra": true,
                "tags": [
                    { "label": "Dining", "color": "purple" },
                    { "label": "Popular", "color": "teal" },
                    "Walk",
                    { "color": "red" }
                ]
            }
        ]
    }"#;
    let itinerary = parse_itinerary(raw).expect("parse");
    let event = &itinerary.days[0].timeline[0];
    assert!(event.is_extra);
    assert_eq!(
        event.tags,
        vec![
            EventTag {
                label: "Dining".into(),
                color: TagColor::Purple
            },
            EventTag {
                label: "Popular".into(),
                color: TagColor::Slate
            },
            EventTag {
                label: "Walk".into(),
                color: TagColor::Slate
            },
        ]
    );
}

#[test]
fn budget_prefers_range_and_accepts_legacy_array() {
    let ranged = parse_itinerary(
        r#"{ "budgetRange": { "min": 60000, "max": 70000, "currency": "$" }, "budget": [1, 2] }"#,
    )
    .expect("parse");
    assert_eq!(
        ranged.budget,
        Some(BudgetRange {
            min: 60000.0,
            max: 70000.0,
            currency: "$".into()
        })
    );

    let legacy = parse_itinerary(r#"{ "budget": [3000, 5000] }"#).expect("parse");
    assert_eq!(
        legacy.budget.map(|b| b.display()),
        Some("¥3,000 - 5,000".to_string())
    );

    let none = parse_itinerary(r#"{ "budget": [3000] }"#).expect("parse");
    assert!(none.budget.is_none());
}

#[test]
fn document_center_is_read_when_present() {
    let itinerary =
        parse_itinerary(r#"{ "mapCenter": { "lng": 135.7681, "lat": 35.0116 } }"#).expect("parse");
    assert_eq!(itinerary.map_center, Some(Coordinate::new(135.7681, 35.0116)));
}

#[test]
fn wrong_shapes_are_rejected() {
    assert!(matches!(
        parse_itinerary("not json"),
        Err(DocumentError::Malformed(_))
    ));
    assert!(parse_itinerary("[1, 2, 3]").is_err());
    assert!(parse_itinerary(r#"{ "tripTitle": 42 }"#).is_err());
}
