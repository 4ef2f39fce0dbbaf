use shared::domain::{Coordinate, Day, MapPin, PinId, TimelineEvent};

use super::*;

fn pin(id: &str, name: &str, title: &str) -> MapPin {
    MapPin {
        id: Some(PinId::new(id)),
        name: name.into(),
        title: title.into(),
        coordinate: Some(Coordinate::new(135.7, 35.0)),
        description: String::new(),
        strategy: String::new(),
        duration: String::new(),
        stop_label: String::new(),
        sequence: None,
    }
}

fn event(title: &str, pin_ref: Option<&str>) -> TimelineEvent {
    TimelineEvent {
        time: String::new(),
        title: title.into(),
        description: String::new(),
        tags: Vec::new(),
        is_extra: false,
        pin_ref: pin_ref.map(PinId::new),
    }
}

fn day(pins: Vec<MapPin>, timeline: Vec<TimelineEvent>) -> Day {
    Day {
        header: String::new(),
        subtitle: String::new(),
        date_label: String::new(),
        pins,
        timeline,
    }
}

fn kyoto() -> Vec<Day> {
    vec![
        day(
            vec![
                pin("1", "Kinkaku-ji", "Kinkaku-ji (Golden Pavilion)"),
                pin("2", "Fushimi Inari", "Fushimi Inari Shrine"),
            ],
            vec![
                event("Arrive at Kyoto Station", None),
                event("Kinkaku-ji (Golden Pavilion)", None),
                event("Shrine hike", Some("2")),
            ],
        ),
        day(
            vec![pin("1", "Bamboo Grove", "Arashiyama Bamboo Grove")],
            vec![event("Walk", Some("1"))],
        ),
    ]
}

#[test]
fn event_title_containing_pin_name_links_to_pin() {
    let days = kyoto();
    let sequence = PinSequence::build(&days);
    let linked = pin_for_event(&sequence, 0, &event("Kinkaku-ji (Golden Pavilion)", None))
        .expect("linked");
    assert_eq!(linked.key.to_string(), "0:1");
}

#[test]
fn explicit_reference_wins_and_stays_within_the_day() {
    let days = kyoto();
    let sequence = PinSequence::build(&days);

    let on_day_two = pin_for_event(&sequence, 1, &event("Kinkaku-ji", Some("1"))).expect("linked");
    assert_eq!(on_day_two.key.to_string(), "1:1");

    // Dangling reference falls through to the text rules.
    let dangling =
        pin_for_event(&sequence, 0, &event("Fushimi Inari Taisha", Some("99"))).expect("linked");
    assert_eq!(dangling.key.to_string(), "0:2");
}

#[test]
fn pin_name_containing_event_title_links() {
    let days = kyoto();
    let sequence = PinSequence::build(&days);
    let linked = pin_for_event(&sequence, 0, &event("Fushimi", None)).expect("linked");
    assert_eq!(linked.key.to_string(), "0:2");
}

#[test]
fn unrelated_or_empty_titles_stay_unlinked() {
    let days = kyoto();
    let sequence = PinSequence::build(&days);
    assert!(pin_for_event(&sequence, 0, &event("Lunch at Nishiki Market", None)).is_none());
    assert!(pin_for_event(&sequence, 0, &event("", None)).is_none());
    assert!(pin_for_event(&sequence, 5, &event("Kinkaku-ji", None)).is_none());
}

#[test]
fn empty_pin_names_never_match() {
    let days = vec![day(vec![pin("1", "", "")], Vec::new())];
    let sequence = PinSequence::build(&days);
    assert!(pin_for_event(&sequence, 0, &event("Anything", None)).is_none());
}

#[test]
fn reverse_lookup_finds_first_linking_event() {
    let days = kyoto();
    let sequence = PinSequence::build(&days);

    let golden = sequence.pins().iter().find(|p| p.key.to_string() == "0:1").expect("pin");
    assert_eq!(
        event_for_pin(&days, golden),
        Some(EventTarget {
            day_index: 0,
            event_index: 1
        })
    );

    let inari = sequence.pins().iter().find(|p| p.key.to_string() == "0:2").expect("pin");
    assert_eq!(event_for_pin(&days, inari).map(|t| t.event_index), Some(2));

    let bamboo = sequence.pins().iter().find(|p| p.day_index == 1).expect("pin");
    assert_eq!(
        event_for_pin(&days, bamboo),
        Some(EventTarget {
            day_index: 1,
            event_index: 0
        })
    );
}

#[test]
fn reverse_lookup_without_match_is_none() {
    let days = vec![day(
        vec![pin("1", "Gion", "Gion District")],
        vec![event("Hotel check-in", None)],
    )];
    let sequence = PinSequence::build(&days);
    assert_eq!(event_for_pin(&days, &sequence.pins()[0]), None);
}
