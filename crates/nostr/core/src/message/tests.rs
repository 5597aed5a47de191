use super::*;
use crate::nip01::{Event, EventTemplate, Filter, Keypair, Timestamp};

const TEST_SECRET_KEY: &str = "d217c1ff2f8a65c3e3a1740db3b9f58b8c848bb45e26d00ed4714e4a0f4ceecf";

fn sample_event() -> Event {
    EventTemplate::note("hello", vec![vec!["t".to_string(), "nostr".to_string()]])
        .created_at(Timestamp::from_secs(1_700_000_000))
        .finalize(&Keypair::from_hex(TEST_SECRET_KEY).unwrap())
        .unwrap()
}

fn all_messages() -> Vec<Message> {
    let event = sample_event();
    vec![
        ClientMessage::Event(event.clone()).into(),
        ClientMessage::req("sub", vec![Filter::new().kind(1), Filter::new().author("abcd")]).into(),
        ClientMessage::close("sub").into(),
        ClientMessage::Auth(event.clone()).into(),
        ClientMessage::count("sub", vec![Filter::new()]).into(),
        RelayMessage::event("sub", event.clone()).into(),
        RelayMessage::ok(event.id, true, "").into(),
        RelayMessage::eose("sub").into(),
        RelayMessage::closed("sub", "error: shutting down").into(),
        RelayMessage::notice("hello").into(),
        RelayMessage::auth("challenge-token").into(),
        RelayMessage::Count { count: 42 }.into(),
    ]
}

#[test]
fn test_roundtrip_all_shapes() {
    let messages = all_messages();
    assert_eq!(messages.len(), 12);
    for message in messages {
        let json = message.to_json().unwrap();
        let decoded = Message::from_json(&json).unwrap();
        assert_eq!(decoded, message, "roundtrip of {json}");
    }
}

#[test]
fn test_client_event_wire_form() {
    let event = sample_event();
    let json = ClientMessage::Event(event.clone()).to_json().unwrap();
    assert_eq!(
        json,
        format!("[\"EVENT\",{}]", serde_json::to_string(&event).unwrap())
    );
}

#[test]
fn test_req_wire_form() {
    let json = ClientMessage::req("sub1", vec![Filter::new().kind(1).limit(10), Filter::new()])
        .to_json()
        .unwrap();
    assert_eq!(json, r#"["REQ","sub1",{"kinds":[1],"limit":10},{}]"#);
}

#[test]
fn test_relay_wire_forms() {
    let event = sample_event();
    assert_eq!(
        RelayMessage::ok(event.id, false, "blocked").to_json().unwrap(),
        format!("[\"OK\",\"{}\",false,\"blocked\"]", event.id)
    );
    assert_eq!(RelayMessage::eose("s").to_json().unwrap(), r#"["EOSE","s"]"#);
    assert_eq!(
        RelayMessage::Count { count: 3 }.to_json().unwrap(),
        r#"["COUNT",3]"#
    );
    assert_eq!(RelayMessage::auth("c").to_json().unwrap(), r#"["AUTH","c"]"#);
}

#[test]
fn test_event_direction_by_lookahead() {
    let event = sample_event();
    let event_json = serde_json::to_string(&event).unwrap();

    let client = Message::from_json(&format!("[\"EVENT\",{event_json}]")).unwrap();
    assert_eq!(client, Message::Client(ClientMessage::Event(event.clone())));

    let relay = Message::from_json(&format!("[\"EVENT\", \"sub\",{event_json}]")).unwrap();
    match relay {
        Message::Relay(RelayMessage::Event {
            subscription_id,
            event: decoded,
        }) => {
            assert_eq!(subscription_id, "sub");
            assert_eq!(decoded, event);
        }
        _ => panic!("wrong message type"),
    }
}

#[test]
fn test_auth_direction_by_lookahead() {
    let event = sample_event();
    let event_json = serde_json::to_string(&event).unwrap();
    assert!(matches!(
        Message::from_json(&format!("[\"AUTH\",{event_json}]")).unwrap(),
        Message::Client(ClientMessage::Auth(_))
    ));
    assert_eq!(
        Message::from_json(r#"["AUTH","challenge"]"#).unwrap(),
        Message::Relay(RelayMessage::auth("challenge"))
    );
}

#[test]
fn test_count_direction_by_lookahead() {
    match Message::from_json(r#"["COUNT","sub",{"kinds":[1]}]"#).unwrap() {
        Message::Client(ClientMessage::Count {
            subscription_id,
            filters,
        }) => {
            assert_eq!(subscription_id, "sub");
            assert_eq!(filters, vec![Filter::new().kind(1)]);
        }
        _ => panic!("wrong message type"),
    }
    assert_eq!(
        Message::from_json(r#"["COUNT",7]"#).unwrap(),
        Message::Relay(RelayMessage::Count { count: 7 })
    );
}

#[test]
fn test_notice_ignores_trailing_fields() {
    let plain = Message::from_json(r#"["NOTICE","hello"]"#).unwrap();
    let extended = Message::from_json(r#"["NOTICE","hello","extra",{"nested":["]"]},[1,2]]"#)
        .unwrap();
    assert_eq!(plain, extended);
}

#[test]
fn test_client_event_ignores_trailing_fields() {
    let event = sample_event();
    let event_json = serde_json::to_string(&event).unwrap();
    let decoded = ClientMessage::from_json(&format!("[\"EVENT\",{event_json},\"x\"]")).unwrap();
    assert_eq!(decoded, ClientMessage::Event(event));
}

#[test]
fn test_req_filters_may_be_null() {
    let decoded = ClientMessage::from_json(r#"["REQ","sub",null]"#).unwrap();
    assert_eq!(decoded, ClientMessage::req("sub", vec![Filter::default()]));
}

#[test]
fn test_unknown_message_kind() {
    assert!(matches!(
        Message::from_json(r#"["EVE","x"]"#),
        Err(MessageError::UnknownMessageKind(kind)) if kind == "EVE"
    ));
}

#[test]
fn test_malformed_inputs() {
    for input in ["", "[", "{}", "[]", "[1]", r#"["EVENT"]"#, r#"["EVENT",1]"#] {
        assert!(
            matches!(
                Message::from_json(input),
                Err(MessageError::MalformedWireJson(_))
            ),
            "input {input:?}"
        );
    }
}

#[test]
fn test_missing_positional_fields() {
    for input in [
        r#"["REQ","sub"]"#,
        r#"["CLOSE"]"#,
        r#"["OK","00"]"#,
        r#"["EOSE"]"#,
        r#"["CLOSED","sub"]"#,
        r#"["NOTICE"]"#,
        r#"["COUNT"]"#,
    ] {
        assert!(
            matches!(
                Message::from_json(input),
                Err(MessageError::MalformedWireJson(_))
            ),
            "input {input:?}"
        );
    }
}

#[test]
fn test_mistyped_fields() {
    let event = sample_event();
    let ok = format!("[\"OK\",\"{}\",\"yes\",\"\"]", event.id);
    assert!(matches!(
        Message::from_json(&ok),
        Err(MessageError::MalformedWireJson(_))
    ));
    assert!(matches!(
        Message::from_json(r#"["NOTICE",5]"#),
        Err(MessageError::MalformedWireJson(_))
    ));
    assert!(matches!(
        Message::from_json(r#"["COUNT",-1]"#),
        Err(MessageError::MalformedWireJson(_))
    ));
}

#[test]
fn test_direction_narrowing() {
    assert!(matches!(
        ClientMessage::from_json(r#"["NOTICE","hi"]"#),
        Err(MessageError::UnexpectedDirection(_))
    ));
    assert!(matches!(
        RelayMessage::from_json(r#"["CLOSE","sub"]"#),
        Err(MessageError::UnexpectedDirection(_))
    ));
    assert_eq!(
        RelayMessage::from_json(r#"["EOSE","sub"]"#).unwrap(),
        RelayMessage::eose("sub")
    );
}

#[test]
fn test_lenient_event_inside_message() {
    let event = sample_event();
    let mut value = serde_json::to_value(&event).unwrap();
    value["pubkey"] = serde_json::json!("zz");
    let json = serde_json::to_string(&serde_json::json!(["EVENT", "sub", value])).unwrap();
    match RelayMessage::from_json(&json).unwrap() {
        RelayMessage::Event { event, .. } => {
            assert!(event.pubkey.is_null());
            assert!(!event.verify());
        }
        _ => panic!("wrong message type"),
    }
}
