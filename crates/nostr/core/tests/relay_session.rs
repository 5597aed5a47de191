//! Integration tests for a full client/relay exchange over the wire codecs.

use nostr_wire::nip01::{KIND_LONG_FORM_CONTENT, matches_any};
use nostr_wire::{
    ClientMessage, EventTemplate, Filter, FromBech32, Keypair, Message, NAddr, NEvent,
    Nip19Entity, RelayMessage, Timestamp, TimestampBounds, ToBech32, parse_nostr_uri,
    to_nostr_uri,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn author() -> Keypair {
    Keypair::generate(&mut StdRng::seed_from_u64(2024))
}

#[test]
fn test_publish_subscribe_roundtrip() {
    let keypair = author();
    let note = EventTemplate::note("first post", vec![vec!["t".to_string(), "intro".to_string()]])
        .created_at(Timestamp::from_secs(1_700_000_100))
        .finalize(&keypair)
        .unwrap();
    let article = EventTemplate::article("# Long form", "hello-world", Vec::new())
        .created_at(Timestamp::from_secs(1_700_000_200))
        .finalize(&keypair)
        .unwrap();

    // Client publishes both events.
    let mut stored = Vec::new();
    for event in [&note, &article] {
        let wire = ClientMessage::Event(event.clone()).to_json().unwrap();
        match ClientMessage::from_json(&wire).unwrap() {
            ClientMessage::Event(received) => {
                assert!(received.verify());
                let ack = RelayMessage::ok(received.id, true, "").to_json().unwrap();
                assert_eq!(
                    RelayMessage::from_json(&ack).unwrap(),
                    RelayMessage::ok(event.id, true, "")
                );
                stored.push(received);
            }
            _ => panic!("wrong message type"),
        }
    }

    // Client subscribes to the author's articles.
    let req = ClientMessage::req(
        "articles",
        vec![
            Filter::new()
                .author(keypair.public_key_hex())
                .kind(KIND_LONG_FORM_CONTENT)
                .tag("d", ["hello-world"]),
        ],
    )
    .to_json()
    .unwrap();

    let (subscription_id, filters) = match ClientMessage::from_json(&req).unwrap() {
        ClientMessage::Req {
            subscription_id,
            filters,
        } => (subscription_id, filters),
        _ => panic!("wrong message type"),
    };

    let mut outbound: Vec<String> = stored
        .iter()
        .filter(|event| matches_any(&filters, event))
        .map(|event| {
            RelayMessage::event(subscription_id.clone(), event.clone())
                .to_json()
                .unwrap()
        })
        .collect();
    outbound.push(RelayMessage::eose(subscription_id.clone()).to_json().unwrap());

    assert_eq!(outbound.len(), 2);
    match RelayMessage::from_json(&outbound[0]).unwrap() {
        RelayMessage::Event {
            subscription_id,
            event,
        } => {
            assert_eq!(subscription_id, "articles");
            assert_eq!(event, article);
            assert_eq!(event.parameterized_id(), Some("hello-world"));
        }
        _ => panic!("wrong message type"),
    }
    assert!(matches!(
        Message::from_json(&outbound[1]).unwrap(),
        Message::Relay(RelayMessage::Eose { .. })
    ));
}

#[test]
fn test_since_until_policies_over_wire() {
    let keypair = author();
    let event = EventTemplate::note("edge", Vec::new())
        .created_at(Timestamp::from_secs(1_700_000_000))
        .finalize(&keypair)
        .unwrap();
    let filter: Filter =
        serde_json::from_str(r#"{"since":1700000000,"until":1700000000}"#).unwrap();
    assert!(filter.matches_with(&event, TimestampBounds::Inclusive));
    assert!(!filter.matches_with(&event, TimestampBounds::Exclusive));
}

#[test]
fn test_share_event_and_address_links() {
    let keypair = author();
    let article = EventTemplate::article("body", "slug-1", Vec::new())
        .finalize(&keypair)
        .unwrap();

    let nevent = NEvent::new(article.id)
        .relay("wss://relay.example.com")
        .author(article.pubkey)
        .kind(u32::from(article.kind));
    let uri = to_nostr_uri(&Nip19Entity::Event(nevent.clone())).unwrap();
    assert!(uri.starts_with("nostr:nevent1"));
    assert_eq!(parse_nostr_uri(&uri).unwrap(), Nip19Entity::Event(nevent));

    let naddr = NAddr::new(
        article.parameterized_id().unwrap_or_default(),
        article.pubkey,
        u32::from(article.kind),
    );
    let encoded = naddr.to_bech32().unwrap();
    let decoded = NAddr::from_bech32(&encoded).unwrap();
    assert_eq!(decoded.identifier, "slug-1");
    assert_eq!(decoded.author, keypair.public_key);

    let filter = Filter::new()
        .author(decoded.author.to_hex())
        .kind(decoded.event_kind().unwrap())
        .tag("d", [decoded.identifier]);
    assert!(filter.matches(&article));
}

#[test]
fn test_keys_through_bech32() {
    let keypair = author();
    let npub = keypair.npub().unwrap();
    let nsec = keypair.nsec().unwrap();
    assert_eq!(
        nostr_wire::PublicKey::from_bech32(&npub).unwrap(),
        keypair.public_key
    );
    assert_eq!(
        nostr_wire::SecretKey::from_bech32(&nsec).unwrap(),
        keypair.secret_key
    );
    assert!(parse_nostr_uri(&format!("nostr:{nsec}")).is_err());
}
