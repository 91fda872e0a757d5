//! Property-based invariants for the bridge.
//!
//! Feeds truncated and scrambled frame sequences and checks the bridge
//! never panics, keeps the observer hand size consistent, and always
//! produces events that serialize.

use mjconv_core::{Event, RawEvent, TenhouBridge, to_mjai_lines};
use proptest::prelude::*;

/// A plausible record: deal, a few draws and discards, a call, a draw.
fn record() -> Vec<RawEvent> {
    vec![
        RawEvent::new("GO").with("type", 169),
        RawEvent::new("TAIKYOKU").with("oya", 0),
        RawEvent::new("INIT")
            .with("seed", "0,0,0,2,4,98")
            .with("ten", "250,250,250,250")
            .with("oya", 0)
            .with("hai", "16,17,19,0,4,8,36,40,44,72,76,80,108"),
        RawEvent::new("T100"),
        RawEvent::new("D100"),
        RawEvent::new("U"),
        RawEvent::new("e104"),
        RawEvent::new("V"),
        RawEvent::new("F18"),
        RawEvent::new("N").with("who", 0).with("m", 6666),
        RawEvent::new("D0"),
        RawEvent::new("W"),
        RawEvent::new("REACH").with("who", 3).with("step", 1),
        RawEvent::new("g112"),
        RawEvent::new("REACH").with("who", 3).with("step", 2).with("ten", "250,250,250,240"),
        RawEvent::new("DORA").with("hai", 38),
        RawEvent::new("RYUUKYOKU").with("sc", "250,10,250,-10,250,-10,250,10"),
    ]
}

fn arb_frame() -> impl Strategy<Value = RawEvent> {
    let tags = prop::sample::select(vec![
        "INIT", "T", "U", "V", "W", "D", "E", "F", "G", "d", "N", "REACH", "DORA", "AGARI",
        "RYUUKYOKU", "TAIKYOKU", "GO", "UN", "BYE",
    ]);
    (tags, prop::option::of(0u32..140), prop::option::of(0u32..70000), 0u8..5).prop_map(
        |(tag, index, m, who)| {
            let tag = match index {
                Some(i) if tag.len() == 1 && tag != "N" => format!("{tag}{i}"),
                _ => tag.to_string(),
            };
            let mut raw = RawEvent::new(tag).with("who", who).with("oya", who).with("step", who);
            if let Some(m) = m {
                raw = raw.with("m", m).with("hai", m % 136);
            }
            raw
        },
    )
}

fn feed_all(bridge: &mut TenhouBridge, frames: &[RawEvent]) -> Vec<Event> {
    let mut events = Vec::new();
    for raw in frames {
        if let Ok(out) = bridge.feed(raw) {
            events.extend(out);
        }
    }
    events
}

proptest! {
    #[test]
    fn truncated_records_never_panic(cut in 0usize..=17) {
        let frames = record();
        let mut bridge = TenhouBridge::new();
        let events = feed_all(&mut bridge, &frames[..cut]);
        prop_assert!(to_mjai_lines(&events).is_ok());
    }

    #[test]
    fn scrambled_frames_never_panic(frames in proptest::collection::vec(arb_frame(), 0..40)) {
        let mut bridge = TenhouBridge::new();
        let events = feed_all(&mut bridge, &frames);
        prop_assert!(to_mjai_lines(&events).is_ok());
        if let Some(state) = bridge.state() {
            prop_assert!(state.hand().len() <= 14 + frames.len());
            let _ = state.legal_concealed_kans();
            let _ = state.legal_kakans();
        }
    }

    #[test]
    fn hand_size_tracks_draws_and_discards(rounds in 1usize..12) {
        let mut bridge = TenhouBridge::new();
        feed_all(&mut bridge, &record()[..3]);
        for i in 0..rounds {
            let tile = 120 + (i % 12) as u32;
            bridge.feed(&RawEvent::new(format!("T{tile}"))).unwrap();
            prop_assert_eq!(bridge.state().unwrap().hand().len(), 14);
            bridge.feed(&RawEvent::new(format!("D{tile}"))).unwrap();
            prop_assert_eq!(bridge.state().unwrap().hand().len(), 13);
        }
        prop_assert_eq!(bridge.state().unwrap().live_wall(), 70 - rounds as i32);
    }

    #[test]
    fn same_frames_same_bytes(cut in 0usize..=17) {
        let frames = record();
        let a = feed_all(&mut TenhouBridge::new(), &frames[..cut]);
        let b = feed_all(&mut TenhouBridge::new(), &frames[..cut]);
        prop_assert_eq!(to_mjai_lines(&a).unwrap(), to_mjai_lines(&b).unwrap());
    }
}
