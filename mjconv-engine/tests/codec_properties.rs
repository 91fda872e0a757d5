//! Property-based checks for the call codec and the completion engine.

use mjconv_engine::agari::is_complete;
use mjconv_engine::{TileCounts, compute_wait_set, decode_meld, decode_tile, encode_meld};
use proptest::prelude::*;

/// A 13-tile concealed hand as a count vector, never more than four copies.
fn arb_hand() -> impl Strategy<Value = TileCounts> {
    proptest::collection::vec(0u8..34, 13).prop_filter_map("more than four copies", |kinds| {
        let mut h = [0u8; 34];
        for k in kinds {
            h[k as usize] += 1;
            if h[k as usize] > 4 {
                return None;
            }
        }
        Some(h)
    })
}

proptest! {
    #[test]
    fn encode_inverts_decode(raw in 0u32..=0xFFFF) {
        if let Ok(meld) = decode_meld(raw) {
            let code = encode_meld(&meld).unwrap();
            prop_assert_eq!(decode_meld(u32::from(code)).unwrap(), meld);
        }
    }

    #[test]
    fn decoded_melds_hold_distinct_tiles(raw in 0u32..=0xFFFF) {
        if let Ok(meld) = decode_meld(raw) {
            let mut ids: Vec<u8> = meld.tiles().iter().map(|t| t.id()).collect();
            let n = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), n);
        }
    }

    #[test]
    fn decode_tile_rejects_out_of_range(index in 136u32..) {
        prop_assert!(decode_tile(index).is_err());
    }

    #[test]
    fn every_wait_completes_the_hand(h in arb_hand()) {
        for kind in compute_wait_set(&h) {
            let mut probe = h;
            prop_assert!(probe[kind.index()] < 4);
            probe[kind.index()] += 1;
            prop_assert!(is_complete(&probe));
        }
    }

    #[test]
    fn wait_set_leaves_hand_untouched(h in arb_hand()) {
        let before = h;
        let _ = compute_wait_set(&h);
        prop_assert_eq!(h, before);
    }
}
