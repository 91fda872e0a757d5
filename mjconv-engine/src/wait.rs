//! Wait-set computation: which tile kinds complete a concealed hand.

use std::collections::BTreeSet;

use crate::agari::is_complete;
use crate::tile::{NUM_TILE_KINDS, TileKind};
use crate::types::TileCounts;

/// Ordered set of completing kinds. Two wait-sets are equal iff they hold
/// the same kinds.
pub type WaitSet = BTreeSet<TileKind>;

/// Every kind with fewer than four copies held whose arrival completes the
/// hand. An empty set means the hand is not tenpai.
pub fn compute_wait_set(counts: &TileCounts) -> WaitSet {
    let mut probe = *counts;
    let mut waits = WaitSet::new();
    for k in 0..NUM_TILE_KINDS {
        if probe[k] >= 4 {
            continue;
        }
        probe[k] += 1;
        if is_complete(&probe)
            && let Some(kind) = TileKind::new(k as u8)
        {
            waits.insert(kind);
        }
        probe[k] -= 1;
    }
    waits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(kinds: &[u8]) -> TileCounts {
        let mut h = [0u8; 34];
        for &k in kinds {
            h[k as usize] += 1;
        }
        h
    }

    fn waits(kinds: &[u8]) -> Vec<u8> {
        compute_wait_set(&hand(kinds)).iter().map(|k| k.id()).collect()
    }

    #[test]
    fn edge_and_single_waits() {
        // 123456789m 1234p
        assert_eq!(waits(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]), vec![9, 12]);
        // 123p 456p 789p 1s-9s... tanki on haku
        assert_eq!(waits(&[9, 9, 9, 18, 19, 20, 21, 22, 23, 24, 25, 26, 31]), vec![31]);
    }

    #[test]
    fn nine_gates_waits_on_every_rank() {
        assert_eq!(waits(&[0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 8, 8]), (0..9).collect::<Vec<u8>>());
    }

    #[test]
    fn thirteen_sided_wait() {
        use crate::tile::TERMINALS_AND_HONORS;
        assert_eq!(waits(&TERMINALS_AND_HONORS), TERMINALS_AND_HONORS.to_vec());
    }

    #[test]
    fn seven_pairs_single_wait() {
        assert_eq!(waits(&[0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 27]), vec![27]);
    }

    #[test]
    fn mixed_shapes() {
        assert_eq!(waits(&[1, 2, 3, 3, 3, 27, 27, 27, 28, 28, 28, 9, 9]), vec![0, 3, 9]);
    }

    #[test]
    fn four_held_copies_are_never_waited_on() {
        // 1111m 234p 567p 789s 9s: completing tile would be a fifth 1m
        let h = hand(&[0, 0, 0, 0, 10, 11, 12, 13, 14, 15, 24, 25, 26]);
        assert!(!compute_wait_set(&h).iter().any(|k| k.id() == 0));
    }

    #[test]
    fn noten_hand_has_no_waits() {
        assert!(waits(&[0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 27, 29, 31]).is_empty());
    }

    #[test]
    fn ankan_probe_cases() {
        // removing the quad changes the wait
        let before = waits(&[0, 0, 0, 1, 2, 13, 14, 15, 15, 16, 17, 27, 27]);
        assert_eq!(before, vec![0, 3, 27]);
        assert_eq!(waits(&[1, 2, 13, 14, 15, 15, 16, 17, 27, 27]), vec![0, 3]);

        // removing the quad keeps the wait
        let kept = waits(&[0, 0, 0, 1, 2, 3, 13, 14, 15, 25, 25, 24, 23]);
        assert_eq!(kept, vec![22, 25]);
        assert_eq!(waits(&[1, 2, 3, 13, 14, 15, 25, 25, 24, 23]), vec![22, 25]);
    }
}
