//! Winning-shape detection over 34-kind count vectors.
//!
//! Three families are recognized: four sets and a pair (with any number of
//! sets already called away), seven distinct pairs, and thirteen orphans.
//! Every probe takes its input by reference and works on a local copy.

use crate::tile::{JIHAI_START, NUM_SUIT_TILES, TERMINALS_AND_HONORS};
use crate::types::TileCounts;

type SuitCounts = [u8; NUM_SUIT_TILES];

fn suit_slice(h: &TileCounts, suit: usize) -> SuitCounts {
    let mut out = [0u8; NUM_SUIT_TILES];
    out.copy_from_slice(&h[suit * NUM_SUIT_TILES..(suit + 1) * NUM_SUIT_TILES]);
    out
}

/// `true` if the nine counts of one suit split entirely into runs and
/// triplets.
///
/// Greedy carry scan: whatever is left of the lowest rank after taking
/// triplets must start runs, so it is subtracted from the next two ranks.
pub fn decomposes_to_runs_and_triplets(h: &SuitCounts) -> bool {
    let (mut a, mut b) = (h[0], h[1]);
    for &c in &h[2..] {
        let r = a % 3;
        if b < r || c < r {
            return false;
        }
        a = b - r;
        b = c - r;
    }
    a % 3 == 0 && b % 3 == 0
}

/// `true` if one pair can be taken from the suit and the rest decomposes.
///
/// The rank sum of a decomposable suit is divisible by 3, so the pair rank
/// `p` must satisfy `2p ≡ Σ i·h[i] (mod 3)`, i.e. `p ≡ 2·Σ i·h[i]`.
pub fn has_pair_and_decomposes(h: &SuitCounts) -> bool {
    let s: u32 = h.iter().enumerate().map(|(i, &c)| i as u32 * u32::from(c)).sum();
    let first = (s * 2 % 3) as usize;
    (first..NUM_SUIT_TILES).step_by(3).any(|p| {
        if h[p] < 2 {
            return false;
        }
        let mut rest = *h;
        rest[p] -= 2;
        decomposes_to_runs_and_triplets(&rest)
    })
}

/// Sets-and-a-pair shape. Works for any concealed size of the form 3n+2.
pub fn is_standard(h: &TileCounts) -> bool {
    // Which group holds the pair: 0-2 for a suit, 3 for the honors.
    let mut head: Option<usize> = None;
    let mut claim = |group: usize| -> bool {
        if head.is_some() {
            return false;
        }
        head = Some(group);
        true
    };

    for suit in 0..3 {
        let total: u32 = suit_slice(h, suit).iter().map(|&c| u32::from(c)).sum();
        match total % 3 {
            1 => return false,
            2 if !claim(suit) => return false,
            _ => {}
        }
    }
    for &c in &h[JIHAI_START as usize..] {
        match c % 3 {
            1 => return false,
            2 if !claim(3) => return false,
            _ => {}
        }
    }

    let Some(head) = head else {
        return false;
    };
    (0..3).all(|suit| {
        let counts = suit_slice(h, suit);
        if suit == head {
            has_pair_and_decomposes(&counts)
        } else {
            decomposes_to_runs_and_triplets(&counts)
        }
    })
}

/// Exactly seven kinds held twice, nothing else.
pub fn is_seven_pairs(h: &TileCounts) -> bool {
    h.iter().all(|&c| c == 0 || c == 2) && h.iter().filter(|&&c| c == 2).count() == 7
}

/// One of each terminal and honor plus one duplicate among them.
pub fn is_thirteen_orphans(h: &TileCounts) -> bool {
    let mut total = 0u32;
    for (k, &c) in h.iter().enumerate() {
        let orphan = TERMINALS_AND_HONORS.contains(&(k as u8));
        if (orphan && c == 0) || (!orphan && c != 0) {
            return false;
        }
        total += u32::from(c);
    }
    total == 14
}

#[inline]
pub fn is_complete(h: &TileCounts) -> bool {
    is_standard(h) || is_seven_pairs(h) || is_thirteen_orphans(h)
}
