//! Call candidates open to the observer, as MJAI label tuples.
//!
//! Only the concealed-kan check after riichi is a rule check; the other
//! queries enumerate every tile combination the hand physically allows.

use std::collections::BTreeSet;

use mjconv_engine::{ConvError, ConvResult, MeldKind, Pai, Tile, TileKind, WaitSet, compute_wait_set};

use crate::state::ObserverState;

fn labels4(tiles: [Tile; 4]) -> [Pai; 4] {
    tiles.map(Pai::from)
}

fn sorted_pair(a: Tile, b: Tile) -> [Pai; 2] {
    let (a, b) = (Pai::from(a), Pai::from(b));
    if a <= b { [a, b] } else { [b, a] }
}

impl ObserverState {
    /// Concealed kans the observer may declare now.
    ///
    /// Under riichi only the freshly drawn tile's kind qualifies, and only
    /// when setting the four copies aside leaves the locked wait unchanged.
    pub fn legal_concealed_kans(&self) -> BTreeSet<[Pai; 4]> {
        let mut out = BTreeSet::new();
        if self.live_wall <= 0 {
            return out;
        }
        let counts = self.counts();
        match &self.riichi {
            Some(locked) => {
                let Some(drawn) = self.hand.last() else {
                    return out;
                };
                let kind = drawn.kind();
                if counts[kind.index()] != 4 {
                    return out;
                }
                let mut rest = counts;
                rest[kind.index()] = 0;
                if compute_wait_set(&rest) == *locked {
                    out.insert(labels4(kind.copies()));
                }
            }
            None => {
                for (k, &c) in counts.iter().enumerate() {
                    if c == 4
                        && let Some(kind) = TileKind::new(k as u8)
                    {
                        out.insert(labels4(kind.copies()));
                    }
                }
            }
        }
        out
    }

    /// Added kans: a concealed tile joining one of the observer's pons.
    /// Each entry is the added tile followed by the pon's three tiles.
    pub fn legal_kakans(&self) -> BTreeSet<[Pai; 4]> {
        let mut out = BTreeSet::new();
        if self.live_wall <= 0 {
            return out;
        }
        for &tile in &self.hand {
            for meld in self.melds.iter().filter(|m| m.kind() == MeldKind::Pon) {
                if meld.tile_kind() != tile.kind() {
                    continue;
                }
                let pon = meld.tiles();
                if let [a, b, c] = pon[..] {
                    out.insert(labels4([tile, a, b, c]));
                }
            }
        }
        out
    }

    /// Concealed pairs that can pon `called`.
    pub fn legal_pons(&self, called: Pai) -> BTreeSet<[Pai; 2]> {
        let mut out = BTreeSet::new();
        let Some(kind) = called.kind() else {
            return out;
        };
        let same: Vec<Tile> = self.hand.iter().copied().filter(|t| t.kind() == kind).collect();
        for (i, &a) in same.iter().enumerate() {
            for &b in &same[i + 1..] {
                out.insert(sorted_pair(a, b));
            }
        }
        out
    }

    /// Concealed pairs that complete a run with `called`, lower tile first.
    /// Honors never form runs.
    pub fn legal_chis(&self, called: Pai) -> BTreeSet<[Pai; 2]> {
        let mut out = BTreeSet::new();
        let Some(kind) = called.kind() else {
            return out;
        };
        let Some(number) = kind.number() else {
            return out;
        };
        let base = kind.id() - (number - 1);
        // offsets of the two partners relative to the called tile's number
        let shapes: [(i8, i8); 3] = [(-2, -1), (-1, 1), (1, 2)];
        for (lo, hi) in shapes {
            let (n_lo, n_hi) = (number as i8 + lo, number as i8 + hi);
            if n_lo < 1 || n_hi > 9 {
                continue;
            }
            let k_lo = base + (n_lo - 1) as u8;
            let k_hi = base + (n_hi - 1) as u8;
            for &a in self.hand.iter().filter(|t| t.kind().id() == k_lo) {
                for &b in self.hand.iter().filter(|t| t.kind().id() == k_hi) {
                    out.insert([Pai::from(a), Pai::from(b)]);
                }
            }
        }
        out
    }

    /// The wait-set fixed when the observer's riichi was accepted.
    pub fn locked_wait_set(&self) -> ConvResult<&WaitSet> {
        self.riichi
            .as_ref()
            .ok_or_else(|| ConvError::invalid_state("observer has not declared riichi"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::Seating;
    use crate::state::RoundInfo;
    use mjconv_engine::Meld;

    fn state(hand: &[u32]) -> ObserverState {
        ObserverState::new(
            Seating::four_player(0),
            hand.iter().map(|&i| Tile::new(i).unwrap()).collect(),
            70,
            RoundInfo {
                bakaze: Pai::wind(0),
                kyoku: 1,
                honba: 0,
                kyotaku: 0,
                oya: 0,
            },
            "1m".parse().unwrap(),
        )
    }

    fn p(s: &str) -> Pai {
        s.parse().unwrap()
    }

    fn names<const N: usize>(set: &BTreeSet<[Pai; N]>) -> Vec<Vec<String>> {
        set.iter()
            .map(|t| t.iter().map(|p| p.to_string()).collect())
            .collect()
    }

    #[test]
    fn concealed_kans_without_riichi() {
        let s = state(&[16, 17, 18, 19, 0, 1, 2, 3, 40]);
        assert_eq!(
            names(&s.legal_concealed_kans()),
            vec![vec!["1m", "1m", "1m", "1m"], vec!["5mr", "5m", "5m", "5m"]]
        );
    }

    #[test]
    fn no_kans_from_an_empty_wall() {
        let mut s = state(&[0, 1, 2, 3]);
        s.live_wall = 0;
        assert!(s.legal_concealed_kans().is_empty());
        assert!(s.legal_kakans().is_empty());
    }

    #[test]
    fn riichi_kan_rejected_when_wait_changes() {
        // 111m 23m 567p 789p EE waits on 1m 4m E; drawing the fourth 1m
        let mut s = state(&[0, 1, 2, 4, 8, 52, 56, 60, 61, 64, 68, 108, 109]);
        s.lock_wait();
        assert_eq!(s.locked_wait_set().unwrap().len(), 3);
        s.hand.push(Tile::new(3).unwrap());
        assert!(s.legal_concealed_kans().is_empty());
    }

    #[test]
    fn riichi_kan_permitted_when_wait_kept() {
        // 111m 234m 567p 6788s waits on 5s 8s; drawing the fourth 1m
        let mut s = state(&[0, 1, 2, 4, 8, 12, 52, 56, 60, 92, 96, 100, 101]);
        s.lock_wait();
        s.hand.push(Tile::new(3).unwrap());
        assert_eq!(names(&s.legal_concealed_kans()), vec![vec!["1m", "1m", "1m", "1m"]]);
        // the drawn tile must be the fourth copy
        s.hand.push(Tile::new(5).unwrap());
        assert!(s.legal_concealed_kans().is_empty());
    }

    #[test]
    fn locked_wait_requires_riichi() {
        let s = state(&[0]);
        assert!(matches!(s.locked_wait_set(), Err(ConvError::InvalidState { .. })));
    }

    #[test]
    fn kakan_lists_added_tile_then_pon() {
        let mut s = state(&[1, 40]);
        s.push_meld(Meld::Pon {
            target: 3,
            called: Tile::new(0).unwrap(),
            consumed: [Tile::new(2).unwrap(), Tile::new(3).unwrap()],
            unused: Tile::new(1).unwrap(),
        });
        assert_eq!(names(&s.legal_kakans()), vec![vec!["1m", "1m", "1m", "1m"]]);
    }

    #[test]
    fn pon_pairs_are_unordered() {
        let s = state(&[16, 17, 18, 0]);
        assert_eq!(
            names(&s.legal_pons(p("5m"))),
            vec![vec!["5m", "5m"], vec!["5m", "5mr"]]
        );
        assert!(s.legal_pons(p("1m")).is_empty());
        assert!(s.legal_pons(Pai::UNKNOWN).is_empty());
    }

    #[test]
    fn chi_shapes_stay_inside_the_suit() {
        // 7m 8m 1p 2p
        let s = state(&[24, 28, 36, 40]);
        assert_eq!(names(&s.legal_chis(p("9m"))), vec![vec!["7m", "8m"]]);
        assert_eq!(names(&s.legal_chis(p("6m"))), vec![vec!["7m", "8m"]]);
        // 8m 9m ... 1p does not wrap across suits
        assert!(s.legal_chis(p("3m")).is_empty());
        assert_eq!(names(&s.legal_chis(p("3p"))), vec![vec!["1p", "2p"]]);
    }

    #[test]
    fn honors_never_chi() {
        let s = state(&[108, 112, 116]);
        assert!(s.legal_chis(p("S")).is_empty());
    }
}
