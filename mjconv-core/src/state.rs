//! What the observing seat knows about the hand in progress.

use mjconv_engine::{
    ConvError, ConvResult, Meld, MeldKind, Pai, Tile, TileCounts, WaitSet, compute_wait_set,
    counts_of,
};

use crate::seat::Seating;

/// Round metadata announced by `INIT`. Seats are absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundInfo {
    pub bakaze: Pai,
    pub kyoku: u8,
    pub honba: u8,
    pub kyotaku: u8,
    pub oya: u8,
}

/// Observer state for one hand. Built from `INIT` and replaced wholesale by
/// the next one.
#[derive(Debug, Clone)]
pub struct ObserverState {
    pub(crate) seating: Seating,
    /// Concealed tiles in arrival order.
    pub(crate) hand: Vec<Tile>,
    pub(crate) melds: Vec<Meld>,
    /// Locked wait-set; `Some` once the observer's riichi is accepted.
    pub(crate) riichi: Option<WaitSet>,
    pub(crate) live_wall: i32,
    /// Most recent draw by any seat, when its index was visible. Cleared by
    /// discards and calls.
    pub(crate) last_draw: Option<Tile>,
    pub(crate) last_discard: Option<Pai>,
    pub(crate) is_tsumo: bool,
    pub(crate) is_three_player: bool,
    /// Set by `INIT`, cleared by the first draw of the hand.
    pub(crate) is_new_round: bool,
    pub(crate) dora_indicators: Vec<Pai>,
    pub(crate) round: RoundInfo,
}

impl ObserverState {
    pub fn new(
        seating: Seating,
        hand: Vec<Tile>,
        live_wall: i32,
        round: RoundInfo,
        dora_indicator: Pai,
    ) -> Self {
        ObserverState {
            seating,
            hand,
            melds: Vec::new(),
            riichi: None,
            live_wall,
            last_draw: None,
            last_discard: None,
            is_tsumo: false,
            is_three_player: seating.players() == 3,
            is_new_round: true,
            dora_indicators: vec![dora_indicator],
            round,
        }
    }

    pub fn seat(&self) -> u8 {
        self.seating.observer()
    }

    pub fn seating(&self) -> Seating {
        self.seating
    }

    pub fn hand(&self) -> &[Tile] {
        &self.hand
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn counts(&self) -> TileCounts {
        counts_of(&self.hand)
    }

    pub fn in_riichi(&self) -> bool {
        self.riichi.is_some()
    }

    pub fn live_wall(&self) -> i32 {
        self.live_wall
    }

    pub fn last_draw(&self) -> Option<Tile> {
        self.last_draw
    }

    pub fn last_discard(&self) -> Option<Pai> {
        self.last_discard
    }

    pub fn is_tsumo(&self) -> bool {
        self.is_tsumo
    }

    pub fn is_three_player(&self) -> bool {
        self.is_three_player
    }

    pub fn is_new_round(&self) -> bool {
        self.is_new_round
    }

    pub fn dora_indicators(&self) -> &[Pai] {
        &self.dora_indicators
    }

    pub fn round(&self) -> &RoundInfo {
        &self.round
    }

    // -- mutations driven by the bridge --

    pub(crate) fn record_draw(&mut self, actor: u8, tile: Option<Tile>) -> ConvResult<()> {
        if self.seating.is_observer(actor) {
            let tile = tile.ok_or_else(|| {
                ConvError::invalid_state("observer draw arrived without a tile index")
            })?;
            self.hand.push(tile);
        }
        self.live_wall -= 1;
        self.last_draw = tile;
        self.is_tsumo = true;
        self.is_new_round = false;
        Ok(())
    }

    /// Removes the first copy of `tile`. Returns `false` when it was absent.
    pub(crate) fn remove_tile(&mut self, tile: Tile) -> bool {
        match self.hand.iter().position(|&t| t == tile) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Takes a call's exposed tiles out of the concealed hand, all or none.
    pub(crate) fn expose(&mut self, meld: &Meld) -> ConvResult<()> {
        if let Some(missing) = meld
            .exposed()
            .iter()
            .find(|t| !self.hand.contains(*t))
        {
            return Err(ConvError::invalid_state(format!(
                "observer called {} without holding {:?}",
                meld.kind(),
                missing
            )));
        }
        for &tile in meld.exposed() {
            self.remove_tile(tile);
        }
        Ok(())
    }

    /// Records a declared call. A kakan replaces the pon it upgrades.
    pub(crate) fn push_meld(&mut self, meld: Meld) {
        if meld.kind() == MeldKind::Kakan
            && let Some(slot) = self
                .melds
                .iter_mut()
                .find(|m| m.kind() == MeldKind::Pon && m.tile_kind() == meld.tile_kind())
        {
            *slot = meld;
            return;
        }
        self.melds.push(meld);
    }

    /// Removes one north tile, for a north exchange. No-op when none held.
    pub(crate) fn remove_north(&mut self) -> bool {
        match self.hand.iter().position(|t| t.label() == Pai::NORTH) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn lock_wait(&mut self) {
        self.riichi = Some(compute_wait_set(&self.counts()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mjconv_engine::decode_meld;

    fn tiles(ids: &[u32]) -> Vec<Tile> {
        ids.iter().map(|&i| Tile::new(i).unwrap()).collect()
    }

    fn state(hand: &[u32]) -> ObserverState {
        ObserverState::new(
            Seating::four_player(0),
            tiles(hand),
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

    #[test]
    fn draws_only_grow_the_observer_hand() {
        let mut s = state(&[0, 4, 8]);
        s.record_draw(1, None).unwrap();
        assert_eq!(s.hand().len(), 3);
        assert_eq!(s.live_wall(), 69);
        assert!(!s.is_new_round());
        s.record_draw(0, Some(Tile::new(12).unwrap())).unwrap();
        assert_eq!(s.hand().len(), 4);
        assert!(s.record_draw(0, None).is_err());
    }

    #[test]
    fn expose_is_all_or_nothing() {
        // pon of white dragons: consumes 125 and 126
        let pon = decode_meld(47723).unwrap();
        let mut short = state(&[125, 0]);
        assert!(matches!(short.expose(&pon), Err(ConvError::InvalidState { .. })));
        assert_eq!(short.hand().len(), 2);

        let mut full = state(&[125, 126, 0]);
        full.expose(&pon).unwrap();
        assert_eq!(full.hand(), &tiles(&[0])[..]);
    }

    #[test]
    fn kakan_upgrades_existing_pon() {
        let mut s = state(&[]);
        // pon of 1m from kamicha, then the added kan on the same kind
        let pon = Meld::Pon {
            target: 3,
            called: Tile::new(0).unwrap(),
            consumed: [Tile::new(2).unwrap(), Tile::new(3).unwrap()],
            unused: Tile::new(1).unwrap(),
        };
        s.push_meld(pon);
        s.push_meld(decode_meld(51).unwrap());
        assert_eq!(s.melds().len(), 1);
        assert_eq!(s.melds()[0].kind(), MeldKind::Kakan);
    }

    #[test]
    fn north_exchange_removes_one_north() {
        let mut s = state(&[120, 121, 0]);
        assert!(s.remove_north());
        assert_eq!(s.hand().len(), 2);
        let mut none = state(&[0]);
        assert!(!none.remove_north());
    }
}
