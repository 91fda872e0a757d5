//! Bridge between the Tenhou wire protocol and the MJAI event stream.
//!
//! One [`TenhouBridge`] follows one game from a single seat. Each raw frame
//! goes in, zero or more normalized events come out, and the observer's
//! concealed hand, calls, wall count and riichi wait are kept up to date so
//! the legal-call queries can be answered between frames.
//!
//! The bridge moves through a small phase machine:
//!
//! ```text
//! Idle --INIT--> InHand --AGARI/RYUUKYOKU--> HandOver --INIT--> InHand ...
//!                                      any frame with `owari` --> GameOver
//! ```
//!
//! A second `AGARI` while the hand is already over is a multiple ron: its
//! winner joins the same [`HandResult`] and nothing is emitted.

use std::collections::BTreeSet;

use log::{debug, trace, warn};
use mjconv_engine::tile::labels;
use mjconv_engine::{
    ConvError, ConvResult, Event, Meld, Pai, Tile, WaitSet, decode_meld, is_nukidora_code,
};

use crate::config::{BridgeConfig, GoType};
use crate::raw_event::{RawEvent, RawTag};
use crate::result::{HandResult, WinRecord, score_pairs};
use crate::seat::Seating;
use crate::state::{ObserverState, RoundInfo};

/// The heartbeat frame the server sends between events.
pub const HEARTBEAT_FRAME: &[u8] = b"<Z/>";

/// Concealed tiles shown for each hidden seat at hand start.
const HIDDEN_HAND_SIZE: usize = 13;

#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    InHand(Box<ObserverState>),
    HandOver(Box<ObserverState>),
    GameOver,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::InHand(_) => "in_hand",
            Phase::HandOver(_) => "hand_over",
            Phase::GameOver => "game_over",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TenhouBridge {
    config: BridgeConfig,
    game_type: Option<GoType>,
    /// Observer's absolute seat, fixed by `TAIKYOKU`.
    seat: u8,
    /// Relative dealer from `TAIKYOKU`, kept to re-derive the seat when a
    /// three-player table is only recognized at the first `INIT`.
    taikyoku_oya: Option<u8>,
    three_player: bool,
    phase: Phase,
    results: Vec<HandResult>,
    final_scores: Option<Vec<i32>>,
}

impl TenhouBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        TenhouBridge {
            config,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn seat(&self) -> u8 {
        self.seat
    }

    pub fn game_type(&self) -> Option<GoType> {
        self.game_type
    }

    pub fn is_three_player(&self) -> bool {
        self.three_player
    }

    pub fn player_count(&self) -> u8 {
        if self.three_player { 3 } else { 4 }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// Observer state of the current or just-finished hand.
    pub fn state(&self) -> Option<&ObserverState> {
        match &self.phase {
            Phase::InHand(state) | Phase::HandOver(state) => Some(state.as_ref()),
            Phase::Idle | Phase::GameOver => None,
        }
    }

    /// Results of every finished hand, in order.
    pub fn results(&self) -> &[HandResult] {
        &self.results
    }

    /// Final scores from the `owari` attribute, absolute seats.
    pub fn final_scores(&self) -> Option<&[i32]> {
        self.final_scores.as_deref()
    }

    // -----------------------------------------------------------------------
    // Legal-call queries
    // -----------------------------------------------------------------------

    fn in_hand(&self) -> ConvResult<&ObserverState> {
        match &self.phase {
            Phase::InHand(state) => Ok(state.as_ref()),
            other => Err(ConvError::invalid_state(format!(
                "no hand in progress (phase {})",
                other.name()
            ))),
        }
    }

    pub fn legal_concealed_kans(&self) -> ConvResult<BTreeSet<[Pai; 4]>> {
        Ok(self.in_hand()?.legal_concealed_kans())
    }

    pub fn legal_kakans(&self) -> ConvResult<BTreeSet<[Pai; 4]>> {
        Ok(self.in_hand()?.legal_kakans())
    }

    pub fn legal_pons(&self, called: Pai) -> ConvResult<BTreeSet<[Pai; 2]>> {
        Ok(self.in_hand()?.legal_pons(called))
    }

    pub fn legal_chis(&self, called: Pai) -> ConvResult<BTreeSet<[Pai; 2]>> {
        Ok(self.in_hand()?.legal_chis(called))
    }

    pub fn locked_wait_set(&self) -> ConvResult<&WaitSet> {
        self.in_hand()?.locked_wait_set()
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    /// Translates one wire frame: the heartbeat or a JSON object.
    pub fn parse(&mut self, frame: &[u8]) -> ConvResult<Vec<Event>> {
        if frame.trim_ascii() == HEARTBEAT_FRAME {
            trace!("heartbeat");
            return Ok(Vec::new());
        }
        let raw = RawEvent::from_json_slice(frame)?;
        self.feed(&raw)
    }

    /// Translates one raw event.
    pub fn feed(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        if self.is_finished() {
            return Err(ConvError::invalid_state(format!(
                "<{}> arrived after the game ended",
                raw.tag
            )));
        }
        if raw.has("owari") {
            return self.on_owari(raw);
        }
        match RawTag::classify(&raw.tag)? {
            RawTag::Go => self.on_go(raw),
            RawTag::Taikyoku => self.on_taikyoku(raw),
            RawTag::Init => self.on_init(raw),
            RawTag::Draw { seat, tile } => self.on_draw(raw, seat, tile),
            RawTag::Discard {
                seat,
                tile,
                lowercase,
            } => self.on_discard(raw, seat, tile, lowercase),
            RawTag::Call => self.on_call(raw),
            RawTag::Reach => self.on_reach(raw),
            RawTag::Dora => self.on_dora(raw),
            RawTag::Agari => self.on_agari(raw),
            RawTag::Ryuukyoku => self.on_ryuukyoku(raw),
            RawTag::Ignored => {
                debug!("ignoring <{}>", raw.tag);
                Ok(Vec::new())
            }
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase.name() != phase.name() {
            debug!("phase {} -> {}", self.phase.name(), phase.name());
        }
        self.phase = phase;
    }

    fn hand_mut(&mut self, tag: &str) -> ConvResult<&mut ObserverState> {
        match &mut self.phase {
            Phase::InHand(state) => Ok(state.as_mut()),
            other => Err(ConvError::invalid_state(format!(
                "<{tag}> needs a hand in progress (phase {})",
                other.name()
            ))),
        }
    }

    /// Relative seat of a draw or discard tag, checked against the table size.
    fn checked_seat(&self, raw: &RawEvent, relative: u8) -> ConvResult<u8> {
        if relative >= self.player_count() {
            return Err(ConvError::shape(
                &raw.tag,
                "tag",
                format!("names seat {relative} at a {}-player table", self.player_count()),
            ));
        }
        Ok(relative)
    }

    fn on_go(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        if let Some(flags) = raw.optional_int("type")? {
            let go = GoType(raw.narrow("type", flags)?);
            if go.is_three_player() {
                self.three_player = true;
            }
            debug!(
                "rules: type={:#x} players={} aka={} level={}",
                go.0,
                go.player_count(),
                go.has_aka(),
                go.table_level()
            );
            self.game_type = Some(go);
        }
        Ok(Vec::new())
    }

    fn on_taikyoku(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let oya = raw.require_seat("oya")?;
        let players = self.player_count();
        self.seat = (players - oya % players) % players;
        self.taikyoku_oya = Some(oya);
        self.results.clear();
        self.set_phase(Phase::Idle);
        debug!("observer sits at seat {}", self.seat);
        Ok(vec![Event::StartGame { id: self.seat }])
    }

    fn on_init(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let seed = raw.require_int_list("seed")?;
        let ten = raw.require_int_list("ten")?;
        let oya = raw.require_seat("oya")?;
        let hai = raw.require_tile_list("hai")?;
        let [round, honba, kyotaku, _, _, dora, ..] = seed[..] else {
            return Err(ConvError::shape(&raw.tag, "seed", "needs six entries"));
        };
        let round: u8 = raw.narrow("seed", round)?;
        let honba: u8 = raw.narrow("seed", honba)?;
        let kyotaku: u8 = raw.narrow("seed", kyotaku)?;
        let dora = Tile::new(raw.narrow("seed", dora)?)?;

        if !self.three_player
            && self.config.detect_sanma_from_scores
            && round == 0
            && honba == 0
            && ten.contains(&0)
        {
            self.three_player = true;
            self.seat = match self.taikyoku_oya {
                Some(oya) => (3 - oya % 3) % 3,
                None => self.seat % 3,
            };
            debug!("zero starting score: three-player table, seat {}", self.seat);
        }

        let seating = Seating::new(self.seat, self.player_count());
        let unit = self.config.score_unit;
        let scores = ten
            .iter()
            .map(|&t| raw.scaled("ten", t, unit))
            .collect::<ConvResult<Vec<_>>>()?;
        let scores = seating.rotate(&scores);

        let tehais = (0..seating.players())
            .map(|abs| {
                if seating.is_observer(abs) {
                    labels(&hai)
                } else {
                    vec![Pai::UNKNOWN; HIDDEN_HAND_SIZE]
                }
            })
            .collect();

        let info = RoundInfo {
            bakaze: Pai::wind(round / 4),
            kyoku: round % 4 + 1,
            honba,
            kyotaku,
            oya: seating.to_absolute(oya),
        };
        let live_wall = self.config.live_wall(self.three_player);
        let state = ObserverState::new(seating, hai, live_wall, info, dora.label());
        self.set_phase(Phase::InHand(Box::new(state)));

        Ok(vec![Event::StartKyoku {
            bakaze: info.bakaze,
            kyoku: info.kyoku,
            honba,
            kyotaku,
            oya: info.oya,
            dora_marker: dora.label(),
            scores,
            tehais,
        }])
    }

    fn on_draw(&mut self, raw: &RawEvent, seat: u8, tile: Option<Tile>) -> ConvResult<Vec<Event>> {
        let seat = self.checked_seat(raw, seat)?;
        let state = self.hand_mut(&raw.tag)?;
        let actor = state.seating.to_absolute(seat);
        state.record_draw(actor, tile)?;
        Ok(vec![Event::Tsumo {
            actor,
            pai: tile.map_or(Pai::UNKNOWN, Pai::from),
        }])
    }

    fn on_discard(
        &mut self,
        raw: &RawEvent,
        seat: u8,
        tile: Option<Tile>,
        lowercase: bool,
    ) -> ConvResult<Vec<Event>> {
        let seat = self.checked_seat(raw, seat)?;
        let state = self.hand_mut(&raw.tag)?;
        let actor = state.seating.to_absolute(seat);
        let tile = tile.or(state.last_draw).ok_or_else(|| {
            ConvError::invalid_state(format!(
                "<{}> names no tile and nothing was drawn",
                raw.tag
            ))
        })?;
        let tsumogiri = lowercase || state.last_draw == Some(tile);

        if state.seating.is_observer(actor) && !state.remove_tile(tile) {
            warn!("observer discarded {tile:?} which is not in hand; hand left unchanged");
        }
        state.is_tsumo = false;
        state.last_draw = None;
        state.last_discard = Some(tile.label());

        Ok(vec![Event::Dahai {
            actor,
            pai: tile.label(),
            tsumogiri,
        }])
    }

    fn on_call(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        if !raw.has("m") {
            debug!("ignoring <N> without a call code");
            return Ok(Vec::new());
        }
        let code: u32 = raw.require_small("m")?;
        let who = raw.require_seat("who")?;
        let who = self.checked_seat(raw, who)?;
        let state = self.hand_mut(&raw.tag)?;
        let actor = state.seating.to_absolute(who);
        let by_observer = state.seating.is_observer(actor);

        if is_nukidora_code(code) {
            state.last_draw = None;
            if by_observer && !state.remove_north() {
                warn!("observer set aside a north tile it does not hold");
            }
            return Ok(vec![Event::Nukidora {
                actor,
                pai: Pai::NORTH,
            }]);
        }

        let meld = decode_meld(code)?;
        if by_observer {
            state.expose(&meld)?;
            state.push_meld(meld);
        }
        state.last_draw = None;

        let seating = state.seating;
        let consumed = labels(meld.consumed());
        let event = match meld {
            Meld::Chi { called, .. } => Event::Chi {
                actor,
                target: seating.previous(actor),
                pai: called.label(),
                consumed,
            },
            Meld::Pon { target, called, .. } => Event::Pon {
                actor,
                target: seating.offset(actor, target),
                pai: called.label(),
                consumed,
            },
            Meld::Daiminkan { target, called, .. } => Event::Daiminkan {
                actor,
                target: seating.offset(actor, target),
                pai: called.label(),
                consumed,
            },
            Meld::Kakan { added, .. } => Event::Kakan {
                actor,
                pai: added.label(),
                consumed,
            },
            Meld::Ankan { .. } => Event::Ankan { actor, consumed },
        };
        Ok(vec![event])
    }

    fn on_reach(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let step = raw.require_int("step")?;
        let who = raw.require_seat("who")?;
        let who = self.checked_seat(raw, who)?;
        let deposit = self.config.riichi_deposit;
        let unit = self.config.score_unit;
        let state = self.hand_mut(&raw.tag)?;
        let seating = state.seating;
        let actor = seating.to_absolute(who);

        match step {
            1 => Ok(vec![Event::Reach { actor }]),
            2 => {
                let ten = raw.require_scaled_list("ten", unit)?;
                if seating.is_observer(actor) {
                    state.lock_wait();
                    debug!("riichi locked wait {:?}", state.riichi);
                }
                let mut deltas = vec![0; usize::from(seating.players())];
                deltas[usize::from(actor)] = -deposit;
                Ok(vec![Event::ReachAccepted {
                    actor,
                    deltas,
                    scores: seating.rotate(&ten),
                }])
            }
            other => Err(ConvError::shape(
                &raw.tag,
                "step",
                format!("must be 1 or 2, got {other}"),
            )),
        }
    }

    fn on_dora(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let marker = raw.require_tile("hai")?.label();
        let state = self.hand_mut(&raw.tag)?;
        state.dora_indicators.push(marker);
        Ok(vec![Event::Dora {
            dora_marker: marker,
        }])
    }

    /// Seating of the current or just-finished hand.
    fn hand_seating(&self, tag: &str) -> ConvResult<Seating> {
        self.state().map(ObserverState::seating).ok_or_else(|| {
            ConvError::invalid_state(format!("<{tag}> outside a hand (phase {})", self.phase.name()))
        })
    }

    /// Files a win under the current hand. Returns `true` when it opened a
    /// new result, `false` when it joined a multiple ron.
    fn record_win(&mut self, win: WinRecord) -> bool {
        match std::mem::take(&mut self.phase) {
            Phase::InHand(state) => {
                self.results.push(HandResult::Win {
                    winners: vec![win],
                });
                debug!("phase in_hand -> hand_over (win)");
                self.phase = Phase::HandOver(state);
                true
            }
            other => {
                self.phase = other;
                match self.results.last_mut() {
                    Some(HandResult::Win { winners }) => winners.push(win),
                    _ => self.results.push(HandResult::Win {
                        winners: vec![win],
                    }),
                }
                debug!("additional winner joins the previous hand");
                false
            }
        }
    }

    fn on_agari(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let seating = self.hand_seating(&raw.tag)?;
        let win = WinRecord::from_raw(raw, seating, self.config.score_unit)?;
        if self.record_win(win) {
            Ok(vec![Event::EndKyoku])
        } else {
            Ok(Vec::new())
        }
    }

    fn on_ryuukyoku(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let seating = self.hand_mut(&raw.tag)?.seating;
        let unit = self.config.score_unit;
        let (before, deltas) = score_pairs(raw, seating, unit)?;
        let scores = before
            .iter()
            .zip(&deltas)
            .map(|(b, d)| {
                b.checked_add(*d)
                    .ok_or_else(|| ConvError::shape(&raw.tag, "sc", "score after delta overflows"))
            })
            .collect::<ConvResult<Vec<_>>>()?;
        let result = HandResult::draw_from_raw(raw, seating, unit)?;
        self.results.push(result);
        if let Phase::InHand(state) = std::mem::take(&mut self.phase) {
            debug!("phase in_hand -> hand_over (draw)");
            self.phase = Phase::HandOver(state);
        }
        Ok(vec![Event::Ryukyoku { scores }, Event::EndKyoku])
    }

    fn on_owari(&mut self, raw: &RawEvent) -> ConvResult<Vec<Event>> {
        let seating = self
            .state()
            .map(ObserverState::seating)
            .unwrap_or_else(|| Seating::new(self.seat, self.player_count()));
        let unit = self.config.score_unit;
        let finals = seating.rotate(&parse_owari(raw, unit)?);
        match raw.tag.as_str() {
            "AGARI" if self.state().is_some() => {
                let win = WinRecord::from_raw(raw, seating, unit)?;
                self.record_win(win);
            }
            "RYUUKYOKU" if matches!(self.phase, Phase::InHand(_)) => {
                self.results.push(HandResult::draw_from_raw(raw, seating, unit)?);
            }
            _ => {}
        }
        self.final_scores = Some(finals);
        self.set_phase(Phase::GameOver);
        Ok(vec![Event::EndGame])
    }
}

/// Final scores from `owari` (`score0,uma0,score1,uma1,...`); the uma
/// entries may be fractional and are skipped.
fn parse_owari(raw: &RawEvent, unit: i32) -> ConvResult<Vec<i32>> {
    raw.require("owari")?
        .split(',')
        .step_by(2)
        .map(|score| {
            let value = score
                .trim()
                .parse::<i64>()
                .map_err(|_| ConvError::shape(&raw.tag, "owari", format!("bad score {score:?}")))?;
            raw.scaled("owari", value, unit)
        })
        .collect()
}
