//! Normalized MJAI event stream.
//!
//! Seats are absolute. Tiles are MJAI labels. Field order follows the
//! declaration order below, so serializing the same event always yields the
//! same bytes.

use serde::{Deserialize, Serialize};

use crate::errors::ConvResult;
use crate::tile::Pai;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// `id` is the observer's absolute seat.
    #[serde(rename = "start_game")]
    StartGame { id: u8 },
    #[serde(rename = "start_kyoku")]
    StartKyoku {
        bakaze: Pai,
        kyoku: u8,
        honba: u8,
        kyotaku: u8,
        oya: u8,
        dora_marker: Pai,
        scores: Vec<i32>,
        tehais: Vec<Vec<Pai>>,
    },
    #[serde(rename = "tsumo")]
    Tsumo { actor: u8, pai: Pai },
    #[serde(rename = "dahai")]
    Dahai { actor: u8, pai: Pai, tsumogiri: bool },
    #[serde(rename = "chi")]
    Chi {
        actor: u8,
        target: u8,
        pai: Pai,
        consumed: Vec<Pai>,
    },
    #[serde(rename = "pon")]
    Pon {
        actor: u8,
        target: u8,
        pai: Pai,
        consumed: Vec<Pai>,
    },
    #[serde(rename = "daiminkan")]
    Daiminkan {
        actor: u8,
        target: u8,
        pai: Pai,
        consumed: Vec<Pai>,
    },
    #[serde(rename = "kakan")]
    Kakan {
        actor: u8,
        pai: Pai,
        consumed: Vec<Pai>,
    },
    #[serde(rename = "ankan")]
    Ankan { actor: u8, consumed: Vec<Pai> },
    /// North tile set aside (three-player).
    #[serde(rename = "nukidora")]
    Nukidora { actor: u8, pai: Pai },
    #[serde(rename = "reach")]
    Reach { actor: u8 },
    #[serde(rename = "reach_accepted")]
    ReachAccepted {
        actor: u8,
        deltas: Vec<i32>,
        scores: Vec<i32>,
    },
    #[serde(rename = "dora")]
    Dora { dora_marker: Pai },
    #[serde(rename = "end_kyoku")]
    EndKyoku,
    #[serde(rename = "ryukyoku")]
    Ryukyoku { scores: Vec<i32> },
    #[serde(rename = "end_game")]
    EndGame,
}

impl Event {
    /// The seat acting in this event, if it has one.
    pub fn actor(&self) -> Option<u8> {
        match *self {
            Event::Tsumo { actor, .. }
            | Event::Dahai { actor, .. }
            | Event::Chi { actor, .. }
            | Event::Pon { actor, .. }
            | Event::Daiminkan { actor, .. }
            | Event::Kakan { actor, .. }
            | Event::Ankan { actor, .. }
            | Event::Nukidora { actor, .. }
            | Event::Reach { actor }
            | Event::ReachAccepted { actor, .. } => Some(actor),
            _ => None,
        }
    }

    /// The MJAI `type` string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::StartGame { .. } => "start_game",
            Event::StartKyoku { .. } => "start_kyoku",
            Event::Tsumo { .. } => "tsumo",
            Event::Dahai { .. } => "dahai",
            Event::Chi { .. } => "chi",
            Event::Pon { .. } => "pon",
            Event::Daiminkan { .. } => "daiminkan",
            Event::Kakan { .. } => "kakan",
            Event::Ankan { .. } => "ankan",
            Event::Nukidora { .. } => "nukidora",
            Event::Reach { .. } => "reach",
            Event::ReachAccepted { .. } => "reach_accepted",
            Event::Dora { .. } => "dora",
            Event::EndKyoku => "end_kyoku",
            Event::Ryukyoku { .. } => "ryukyoku",
            Event::EndGame => "end_game",
        }
    }

    /// One JSON object, no trailing newline.
    pub fn to_json_line(&self) -> ConvResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
