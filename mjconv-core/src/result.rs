//! Numeric hand outcomes parsed from `AGARI` and `RYUUKYOKU`.

use mjconv_engine::{ConvError, ConvResult};
use serde::{Deserialize, Serialize};

use crate::raw_event::RawEvent;
use crate::seat::Seating;

/// One winner of a hand. Seats are absolute; points are in points, not
/// wire units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub who: u8,
    /// Equal to `who` for a self-draw.
    pub from_who: u8,
    pub fu: i32,
    pub points: i32,
    /// Limit-hand rank (0 none, 1 mangan .. 5 yakuman).
    pub limit: u8,
    /// `(yaku id, han)` pairs.
    pub yaku: Vec<(u8, u8)>,
    pub yakuman: Vec<u8>,
    /// Score change per absolute seat.
    pub deltas: Vec<i32>,
}

impl WinRecord {
    pub fn is_tsumo(&self) -> bool {
        self.who == self.from_who
    }

    pub fn from_raw(raw: &RawEvent, seating: Seating, unit: i32) -> ConvResult<Self> {
        let who = seating.to_absolute(raw.require_seat("who")?);
        let from_who = seating.to_absolute(raw.require_seat("fromWho")?);

        let ten = raw.require_int_list("ten")?;
        let [fu, points, limit] = ten[..] else {
            return Err(ConvError::shape(&raw.tag, "ten", "needs fu,points,limit"));
        };

        let yaku = match raw.optional_int_list("yaku")? {
            Some(list) => {
                if list.len() % 2 != 0 {
                    return Err(ConvError::shape(&raw.tag, "yaku", "needs id,han pairs"));
                }
                list.chunks_exact(2)
                    .map(|pair| -> ConvResult<(u8, u8)> {
                        Ok((raw.narrow("yaku", pair[0])?, raw.narrow("yaku", pair[1])?))
                    })
                    .collect::<ConvResult<Vec<_>>>()?
            }
            None => Vec::new(),
        };
        let yakuman: Vec<u8> = raw
            .optional_int_list("yakuman")?
            .unwrap_or_default()
            .into_iter()
            .map(|id| raw.narrow("yakuman", id))
            .collect::<ConvResult<Vec<_>>>()?;

        Ok(WinRecord {
            who,
            from_who,
            fu: raw.narrow("ten", fu)?,
            points: raw.narrow("ten", points)?,
            limit: raw.narrow("ten", limit)?,
            yaku,
            yakuman,
            deltas: score_deltas(raw, seating, unit)?,
        })
    }
}

/// `sc` is `before0,delta0,before1,delta1,...` in wire units, relative
/// order. Returns `(before, delta)` per absolute seat, in points.
pub(crate) fn score_pairs(
    raw: &RawEvent,
    seating: Seating,
    unit: i32,
) -> ConvResult<(Vec<i32>, Vec<i32>)> {
    let sc = raw.require_int_list("sc")?;
    if sc.len() % 2 != 0 {
        return Err(ConvError::shape(&raw.tag, "sc", "needs score,delta pairs"));
    }
    let mut before = Vec::with_capacity(sc.len() / 2);
    let mut delta = Vec::with_capacity(sc.len() / 2);
    for pair in sc.chunks_exact(2) {
        before.push(raw.scaled("sc", pair[0], unit)?);
        delta.push(raw.scaled("sc", pair[1], unit)?);
    }
    Ok((seating.rotate(&before), seating.rotate(&delta)))
}

fn score_deltas(raw: &RawEvent, seating: Seating, unit: i32) -> ConvResult<Vec<i32>> {
    Ok(score_pairs(raw, seating, unit)?.1)
}

/// Why a hand ended without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    /// Wall ran out.
    Exhaustive,
    /// Nine different terminals and honors in the opening hand (`yao9`).
    NineTerminals,
    /// Same wind discarded by all four on the first turn (`kaze4`).
    FourWinds,
    /// Four riichi declarations (`reach4`).
    FourRiichi,
    /// Three players ron the same discard (`ron3`).
    TripleRon,
    /// Four kans by different players (`kan4`).
    FourKans,
    /// Nagashi mangan (`nm`).
    NagashiMangan,
    Other,
}

impl DrawReason {
    /// Maps the `type` attribute; absent means the wall ran out.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            None | Some("") => DrawReason::Exhaustive,
            Some("yao9") => DrawReason::NineTerminals,
            Some("kaze4") => DrawReason::FourWinds,
            Some("reach4") => DrawReason::FourRiichi,
            Some("ron3") => DrawReason::TripleRon,
            Some("kan4") => DrawReason::FourKans,
            Some("nm") => DrawReason::NagashiMangan,
            Some(_) => DrawReason::Other,
        }
    }
}

/// How one hand ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandResult {
    /// One or more winners, in announcement order.
    Win { winners: Vec<WinRecord> },
    Draw {
        reason: DrawReason,
        deltas: Vec<i32>,
        /// Absolute seats that showed a ready hand.
        tenpai: Vec<u8>,
    },
}

impl HandResult {
    pub fn draw_from_raw(raw: &RawEvent, seating: Seating, unit: i32) -> ConvResult<Self> {
        let tenpai = (0..4u8)
            .filter(|rel| raw.has(&format!("hai{rel}")))
            .map(|rel| seating.to_absolute(rel))
            .collect();
        Ok(HandResult::Draw {
            reason: DrawReason::from_code(raw.get("type")),
            deltas: score_deltas(raw, seating, unit)?,
            tenpai,
        })
    }

    pub fn winners(&self) -> &[WinRecord] {
        match self {
            HandResult::Win { winners } => winners,
            HandResult::Draw { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agari() -> RawEvent {
        RawEvent::new("AGARI")
            .with("who", 1)
            .with("fromWho", 3)
            .with("ten", "30,7700,0")
            .with("yaku", "1,1,7,1,54,2")
            .with("sc", "250,0,250,77,250,-77,250,0")
    }

    #[test]
    fn win_record_in_absolute_seats() {
        let seating = Seating::four_player(2);
        let win = WinRecord::from_raw(&agari(), seating, 100).unwrap();
        assert_eq!(win.who, 3);
        assert_eq!(win.from_who, 1);
        assert_eq!((win.fu, win.points, win.limit), (30, 7700, 0));
        assert_eq!(win.yaku, vec![(1, 1), (7, 1), (54, 2)]);
        assert!(win.yakuman.is_empty());
        // relative [0, 7700, -7700, 0] seen from seat 2
        assert_eq!(win.deltas, vec![-7700, 0, 0, 7700]);
        assert!(!win.is_tsumo());
    }

    #[test]
    fn win_record_needs_full_ten() {
        let raw = agari().with("ten", "30,7700");
        assert!(matches!(
            WinRecord::from_raw(&raw, Seating::four_player(0), 100),
            Err(ConvError::ProtocolShape { .. })
        ));
    }

    #[test]
    fn draw_reason_codes() {
        assert_eq!(DrawReason::from_code(None), DrawReason::Exhaustive);
        assert_eq!(DrawReason::from_code(Some("yao9")), DrawReason::NineTerminals);
        assert_eq!(DrawReason::from_code(Some("nm")), DrawReason::NagashiMangan);
        assert_eq!(DrawReason::from_code(Some("???")), DrawReason::Other);
    }

    #[test]
    fn draw_lists_tenpai_seats() {
        let raw = RawEvent::new("RYUUKYOKU")
            .with("sc", "250,15,250,-15,250,-15,250,15")
            .with("hai0", "1,2,3")
            .with("hai3", "4,5,6");
        let result = HandResult::draw_from_raw(&raw, Seating::four_player(1), 100).unwrap();
        match result {
            HandResult::Draw { reason, deltas, tenpai } => {
                assert_eq!(reason, DrawReason::Exhaustive);
                assert_eq!(deltas, vec![1500, 1500, -1500, -1500]);
                assert_eq!(tenpai, vec![1, 0]);
            }
            other => panic!("expected draw, got {other:?}"),
        }
    }

    #[test]
    fn results_serialize_with_kind_tag() {
        let json = serde_json::to_string(&HandResult::Draw {
            reason: DrawReason::FourWinds,
            deltas: vec![0; 4],
            tenpai: vec![],
        })
        .unwrap();
        assert!(json.starts_with(r#"{"kind":"draw","reason":"four_winds""#));
    }
}
