//! Bit-packed call codes of the Tenhou wire protocol.
//!
//! Layout of the 16-bit `m` attribute, low bit first:
//!
//! | bits  | chi               | pon / kakan          | daiminkan / ankan |
//! |-------|-------------------|----------------------|-------------------|
//! | 0-1   | relative target   | relative target      | relative target   |
//! | 2     | chi flag          | 0                    | 0                 |
//! | 3     | copy of 1st tile  | pon flag             | 0                 |
//! | 4     | copy of 1st tile  | kakan flag           | 0                 |
//! | 5-6   | copy of 2nd tile  | unused / added copy  | -                 |
//! | 7-8   | copy of 3rd tile  | -                    | -                 |
//! | 9-15  | run * 3 + called  | kind * 3 + called    | called index (8-15) |

use crate::errors::{ConvError, ConvResult};
use crate::tile::{Tile, TileKind};
use crate::types::MeldKind;

pub const CHI_FLAG: u32 = 1 << 2;
pub const PON_FLAG: u32 = 1 << 3;
pub const KAKAN_FLAG: u32 = 1 << 4;

const NUKIDORA_MASK: u32 = 0x3F;
const NUKIDORA_CODE: u32 = 0x20;

/// One declared call, as decoded from the wire.
///
/// `target` is the encoded relative offset of the seat the tile came from
/// (1 = next seat, 2 = opposite, 3 = previous). Tile order always puts the
/// called (or added) tile first, matching the order the wire code implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meld {
    Chi {
        target: u8,
        /// Position of the called tile inside the ascending run (0-2).
        position: u8,
        called: Tile,
        consumed: [Tile; 2],
    },
    Pon {
        target: u8,
        called: Tile,
        consumed: [Tile; 2],
        /// The copy that stayed out of the triplet.
        unused: Tile,
    },
    Kakan {
        target: u8,
        added: Tile,
        /// The original pon, called tile first.
        pon: [Tile; 3],
    },
    Daiminkan {
        target: u8,
        called: Tile,
        consumed: [Tile; 3],
    },
    Ankan {
        tiles: [Tile; 4],
    },
}

impl Meld {
    pub fn kind(&self) -> MeldKind {
        match self {
            Meld::Chi { .. } => MeldKind::Chi,
            Meld::Pon { .. } => MeldKind::Pon,
            Meld::Kakan { .. } => MeldKind::Kakan,
            Meld::Daiminkan { .. } => MeldKind::Daiminkan,
            Meld::Ankan { .. } => MeldKind::Ankan,
        }
    }

    /// Encoded relative target; 0 for a concealed kan.
    pub fn relative_target(&self) -> u8 {
        match *self {
            Meld::Chi { target, .. }
            | Meld::Pon { target, .. }
            | Meld::Kakan { target, .. }
            | Meld::Daiminkan { target, .. } => target,
            Meld::Ankan { .. } => 0,
        }
    }

    /// The tile the event names as `pai`: the called tile, or the added tile
    /// of a kakan. A concealed kan has none.
    pub fn called(&self) -> Option<Tile> {
        match *self {
            Meld::Chi { called, .. } | Meld::Pon { called, .. } | Meld::Daiminkan { called, .. } => {
                Some(called)
            }
            Meld::Kakan { added, .. } => Some(added),
            Meld::Ankan { .. } => None,
        }
    }

    /// Tiles listed as `consumed` in the normalized event.
    pub fn consumed(&self) -> &[Tile] {
        match self {
            Meld::Chi { consumed, .. } | Meld::Pon { consumed, .. } => consumed,
            Meld::Kakan { pon, .. } => pon,
            Meld::Daiminkan { consumed, .. } => consumed,
            Meld::Ankan { tiles } => tiles,
        }
    }

    /// Tiles that leave the caller's concealed hand when the call is made.
    pub fn exposed(&self) -> &[Tile] {
        match self {
            Meld::Chi { consumed, .. } | Meld::Pon { consumed, .. } => consumed,
            Meld::Kakan { added, .. } => std::slice::from_ref(added),
            Meld::Daiminkan { consumed, .. } => consumed,
            Meld::Ankan { tiles } => tiles,
        }
    }

    /// Every tile of the meld, called or added tile first.
    pub fn tiles(&self) -> Vec<Tile> {
        match self {
            Meld::Ankan { tiles } => tiles.to_vec(),
            _ => self.called().into_iter().chain(self.consumed().iter().copied()).collect(),
        }
    }

    /// The kind a pon or kan is made of; for a chi, the called tile's kind.
    pub fn tile_kind(&self) -> TileKind {
        match *self {
            Meld::Ankan { tiles } => tiles[0].kind(),
            Meld::Kakan { added, .. } => added.kind(),
            Meld::Chi { called, .. } | Meld::Pon { called, .. } | Meld::Daiminkan { called, .. } => {
                called.kind()
            }
        }
    }
}

/// `true` when the code announces a north-tile exchange (three-player)
/// rather than a call. Must be checked before [`decode_meld`].
#[inline]
pub fn is_nukidora_code(raw: u32) -> bool {
    raw & NUKIDORA_MASK == NUKIDORA_CODE
}

/// Decodes a wire call code. The flag bits are tested in priority order
/// chi, pon, kakan; with none set the target field separates an open kan
/// (non-zero) from a concealed one (zero).
pub fn decode_meld(raw: u32) -> ConvResult<Meld> {
    if raw > u32::from(u16::MAX) {
        return Err(ConvError::decode("call code", raw));
    }
    if raw & CHI_FLAG != 0 {
        decode_chi(raw)
    } else if raw & PON_FLAG != 0 {
        decode_pon(raw)
    } else if raw & KAKAN_FLAG != 0 {
        decode_kakan(raw)
    } else {
        decode_kan(raw)
    }
}

#[inline]
fn target_of(raw: u32) -> u8 {
    (raw & 0x3) as u8
}

fn kind_at(id: u32, raw: u32) -> ConvResult<TileKind> {
    u8::try_from(id)
        .ok()
        .and_then(TileKind::new)
        .ok_or_else(|| ConvError::decode("call code", raw))
}

fn decode_chi(raw: u32) -> ConvResult<Meld> {
    let t = raw >> 10;
    let position = (t % 3) as usize;
    let run = t / 3;
    if run >= 21 {
        return Err(ConvError::decode("call code", raw));
    }
    // 7 possible run starts per suit
    let base = run / 7 * 9 + run % 7;
    let tile_at = |i: u32| -> ConvResult<Tile> {
        let copy = (raw >> (3 + 2 * i)) & 0x3;
        Ok(kind_at(base + i, raw)?.copies()[copy as usize])
    };
    let mut tiles = [tile_at(0)?, tile_at(1)?, tile_at(2)?];
    tiles.swap(0, position);
    let [called, c0, c1] = tiles;
    Ok(Meld::Chi {
        target: target_of(raw),
        position: position as u8,
        called,
        consumed: [c0, c1],
    })
}

/// Splits the four copies of `kind` into the one at `skip` and the other
/// three in copy order.
fn split_copies(kind: TileKind, skip: usize) -> (Tile, [Tile; 3]) {
    let copies = kind.copies();
    let mut rest = [copies[0]; 3];
    let mut j = 0;
    for (i, &tile) in copies.iter().enumerate() {
        if i != skip {
            rest[j] = tile;
            j += 1;
        }
    }
    (copies[skip], rest)
}

fn decode_triplet(raw: u32) -> ConvResult<(Tile, [Tile; 3])> {
    let odd_copy = ((raw >> 5) & 0x3) as usize;
    let t = raw >> 9;
    let position = (t % 3) as usize;
    let kind = kind_at(t / 3, raw)?;
    let (odd, mut rest) = split_copies(kind, odd_copy);
    rest.swap(0, position);
    Ok((odd, rest))
}

fn decode_pon(raw: u32) -> ConvResult<Meld> {
    let (unused, [called, c0, c1]) = decode_triplet(raw)?;
    Ok(Meld::Pon {
        target: target_of(raw),
        called,
        consumed: [c0, c1],
        unused,
    })
}

fn decode_kakan(raw: u32) -> ConvResult<Meld> {
    let (added, pon) = decode_triplet(raw)?;
    Ok(Meld::Kakan {
        target: target_of(raw),
        added,
        pon,
    })
}

fn decode_kan(raw: u32) -> ConvResult<Meld> {
    let called = Tile::new(raw >> 8).map_err(|_| ConvError::decode("call code", raw))?;
    let mut tiles = called.kind().copies();
    tiles.swap(0, called.copy() as usize);
    Ok(match target_of(raw) {
        0 => Meld::Ankan { tiles },
        target => {
            let [called, c0, c1, c2] = tiles;
            Meld::Daiminkan {
                target,
                called,
                consumed: [c0, c1, c2],
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Packs a meld back into its wire code. Inverse of [`decode_meld`] for
/// every meld it produces; bits the decoder ignores come out zero.
pub fn encode_meld(meld: &Meld) -> ConvResult<u16> {
    let invalid = || ConvError::invalid_state(format!("cannot encode {meld:?}"));
    let raw = match *meld {
        Meld::Chi {
            target,
            position,
            called,
            consumed: [c0, c1],
        } => {
            let p = position as usize;
            if p > 2 {
                return Err(invalid());
            }
            let mut run = [called, c0, c1];
            run.swap(0, p);
            let base = run[0].kind();
            let number = base.number().ok_or_else(invalid)?;
            if number > 7 || run.iter().enumerate().any(|(i, t)| t.kind().id() != base.id() + i as u8) {
                return Err(invalid());
            }
            let suit = u32::from(base.id() / 9);
            let t = (suit * 7 + u32::from(number - 1)) * 3 + p as u32;
            let copies = run
                .iter()
                .enumerate()
                .fold(0u32, |acc, (i, tile)| acc | u32::from(tile.copy()) << (3 + 2 * i));
            t << 10 | copies | CHI_FLAG | u32::from(target & 0x3)
        }
        Meld::Pon {
            target,
            called,
            consumed,
            unused,
        } => {
            let t = encode_triplet(called, &consumed, unused).ok_or_else(invalid)?;
            t << 9 | u32::from(unused.copy()) << 5 | PON_FLAG | u32::from(target & 0x3)
        }
        Meld::Kakan { target, added, pon } => {
            let t = encode_triplet(pon[0], &pon[1..], added).ok_or_else(invalid)?;
            t << 9 | u32::from(added.copy()) << 5 | KAKAN_FLAG | u32::from(target & 0x3)
        }
        Meld::Daiminkan { target, called, .. } => {
            if target == 0 || target > 3 {
                return Err(invalid());
            }
            u32::from(called.id()) << 8 | u32::from(target)
        }
        Meld::Ankan { tiles } => u32::from(tiles[0].id()) << 8,
    };
    u16::try_from(raw).map_err(|_| invalid())
}

/// `kind * 3 + position of the first tile among the three kept copies`.
fn encode_triplet(first: Tile, others: &[Tile], odd: Tile) -> Option<u32> {
    let kind = first.kind();
    if odd.kind() != kind || others.iter().any(|t| t.kind() != kind || *t == odd) {
        return None;
    }
    let (_, kept) = split_copies(kind, odd.copy() as usize);
    let position = kept.iter().position(|&t| t == first)?;
    Some(u32::from(kind.id()) * 3 + position as u32)
}
