//! Tile representation: physical 136-format indices, the 34 tile kinds and
//! the MJAI labels that appear in the normalized stream.
//!
//! A physical tile index maps to its kind by integer division by 4. The
//! 0th copy of each numeral five is the red five (aka-dora); that flag is
//! carried next to the kind, never folded into it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ConvError, ConvResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of distinct tile kinds (0-33).
pub const NUM_TILE_KINDS: usize = 34;

/// Number of tiles per suited category (1-9).
pub const NUM_SUIT_TILES: usize = 9;

/// Total physical tiles in a standard set.
pub const NUM_TILES_136: usize = 136;

/// First honor kind; everything below is a numbered suit.
pub const JIHAI_START: u8 = 27;

pub const EAST: u8 = 27;
pub const NORTH: u8 = 30;

/// Red 5m in 136-format.
pub const AKA_MANZU_136: u8 = 16;
/// Red 5p in 136-format.
pub const AKA_PINZU_136: u8 = 52;
/// Red 5s in 136-format.
pub const AKA_SOUZU_136: u8 = 88;

/// Extended label ids for the red fives, following the 34 plain kinds.
pub const AKA_MANZU_LABEL: u8 = 34;
pub const AKA_PINZU_LABEL: u8 = 35;
pub const AKA_SOUZU_LABEL: u8 = 36;
/// Extended label id for a tile hidden from the observer.
pub const UNKNOWN_LABEL: u8 = 37;

/// The 13 terminal and honor kinds (yaochuuhai).
pub const TERMINALS_AND_HONORS: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

/// MJAI names indexed by extended label id.
const PAI_NAMES: [&str; 38] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1p", "2p", "3p", "4p", "5p", "6p", "7p",
    "8p", "9p", "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", "E", "S", "W", "N", "P", "F",
    "C", "5mr", "5pr", "5sr", "?",
];

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// The four tile categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Manzu = 0,
    Pinzu = 1,
    Souzu = 2,
    Jihai = 3,
}

// ---------------------------------------------------------------------------
// TileKind
// ---------------------------------------------------------------------------

/// A tile kind in the range 0-33.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKind(u8);

impl TileKind {
    /// Creates a `TileKind` if `id` is in range 0..34.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < NUM_TILE_KINDS as u8 {
            Some(TileKind(id))
        } else {
            None
        }
    }

    /// Raw numeric id (0-33).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn suit(self) -> Suit {
        match self.0 {
            0..9 => Suit::Manzu,
            9..18 => Suit::Pinzu,
            18..27 => Suit::Souzu,
            _ => Suit::Jihai,
        }
    }

    /// 1-based number within the suit (1-9), or `None` for honor tiles.
    #[inline]
    pub const fn number(self) -> Option<u8> {
        if self.0 < JIHAI_START {
            Some((self.0 % NUM_SUIT_TILES as u8) + 1)
        } else {
            None
        }
    }

    /// True for 1 or 9 of any suit.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        if self.0 >= JIHAI_START {
            return false;
        }
        let num = self.0 % NUM_SUIT_TILES as u8;
        num == 0 || num == 8
    }

    /// True for wind or dragon tiles (27-33).
    #[inline]
    pub const fn is_honor(self) -> bool {
        self.0 >= JIHAI_START
    }

    #[inline]
    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_terminal() || self.is_honor()
    }

    #[inline]
    pub const fn is_suited(self) -> bool {
        self.0 < JIHAI_START
    }

    /// The four physical copies of this kind, copy 0 first.
    #[inline]
    pub const fn copies(self) -> [Tile; 4] {
        let base = self.0 * 4;
        [Tile(base), Tile(base + 1), Tile(base + 2), Tile(base + 3)]
    }

    /// The plain (non-red) label of this kind.
    #[inline]
    pub const fn label(self) -> Pai {
        Pai(self.0)
    }
}

impl fmt::Debug for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileKind({}={})", self.0, PAI_NAMES[self.0 as usize])
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PAI_NAMES[self.0 as usize])
    }
}

// ---------------------------------------------------------------------------
// Tile (136-format)
// ---------------------------------------------------------------------------

/// One physical tile, 0-135.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(u8);

impl Tile {
    /// Validates a raw wire index.
    #[inline]
    pub fn new(index: u32) -> ConvResult<Self> {
        if index < NUM_TILES_136 as u32 {
            Ok(Tile(index as u8))
        } else {
            Err(ConvError::decode("tile index", index))
        }
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn kind(self) -> TileKind {
        TileKind(self.0 / 4)
    }

    /// Which of the four copies of its kind this tile is.
    #[inline]
    pub const fn copy(self) -> u8 {
        self.0 % 4
    }

    /// Index 16 = red 5m, 52 = red 5p, 88 = red 5s.
    #[inline]
    pub const fn is_aka(self) -> bool {
        matches!(self.0, AKA_MANZU_136 | AKA_PINZU_136 | AKA_SOUZU_136)
    }

    #[inline]
    pub const fn label(self) -> Pai {
        match self.0 {
            AKA_MANZU_136 => Pai(AKA_MANZU_LABEL),
            AKA_PINZU_136 => Pai(AKA_PINZU_LABEL),
            AKA_SOUZU_136 => Pai(AKA_SOUZU_LABEL),
            t => Pai(t / 4),
        }
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({}={})", self.0, self.label())
    }
}

/// Maps a raw tile index to its kind and red-five flag.
pub fn decode_tile(index: u32) -> ConvResult<(TileKind, bool)> {
    let tile = Tile::new(index)?;
    Ok((tile.kind(), tile.is_aka()))
}

/// Labels for a run of physical tiles, in order.
pub fn labels(tiles: &[Tile]) -> Vec<Pai> {
    tiles.iter().map(|t| t.label()).collect()
}

// ---------------------------------------------------------------------------
// Pai (MJAI label)
// ---------------------------------------------------------------------------

/// The MJAI identity of a tile: one of the 34 kinds, one of the three red
/// fives, or `?` for a tile the observer cannot see.
///
/// Serializes as its MJAI string (`"5mr"`, `"E"`, `"?"`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pai(u8);

impl Pai {
    pub const UNKNOWN: Pai = Pai(UNKNOWN_LABEL);
    pub const NORTH: Pai = Pai(NORTH);

    /// Wind label for a round wind index (0 = East .. 3 = North).
    #[inline]
    pub const fn wind(index: u8) -> Pai {
        Pai(EAST + index % 4)
    }

    /// Raw extended id (0-37).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_red(self) -> bool {
        matches!(self.0, AKA_MANZU_LABEL | AKA_PINZU_LABEL | AKA_SOUZU_LABEL)
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == UNKNOWN_LABEL
    }

    /// The kind behind this label, with the red flag stripped.
    #[inline]
    pub const fn kind(self) -> Option<TileKind> {
        match self.0 {
            AKA_MANZU_LABEL => Some(Tile(AKA_MANZU_136).kind()),
            AKA_PINZU_LABEL => Some(Tile(AKA_PINZU_136).kind()),
            AKA_SOUZU_LABEL => Some(Tile(AKA_SOUZU_136).kind()),
            UNKNOWN_LABEL => None,
            k => Some(TileKind(k)),
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        PAI_NAMES[self.0 as usize]
    }
}

impl From<Tile> for Pai {
    fn from(tile: Tile) -> Self {
        tile.label()
    }
}

impl fmt::Debug for Pai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pai({})", self.as_str())
    }
}

impl fmt::Display for Pai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pai {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PAI_NAMES
            .iter()
            .position(|&name| name == s)
            .map(|id| Pai(id as u8))
            .ok_or_else(|| ConvError::decode("tile label", s))
    }
}

impl Serialize for Pai {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pai {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
