use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tile::{NUM_TILE_KINDS, Tile};

/// Per-kind tile histogram (each entry 0-4).
pub type TileCounts = [u8; NUM_TILE_KINDS];

/// Converts 136-format tiles into a 34-bin histogram.
#[inline]
pub fn counts_of(tiles: &[Tile]) -> TileCounts {
    let mut counts = [0u8; NUM_TILE_KINDS];
    for tile in tiles {
        let k = tile.kind().index();
        counts[k] = counts[k].saturating_add(1);
    }
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeldKind {
    Chi,
    Pon,
    Kakan,
    Daiminkan,
    Ankan,
}

impl MeldKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            MeldKind::Chi => "chi",
            MeldKind::Pon => "pon",
            MeldKind::Kakan => "kakan",
            MeldKind::Daiminkan => "daiminkan",
            MeldKind::Ankan => "ankan",
        }
    }

    #[inline]
    pub const fn is_kan(self) -> bool {
        matches!(self, MeldKind::Kakan | MeldKind::Daiminkan | MeldKind::Ankan)
    }
}

impl fmt::Display for MeldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
