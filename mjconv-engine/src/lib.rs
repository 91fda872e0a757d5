//! mjconv engine
//!
//! Pure building blocks for translating Tenhou wire events into MJAI:
//! the tile and call codec, the hand-completion check, the wait-set
//! derivation and the normalized event type.

pub mod agari;
pub mod errors;
pub mod meld;
pub mod mjai_event;
pub mod tile;
pub mod types;
pub mod wait;

pub use errors::{ConvError, ConvResult};
pub use meld::{Meld, decode_meld, encode_meld, is_nukidora_code};
pub use mjai_event::Event;
pub use tile::{Pai, Tile, TileKind, decode_tile};
pub use types::{MeldKind, TileCounts, counts_of};
pub use wait::{WaitSet, compute_wait_set};
