//! mjconv core
//!
//! Stateful translation of the Tenhou wire protocol into MJAI events, seen
//! from one observing seat. Built on the codec and hand engine in
//! `mjconv-engine`.

pub mod batch;
pub mod bridge;
pub mod config;
pub mod legal;
pub mod raw_event;
pub mod result;
pub mod seat;
pub mod state;

pub use batch::{to_mjai_lines, translate_record, translate_records};
pub use bridge::{Phase, TenhouBridge};
pub use config::{BridgeConfig, GoType};
pub use raw_event::{RawEvent, RawTag};
pub use result::{DrawReason, HandResult, WinRecord};
pub use seat::Seating;
pub use state::{ObserverState, RoundInfo};

pub use mjconv_engine::{ConvError, ConvResult, Event, Pai};
