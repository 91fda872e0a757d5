//! Whole-record translation, sequentially or across many records at once.

use log::info;
use mjconv_engine::{ConvResult, Event};
use rayon::prelude::*;

use crate::bridge::TenhouBridge;
use crate::config::BridgeConfig;
use crate::raw_event::RawEvent;

/// Runs one fresh bridge over a full record and collects every event.
pub fn translate_record(record: &[RawEvent], config: &BridgeConfig) -> ConvResult<Vec<Event>> {
    let mut bridge = TenhouBridge::with_config(*config);
    let mut events = Vec::with_capacity(record.len());
    for raw in record {
        events.extend(bridge.feed(raw)?);
    }
    Ok(events)
}

/// Translates records in parallel, one independent bridge per record.
/// Output order matches input order.
pub fn translate_records(
    records: &[Vec<RawEvent>],
    config: &BridgeConfig,
) -> Vec<ConvResult<Vec<Event>>> {
    let out: Vec<_> = records
        .par_iter()
        .map(|record| translate_record(record, config))
        .collect();
    let failed = out.iter().filter(|r| r.is_err()).count();
    info!("translated {} records ({failed} failed)", records.len());
    out
}

/// Renders events as MJAI JSON lines, newline-terminated.
pub fn to_mjai_lines(events: &[Event]) -> ConvResult<String> {
    let mut out = String::new();
    for event in events {
        out.push_str(&event.to_json_line()?);
        out.push('\n');
    }
    Ok(out)
}
