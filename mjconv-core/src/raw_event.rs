//! Inbound Tenhou frames: a tag plus flat string attributes.
//!
//! Frames arrive as JSON objects such as
//! `{"tag":"INIT","seed":"0,0,0,2,4,98","ten":"250,250,250,250","oya":"0","hai":"..."}`.
//! Attribute values may be strings or plain numbers; numbers are kept in
//! their decimal text form so every attribute reads the same way.

use std::collections::BTreeMap;

use mjconv_engine::{ConvError, ConvResult, Tile};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One raw wire event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct RawEvent {
    pub tag: String,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, String>,
}

impl TryFrom<Map<String, Value>> for RawEvent {
    type Error = ConvError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut tag = None;
        let mut attrs = BTreeMap::new();
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::Number(n) => Ok(n.to_string()),
                        Value::String(s) => Ok(s.clone()),
                        _ => Err(ConvError::shape("?", &key, "holds a nested value")),
                    })
                    .collect::<ConvResult<Vec<_>>>()?
                    .join(","),
                Value::Null | Value::Object(_) => {
                    return Err(ConvError::shape("?", &key, "holds a nested value"));
                }
            };
            if key == "tag" {
                tag = Some(text);
            } else {
                attrs.insert(key, text);
            }
        }
        let tag = tag.ok_or_else(|| ConvError::shape("?", "tag", "is missing"))?;
        Ok(RawEvent { tag, attrs })
    }
}

impl RawEvent {
    pub fn new(tag: impl Into<String>) -> Self {
        RawEvent {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.insert(key.into(), value.to_string());
        self
    }

    /// Parses one JSON frame.
    pub fn from_json_slice(bytes: &[u8]) -> ConvResult<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| ConvError::shape("?", "frame", format!("is not valid JSON: {e}")))?;
        match value {
            Value::Object(map) => RawEvent::try_from(map),
            _ => Err(ConvError::shape("?", "frame", "is not a JSON object")),
        }
    }

    pub fn from_json_str(text: &str) -> ConvResult<Self> {
        Self::from_json_slice(text.as_bytes())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    pub fn require(&self, key: &str) -> ConvResult<&str> {
        self.get(key)
            .ok_or_else(|| ConvError::shape(&self.tag, key, "is missing"))
    }

    pub fn require_int(&self, key: &str) -> ConvResult<i64> {
        let text = self.require(key)?;
        text.trim()
            .parse()
            .map_err(|_| ConvError::shape(&self.tag, key, format!("is not an integer: {text:?}")))
    }

    pub fn optional_int(&self, key: &str) -> ConvResult<Option<i64>> {
        if self.has(key) {
            self.require_int(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Comma-separated integers. An empty value is an empty list.
    pub fn require_int_list(&self, key: &str) -> ConvResult<Vec<i64>> {
        let text = self.require(key)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        text.split(',')
            .map(|part| {
                part.trim().parse().map_err(|_| {
                    ConvError::shape(&self.tag, key, format!("has a non-integer entry: {part:?}"))
                })
            })
            .collect()
    }

    pub fn optional_int_list(&self, key: &str) -> ConvResult<Option<Vec<i64>>> {
        if self.has(key) {
            self.require_int_list(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Narrows a value read from `key`, reporting overflow as a shape error.
    pub fn narrow<T: TryFrom<i64>>(&self, key: &str, value: i64) -> ConvResult<T> {
        T::try_from(value)
            .map_err(|_| ConvError::shape(&self.tag, key, format!("is out of range: {value}")))
    }

    /// A wire score from `key` multiplied into points.
    pub fn scaled(&self, key: &str, value: i64, unit: i32) -> ConvResult<i32> {
        let value: i32 = self.narrow(key, value)?;
        value.checked_mul(unit).ok_or_else(|| {
            ConvError::shape(&self.tag, key, format!("score {value} x {unit} overflows"))
        })
    }

    /// Comma-separated wire scores, each multiplied into points.
    pub fn require_scaled_list(&self, key: &str, unit: i32) -> ConvResult<Vec<i32>> {
        self.require_int_list(key)?
            .into_iter()
            .map(|v| self.scaled(key, v, unit))
            .collect()
    }

    pub fn require_small<T: TryFrom<i64>>(&self, key: &str) -> ConvResult<T> {
        self.narrow(key, self.require_int(key)?)
    }

    /// A relative seat attribute (`who`, `oya`, `fromWho`).
    pub fn require_seat(&self, key: &str) -> ConvResult<u8> {
        let seat: u8 = self.require_small(key)?;
        if seat > 3 {
            return Err(ConvError::shape(&self.tag, key, format!("is not a seat: {seat}")));
        }
        Ok(seat)
    }

    pub fn require_tile(&self, key: &str) -> ConvResult<Tile> {
        let index: u32 = self.require_small(key)?;
        Tile::new(index)
    }

    pub fn require_tile_list(&self, key: &str) -> ConvResult<Vec<Tile>> {
        self.require_int_list(key)?
            .into_iter()
            .map(|i| {
                u32::try_from(i)
                    .map_err(|_| ConvError::decode("tile index", i))
                    .and_then(Tile::new)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tag classification
// ---------------------------------------------------------------------------

/// What a raw tag means to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTag {
    Go,
    Taikyoku,
    Init,
    /// `T`/`U`/`V`/`W` with an optional tile index; `seat` is relative.
    Draw { seat: u8, tile: Option<Tile> },
    /// `D`/`E`/`F`/`G` (lowercase for a tsumogiri) with an optional index.
    Discard {
        seat: u8,
        tile: Option<Tile>,
        lowercase: bool,
    },
    Call,
    Reach,
    Dora,
    Agari,
    Ryuukyoku,
    /// Lobby and connection chatter: `HELO`, `REJOIN`, `UN`, `SHUFFLE`,
    /// `BYE`, `SAIKAI`, the `Z` heartbeat, and anything unknown.
    Ignored,
}

impl RawTag {
    pub fn classify(tag: &str) -> ConvResult<RawTag> {
        let named = match tag {
            "GO" => Some(RawTag::Go),
            "TAIKYOKU" => Some(RawTag::Taikyoku),
            "INIT" => Some(RawTag::Init),
            "N" => Some(RawTag::Call),
            "REACH" => Some(RawTag::Reach),
            "DORA" => Some(RawTag::Dora),
            "AGARI" => Some(RawTag::Agari),
            "RYUUKYOKU" => Some(RawTag::Ryuukyoku),
            "HELO" | "REJOIN" | "UN" | "SHUFFLE" | "BYE" | "SAIKAI" | "Z" => Some(RawTag::Ignored),
            _ => None,
        };
        if let Some(kind) = named {
            return Ok(kind);
        }

        let mut chars = tag.chars();
        let Some(head) = chars.next() else {
            return Ok(RawTag::Ignored);
        };
        let digits = chars.as_str();
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(RawTag::Ignored);
        }
        let tile = if digits.is_empty() {
            None
        } else {
            let index: u32 = digits
                .parse()
                .map_err(|_| ConvError::decode("tile index", digits))?;
            Some(Tile::new(index)?)
        };
        Ok(match head {
            'T'..='W' => RawTag::Draw {
                seat: head as u8 - b'T',
                tile,
            },
            'D'..='G' => RawTag::Discard {
                seat: head as u8 - b'D',
                tile,
                lowercase: false,
            },
            'd'..='g' => RawTag::Discard {
                seat: head as u8 - b'd',
                tile,
                lowercase: true,
            },
            _ => RawTag::Ignored,
        })
    }
}
