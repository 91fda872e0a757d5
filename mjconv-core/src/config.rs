//! Bridge configuration and the `GO` rule flags.

use mjconv_engine::ConvResult;
use serde::{Deserialize, Serialize};

/// Table constants the bridge needs while translating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Live wall after the deal, four players (136 - 52 dealt - 14 dead).
    pub initial_live_wall: i32,
    /// Live wall after the deal, three players (108 - 39 - 14).
    pub initial_live_wall_sanma: i32,
    /// Points a riichi declaration puts on the table.
    pub riichi_deposit: i32,
    /// Multiplier from wire score units to points.
    pub score_unit: i32,
    /// Treat a zero starting score at East 1, honba 0 as a three-player
    /// table when no `GO` flag said so.
    pub detect_sanma_from_scores: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::default_tenhou()
    }
}

impl BridgeConfig {
    pub fn default_tenhou() -> Self {
        Self {
            initial_live_wall: 70,
            initial_live_wall_sanma: 55,
            riichi_deposit: 1000,
            score_unit: 100,
            detect_sanma_from_scores: true,
        }
    }

    /// Loads a config; missing keys take the Tenhou defaults.
    pub fn from_json_str(text: &str) -> ConvResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn live_wall(&self, three_player: bool) -> i32 {
        if three_player {
            self.initial_live_wall_sanma
        } else {
            self.initial_live_wall
        }
    }
}

// ---------------------------------------------------------------------------
// GO type flags
// ---------------------------------------------------------------------------

const GO_VS_HUMAN: u16 = 0x01;
const GO_NO_AKA: u16 = 0x02;
const GO_NO_KUITAN: u16 = 0x04;
const GO_HANCHAN: u16 = 0x08;
const GO_SANMA: u16 = 0x10;
const GO_LEVEL_LOW: u16 = 0x20;
const GO_FAST: u16 = 0x40;
const GO_LEVEL_HIGH: u16 = 0x80;

/// The `type` bit field of a `GO` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoType(pub u16);

impl GoType {
    #[inline]
    pub fn is_vs_human(self) -> bool {
        self.0 & GO_VS_HUMAN != 0
    }

    #[inline]
    pub fn has_aka(self) -> bool {
        self.0 & GO_NO_AKA == 0
    }

    #[inline]
    pub fn has_kuitan(self) -> bool {
        self.0 & GO_NO_KUITAN == 0
    }

    #[inline]
    pub fn is_hanchan(self) -> bool {
        self.0 & GO_HANCHAN != 0
    }

    #[inline]
    pub fn is_three_player(self) -> bool {
        self.0 & GO_SANMA != 0
    }

    #[inline]
    pub fn is_fast(self) -> bool {
        self.0 & GO_FAST != 0
    }

    /// Table level, 0 (ippan) to 3 (houou).
    #[inline]
    pub fn table_level(self) -> u8 {
        (u8::from(self.0 & GO_LEVEL_HIGH != 0) << 1) | u8::from(self.0 & GO_LEVEL_LOW != 0)
    }

    pub fn player_count(self) -> u8 {
        if self.is_three_player() { 3 } else { 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenhou_defaults() {
        let c = BridgeConfig::default();
        assert_eq!(c, BridgeConfig::default_tenhou());
        assert_eq!(c.live_wall(false), 70);
        assert_eq!(c.live_wall(true), 55);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = BridgeConfig::from_json_str(r#"{"riichi_deposit": 1500}"#).unwrap();
        assert_eq!(c.riichi_deposit, 1500);
        assert_eq!(c.score_unit, 100);
        assert!(BridgeConfig::from_json_str("{").is_err());
    }

    #[test]
    fn go_flags() {
        // houou hanchan, red fives, open tanyao, four players
        let houou = GoType(0xA9);
        assert!(houou.is_vs_human());
        assert!(houou.is_hanchan());
        assert!(houou.has_aka());
        assert!(houou.has_kuitan());
        assert!(!houou.is_three_player());
        assert_eq!(houou.table_level(), 3);

        let sanma = GoType(0x19 | GO_NO_AKA);
        assert!(sanma.is_three_player());
        assert!(!sanma.has_aka());
        assert_eq!(sanma.player_count(), 3);
        assert_eq!(GoType(0xC1).table_level(), 2);
        assert!(GoType(0xC1).is_fast());
    }
}
