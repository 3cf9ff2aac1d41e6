// ── Remote settings ──
//
// Typed values for the three zone settings the bot controls. Wire strings
// and booleans only appear at the API adapter boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Zone security level, serialized exactly as the API spells it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Enterprise-only; free plans bottom out at `essentially_off`.
    Off,
    EssentiallyOff,
    Low,
    Medium,
    High,
    UnderAttack,
}

impl SecurityLevel {
    /// The wire value sent to the API.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A two-valued switch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<bool> for Toggle {
    fn from(enabled: bool) -> Self {
        if enabled { Self::On } else { Self::Off }
    }
}

/// Which remote setting an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SettingName {
    #[strum(to_string = "Security level")]
    SecurityLevel,
    #[strum(to_string = "Bot Fight Mode")]
    BotFightMode,
    #[strum(to_string = "Browser Integrity Check")]
    BrowserCheck,
}

/// A value for one named setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingValue {
    SecurityLevel(SecurityLevel),
    BotFightMode(Toggle),
    BrowserCheck(Toggle),
}

impl SettingValue {
    pub fn name(&self) -> SettingName {
        match self {
            Self::SecurityLevel(_) => SettingName::SecurityLevel,
            Self::BotFightMode(_) => SettingName::BotFightMode,
            Self::BrowserCheck(_) => SettingName::BrowserCheck,
        }
    }

    /// The switch state, for the two toggle settings.
    pub fn toggle(&self) -> Option<Toggle> {
        match self {
            Self::SecurityLevel(_) => None,
            Self::BotFightMode(t) | Self::BrowserCheck(t) => Some(*t),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecurityLevel(level) => f.write_str(level.as_str()),
            Self::BotFightMode(t) | Self::BrowserCheck(t) => f.write_str(t.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn security_level_wire_strings() {
        assert_eq!(SecurityLevel::EssentiallyOff.as_str(), "essentially_off");
        assert_eq!(SecurityLevel::UnderAttack.to_string(), "under_attack");
        assert_eq!(
            SecurityLevel::from_str("under_attack").ok(),
            Some(SecurityLevel::UnderAttack)
        );
        assert!(SecurityLevel::from_str("maximum").is_err());
    }

    #[test]
    fn toggle_from_bool_and_str() {
        assert_eq!(Toggle::from(true), Toggle::On);
        assert_eq!(Toggle::from(false), Toggle::Off);
        assert_eq!(Toggle::from_str("on").ok(), Some(Toggle::On));
        assert!(Toggle::from_str("yes").is_err());
    }

    #[test]
    fn value_knows_its_setting() {
        let v = SettingValue::BrowserCheck(Toggle::On);
        assert_eq!(v.name(), SettingName::BrowserCheck);
        assert_eq!(v.toggle(), Some(Toggle::On));
        assert_eq!(v.to_string(), "on");
        assert_eq!(SettingName::BotFightMode.to_string(), "Bot Fight Mode");
    }
}
