// ── Command set ──
//
// The closed set of operator actions and the wire tokens that name them:
// callback data from inline keyboards, reply-keyboard button labels, and
// `/start`. Anything else is not a command.

use std::str::FromStr;

use crate::model::{SecurityLevel, Toggle};

// ── Reply-keyboard labels ────────────────────────────────────────────

pub const LABEL_ENABLE_PROTECTION: &str = "🛡️ Enable protection";
pub const LABEL_DISABLE_PROTECTION: &str = "⚪ Disable protection";
pub const LABEL_SHOW_LEVEL: &str = "👁️ Show current level";
pub const LABEL_SHOW_ANALYTICS: &str = "📊 Show analytics";
pub const LABEL_ANTI_DDOS: &str = "🔒 Anti-DDoS";

// ── Callback tokens ──────────────────────────────────────────────────

pub const TOKEN_SELECT_LEVEL: &str = "select_security_level";
pub const TOKEN_REFRESH_ANALYTICS: &str = "refresh_analytics";
pub const TOKEN_BFM_ON: &str = "bfm_on";
pub const TOKEN_BFM_OFF: &str = "bfm_off";
pub const TOKEN_BIC_ON: &str = "bic_on";
pub const TOKEN_BIC_OFF: &str = "bic_off";

/// Every action the bot can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the main reply keyboard.
    Start,
    SetSecurityLevel(SecurityLevel),
    ReadSecurityLevel,
    /// Show the inline security-level picker.
    SelectSecurityLevel,
    ReadAnalytics,
    /// Re-read analytics into the message that holds the refresh button.
    RefreshAnalytics,
    ShowAntiDdos,
    SetBotFightMode(Toggle),
    SetBrowserCheck(Toggle),
}

/// How a no-op edit is reconciled for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    AnalyticsRefresh,
    AntiDdosToggle,
    Generic,
}

impl Command {
    /// Map a raw token to a command. Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();

        match token {
            LABEL_ENABLE_PROTECTION => return Some(Self::SetSecurityLevel(SecurityLevel::UnderAttack)),
            LABEL_DISABLE_PROTECTION => {
                return Some(Self::SetSecurityLevel(SecurityLevel::EssentiallyOff));
            }
            LABEL_SHOW_LEVEL => return Some(Self::ReadSecurityLevel),
            LABEL_SHOW_ANALYTICS => return Some(Self::ReadAnalytics),
            LABEL_ANTI_DDOS => return Some(Self::ShowAntiDdos),
            TOKEN_SELECT_LEVEL => return Some(Self::SelectSecurityLevel),
            TOKEN_REFRESH_ANALYTICS => return Some(Self::RefreshAnalytics),
            TOKEN_BFM_ON => return Some(Self::SetBotFightMode(Toggle::On)),
            TOKEN_BFM_OFF => return Some(Self::SetBotFightMode(Toggle::Off)),
            TOKEN_BIC_ON => return Some(Self::SetBrowserCheck(Toggle::On)),
            TOKEN_BIC_OFF => return Some(Self::SetBrowserCheck(Toggle::Off)),
            _ => {}
        }

        if is_start(token) {
            return Some(Self::Start);
        }

        SecurityLevel::from_str(token).ok().map(Self::SetSecurityLevel)
    }

    pub fn category(self) -> ActionCategory {
        match self {
            Self::RefreshAnalytics => ActionCategory::AnalyticsRefresh,
            Self::SetBotFightMode(_) | Self::SetBrowserCheck(_) => ActionCategory::AntiDdosToggle,
            _ => ActionCategory::Generic,
        }
    }
}

/// `/start`, optionally addressed to the bot (`/start@my_bot`) or with a
/// deep-link payload.
fn is_start(token: &str) -> bool {
    let head = token.split_whitespace().next().unwrap_or_default();
    head == "/start" || head.starts_with("/start@")
}
