// ── Chat rendering ──
//
// Keyboards and message texts. Texts use Telegram's HTML parse mode, so
// anything dynamic goes through `escape_html`.

use std::fmt::Write as _;

use crate::command::{
    LABEL_ANTI_DDOS, LABEL_DISABLE_PROTECTION, LABEL_ENABLE_PROTECTION, LABEL_SHOW_ANALYTICS,
    LABEL_SHOW_LEVEL, TOKEN_BFM_OFF, TOKEN_BFM_ON, TOKEN_BIC_OFF, TOKEN_BIC_ON,
    TOKEN_REFRESH_ANALYTICS, TOKEN_SELECT_LEVEL,
};
use crate::model::{
    AnalyticsSummary, CompositeStatus, Failure, SecurityLevel, SettingName, StatusField,
};

// ── Keyboards ────────────────────────────────────────────────────────

/// One inline button: what the operator sees and the token it sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Transport-neutral keyboard layout, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Attached to a message; presses arrive as callbacks.
    Inline(Vec<Vec<Button>>),
    /// Replaces the operator's text keyboard; presses arrive as messages.
    Reply(Vec<Vec<String>>),
}

pub fn main_menu() -> Keyboard {
    Keyboard::Reply(vec![
        vec![LABEL_ENABLE_PROTECTION.into(), LABEL_DISABLE_PROTECTION.into()],
        vec![LABEL_SHOW_LEVEL.into(), LABEL_SHOW_ANALYTICS.into()],
        vec![LABEL_ANTI_DDOS.into()],
    ])
}

pub fn level_picker() -> Keyboard {
    let row = |label: &str, level: SecurityLevel| vec![Button::new(label, level.as_str())];
    Keyboard::Inline(vec![
        row("🟢 Off", SecurityLevel::EssentiallyOff),
        row("🟡 Low", SecurityLevel::Low),
        row("🟠 Medium", SecurityLevel::Medium),
        row("🔴 High", SecurityLevel::High),
        row("🚨 Under Attack", SecurityLevel::UnderAttack),
    ])
}

pub fn anti_ddos_menu() -> Keyboard {
    Keyboard::Inline(vec![
        vec![
            Button::new("🔛 Enable BFM", TOKEN_BFM_ON),
            Button::new("🛑 Disable BFM", TOKEN_BFM_OFF),
        ],
        vec![
            Button::new("🔛 Enable BIC", TOKEN_BIC_ON),
            Button::new("🛑 Disable BIC", TOKEN_BIC_OFF),
        ],
        vec![Button::new("🔄 Choose security level", TOKEN_SELECT_LEVEL)],
    ])
}

pub fn analytics_menu() -> Keyboard {
    Keyboard::Inline(vec![vec![Button::new(
        "🔄 Refresh analytics",
        TOKEN_REFRESH_ANALYTICS,
    )]])
}

// ── Texts ────────────────────────────────────────────────────────────

pub const GREETING: &str = "👋 Choose an action:";
pub const UNAUTHORIZED_MESSAGE: &str = "🚫 You do not have access to this bot.";
pub const UNAUTHORIZED_ALERT: &str = "🚫 Access denied.";
pub const CHOOSE_LEVEL: &str = "Choose a security level:";
pub const NOTHING_CHANGED: &str = "⚠️ Nothing has changed.";
pub const ANALYTICS_UNCHANGED: &str = "📊 Analytics data has not changed.";
pub const FAULT_ALERT: &str = "⚠️ Something went wrong. Please try again.";
pub const DELIVERY_FAILED: &str = "⚠️ Could not deliver the response. Please try again.";

pub fn level_set(level: SecurityLevel) -> String {
    format!("✅ Security level set: <b>{level}</b>")
}

pub fn level_set_alert(level: SecurityLevel) -> String {
    format!("Security level set: {level}")
}

pub fn level_current(level: SecurityLevel) -> String {
    format!("👁️ Current security level: <b>{level}</b>")
}

pub fn setting_failed(action: &str, name: SettingName, failure: &Failure) -> String {
    format!(
        "❌ Failed to {action} {}: {}",
        name.to_string().to_lowercase(),
        escape_html(&failure.to_string())
    )
}

pub fn toggle_alert(name: SettingName, outcome_value: &str) -> String {
    format!("{name} set: {outcome_value}")
}

pub fn toggle_failed_alert(name: SettingName, failure: &Failure) -> String {
    format!("{name} not changed: {failure}")
}

pub fn analytics(summary: &AnalyticsSummary, window_hours: u32) -> String {
    format!(
        "📊 Request analytics (last {window_hours} hours):\n\
         Total requests: <b>{}</b>\n\
         Threats: <b>{}</b>\n\
         Served by Cloudflare: <b>{}</b>\n\
         Served by origin: <b>{}</b>",
        summary.total, summary.threats, summary.cached, summary.served_by_origin
    )
}

pub fn analytics_failed(failure: &Failure, window_hours: u32) -> String {
    match failure {
        Failure::ZoneNotFound => "📊 Analytics unavailable: zone not found.".into(),
        Failure::NoDataInWindow => {
            format!("📊 Analytics unavailable: no data for the last {window_hours} hours.")
        }
        other => format!(
            "❌ Failed to read analytics: {}",
            escape_html(&other.to_string())
        ),
    }
}

pub fn anti_ddos_status(status: &CompositeStatus) -> String {
    let mut text = String::from(if status.is_unchanged() {
        "🔒 Anti-DDoS status unchanged:"
    } else {
        "🔒 Anti-DDoS status:"
    });
    for (name, field) in status.iter() {
        match field {
            StatusField::Known(value) => {
                let _ = write!(text, "\n{name}: <b>{value}</b>");
            }
            StatusField::Unavailable(reason) => {
                let _ = write!(text, "\n{name}: unavailable ({})", escape_html(reason));
            }
        }
    }
    text
}

/// Escape the three characters Telegram's HTML mode treats specially.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
