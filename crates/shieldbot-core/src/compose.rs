// ── Status composer ──
//
// Folds the two anti-DDoS reads into one ordered view.

use crate::model::{CompositeStatus, SettingName, SettingOutcome, StatusField};

/// Display order of the anti-DDoS view.
pub const ANTI_DDOS_SETTINGS: [SettingName; 2] = [SettingName::BotFightMode, SettingName::BrowserCheck];

/// Combine Bot Fight Mode and Browser Integrity Check reads.
///
/// A failed read becomes an `Unavailable` field instead of failing the
/// whole view. The result is marked unchanged only if both reads are.
pub fn compose_anti_ddos_status(bfm: &SettingOutcome, bic: &SettingOutcome) -> CompositeStatus {
    let unchanged = matches!(bfm, SettingOutcome::Unchanged(_))
        && matches!(bic, SettingOutcome::Unchanged(_));

    let mut status = CompositeStatus::new(unchanged);
    for (name, outcome) in ANTI_DDOS_SETTINGS.into_iter().zip([bfm, bic]) {
        status.push(name, field(outcome));
    }
    status
}

fn field(outcome: &SettingOutcome) -> StatusField {
    match outcome {
        SettingOutcome::Applied(v) | SettingOutcome::Unchanged(v) => StatusField::Known(*v),
        SettingOutcome::Failed(f) => StatusField::Unavailable(f.to_string()),
    }
}
