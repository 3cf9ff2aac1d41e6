//! `shieldbot check`: prove the config and Cloudflare credentials work.

use shieldbot_core::{
    RelayConfig, SettingName, SettingOutcome, SettingValue, SettingsGateway,
    build_cloudflare_client,
};

use crate::error::CliError;

pub async fn handle(config: &RelayConfig) -> Result<(), CliError> {
    let gateway = SettingsGateway::new(build_cloudflare_client(config)?);

    match gateway.read_setting(SettingName::SecurityLevel).await {
        SettingOutcome::Applied(SettingValue::SecurityLevel(level))
        | SettingOutcome::Unchanged(SettingValue::SecurityLevel(level)) => {
            println!("Zone:              {}", config.zone_id);
            println!("Security level:    {level}");
            println!("Allowed operators: {}", config.allowed_users.len());
            Ok(())
        }
        SettingOutcome::Failed(failure) => Err(CliError::from_failure(failure)),
        SettingOutcome::Applied(other) | SettingOutcome::Unchanged(other) => {
            Err(CliError::ApiError {
                service: "Cloudflare".into(),
                message: format!("unexpected value for {}: {other}", other.name()),
            })
        }
    }
}
