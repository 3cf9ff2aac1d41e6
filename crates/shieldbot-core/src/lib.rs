//! Core of shieldbot: a chat-driven remote control for a zone's edge
//! security settings.
//!
//! An inbound [`Interaction`] flows through the [`Router`] (authorization
//! and command mapping), the [`SettingsGateway`] (remote calls normalized
//! into [`SettingOutcome`]s), the status composer and the response
//! reconciler, and leaves through a [`ChatTransport`]. Remote and chat
//! I/O sit behind the [`SecurityApi`] and [`ChatTransport`] traits.

pub mod api;
pub mod command;
pub mod compose;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod reconcile;
pub mod relay;
pub mod render;
pub mod router;
pub mod transport;

pub use api::{SecurityApi, build_cloudflare_client};
pub use command::{ActionCategory, Command};
pub use compose::compose_anti_ddos_status;
pub use config::RelayConfig;
pub use error::{CoreError, EditError};
pub use gateway::SettingsGateway;
pub use model::{
    AnalyticsSummary, ChatId, CompositeStatus, Failure, Identity, SecurityLevel, SettingName,
    SettingOutcome, SettingValue, StatusField, Toggle,
};
pub use reconcile::{ActionOutcome, Delivery, OriginKind, Response};
pub use relay::{Interaction, Origin, Phase, Relay};
pub use render::{Button, Keyboard};
pub use router::{RouteDecision, Router};
pub use transport::{ChatTransport, MessageRef};
