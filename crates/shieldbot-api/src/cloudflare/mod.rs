// Cloudflare API client modules
//
// Zone-scoped REST settings (security level, bot management, browser
// integrity check) wrapped in the v4 `{ success, errors, messages, result }`
// envelope, plus the GraphQL analytics endpoint.

pub mod analytics;
pub mod client;
pub mod models;
pub mod settings;

pub use client::{CloudflareClient, DEFAULT_API_URL};
