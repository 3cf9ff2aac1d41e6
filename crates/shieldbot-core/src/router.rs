// ── Command router ──
//
// Authorization first, then token mapping. Pure: no I/O, no logging.

use std::collections::BTreeSet;

use crate::command::Command;
use crate::model::Identity;

/// What to do with one inbound (identity, token) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The identity is not in the authorization set.
    Rejected,
    Dispatch(Command),
    /// Authorized, but the token names no command.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Router {
    allowed: BTreeSet<Identity>,
}

impl Router {
    pub fn new(allowed: BTreeSet<Identity>) -> Self {
        Self { allowed }
    }

    pub fn is_authorized(&self, identity: Identity) -> bool {
        self.allowed.contains(&identity)
    }

    pub fn route(&self, identity: Identity, token: &str) -> RouteDecision {
        if !self.is_authorized(identity) {
            return RouteDecision::Rejected;
        }
        Command::from_token(token).map_or(RouteDecision::Ignored, RouteDecision::Dispatch)
    }
}
