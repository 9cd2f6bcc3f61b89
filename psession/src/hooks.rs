//! Session store lifecycle hook contract.

use std::fmt::{Display, Formatter};

use pcommon::SessionId;
use pprovider::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionReason {
    Expired,
    Capacity,
}

impl EvictionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Capacity => "capacity",
        }
    }
}

impl Display for EvictionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait SessionStoreHooks: Send + Sync {
    fn on_session_created(&self, _id: &SessionId, _provider: ProviderId, _model: &str) {}

    fn on_session_deleted(&self, _id: &SessionId) {}

    fn on_session_evicted(&self, _id: &SessionId, _reason: EvictionReason) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSessionStoreHooks;

impl SessionStoreHooks for NoopSessionStoreHooks {}
