//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use pcommon::{Clock, GenerationOptions, ManualClock, SessionId};
//!
//! let session = SessionId::from("session-1");
//! let clock = ManualClock::new(1_000);
//!
//! let options = GenerationOptions::default().with_temperature(0.3).with_max_tokens(64);
//! assert_eq!(session.as_str(), "session-1");
//! assert_eq!(clock.now_millis(), 1_000);
//! assert_eq!(options.max_tokens, Some(64));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use pcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use pcommon::SessionId;
    //!
    //! let session = SessionId::new("session-42");
    //! assert_eq!(session.to_string(), "session-42");
    //! ```

    use std::fmt::{Display, Formatter};

    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Sampling settings shared by generation requests and session defaults.
    //!
    //! ```rust
    //! use pcommon::GenerationOptions;
    //!
    //! let mut defaults = GenerationOptions::default().with_temperature(0.2);
    //! defaults.merge(GenerationOptions::default().with_max_tokens(128));
    //!
    //! assert_eq!(defaults.temperature, Some(0.2));
    //! assert_eq!(defaults.max_tokens, Some(128));
    //! ```

    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerationOptions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub max_tokens: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub temperature: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub top_p: Option<f32>,
    }

    impl GenerationOptions {
        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = Some(top_p);
            self
        }

        pub fn is_empty(&self) -> bool {
            self.max_tokens.is_none() && self.temperature.is_none() && self.top_p.is_none()
        }

        /// Shallow merge: fields set on `other` overwrite, unset fields are left alone.
        pub fn merge(&mut self, other: GenerationOptions) {
            if other.max_tokens.is_some() {
                self.max_tokens = other.max_tokens;
            }
            if other.temperature.is_some() {
                self.temperature = other.temperature;
            }
            if other.top_p.is_some() {
                self.top_p = other.top_p;
            }
        }

        /// Returns `self` with any field set on `overrides` taking precedence.
        pub fn overridden_by(mut self, overrides: GenerationOptions) -> Self {
            self.merge(overrides);
            self
        }
    }
}

pub mod clock {
    //! Wall-clock abstraction so time-based eviction can be driven in tests.
    //!
    //! ```rust
    //! use std::time::Duration;
    //! use pcommon::{Clock, ManualClock};
    //!
    //! let clock = ManualClock::new(0);
    //! clock.advance(Duration::from_secs(2));
    //! assert_eq!(clock.now_millis(), 2_000);
    //! ```

    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Milliseconds since the Unix epoch.
    pub type Timestamp = u64;

    pub trait Clock: Send + Sync {
        fn now_millis(&self) -> Timestamp;
    }

    fn millis(duration: Duration) -> Timestamp {
        Timestamp::try_from(duration.as_millis()).unwrap_or(Timestamp::MAX)
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now_millis(&self) -> Timestamp {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(millis)
                .unwrap_or(0)
        }
    }

    #[derive(Debug, Default)]
    pub struct ManualClock {
        now: AtomicU64,
    }

    impl ManualClock {
        pub fn new(start: Timestamp) -> Self {
            Self {
                now: AtomicU64::new(start),
            }
        }

        pub fn set(&self, now: Timestamp) {
            self.now.store(now, Ordering::SeqCst);
        }

        pub fn advance(&self, by: Duration) {
            let _ = self
                .now
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                    Some(now.saturating_add(millis(by)))
                });
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> Timestamp {
            self.now.load(Ordering::SeqCst)
        }
    }
}

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use context::SessionId;
pub use future::BoxFuture;
pub use model::GenerationOptions;
