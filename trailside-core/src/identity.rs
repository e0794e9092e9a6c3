//! Current-user identity shared with the SDK and the trail service.
//!
//! Identity is an explicit value rather than a process-wide singleton.
//! Cloning an [`IdentityContext`] yields a handle to the same slot, so a
//! login recorded through one handle is visible through every other.

use std::sync::Arc;

use parking_lot::RwLock;

/// User id reported when none has been set.
pub const FALLBACK_USER_ID: &str = "test driver uuid";

/// Read access to the active user id.
pub trait IdentityProvider: Send + Sync {
    /// Return the active user id.
    fn user_id(&self) -> String;
}

/// Shared, replaceable user identity.
///
/// # Examples
/// ```
/// use trailside_core::identity::{FALLBACK_USER_ID, IdentityContext};
///
/// let identity = IdentityContext::new();
/// assert_eq!(identity.user_id(), FALLBACK_USER_ID);
///
/// let shared = identity.clone();
/// shared.set_user_id(Some("driver-42".to_string()));
/// assert_eq!(identity.user_id(), "driver-42");
///
/// identity.set_user_id(None);
/// assert_eq!(shared.user_id(), FALLBACK_USER_ID);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdentityContext {
    current: Arc<RwLock<Option<String>>>,
}

impl IdentityContext {
    /// Create a context with no user set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context already holding `user_id`.
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        let context = Self::new();
        context.set_user_id(Some(user_id.into()));
        context
    }

    /// The last id set, or [`FALLBACK_USER_ID`] if never set or cleared.
    pub fn user_id(&self) -> String {
        self.current
            .read()
            .clone()
            .unwrap_or_else(|| FALLBACK_USER_ID.to_owned())
    }

    /// Replace the user id; `None` restores the fallback.
    pub fn set_user_id(&self, user_id: Option<String>) {
        *self.current.write() = user_id;
    }
}

impl IdentityProvider for IdentityContext {
    fn user_id(&self) -> String {
        Self::user_id(self)
    }
}
