//! Initialization events and the state they drive.

/// Notification emitted while the SDK initializes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkInitEvent {
    /// Percentage complete, `0..=100`.
    Progress(u8),
    /// Initialization finished; the trail service is usable.
    Completed,
    /// Initialization stopped, with a reason when one is known.
    Failed(Option<String>),
}

/// Where initialization stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SdkInitState {
    /// No event received yet.
    #[default]
    NotStarted,
    /// Initialization is running.
    InProgress {
        /// Highest percentage reported so far.
        progress: u8,
    },
    /// Initialization finished.
    Completed,
    /// Initialization stopped.
    Failed {
        /// Failure description, when known.
        reason: Option<String>,
    },
}

impl SdkInitState {
    /// State after `event`.
    ///
    /// Terminal states ignore further events and reported progress never goes
    /// backwards; values above 100 are clamped.
    ///
    /// # Examples
    /// ```
    /// use trailside_core::sdk::{SdkInitEvent, SdkInitState};
    ///
    /// let state = SdkInitState::NotStarted
    ///     .apply(&SdkInitEvent::Progress(40))
    ///     .apply(&SdkInitEvent::Progress(10));
    /// assert_eq!(state, SdkInitState::InProgress { progress: 40 });
    ///
    /// let done = state.apply(&SdkInitEvent::Completed);
    /// assert_eq!(done.apply(&SdkInitEvent::Failed(None)), SdkInitState::Completed);
    /// ```
    #[must_use]
    pub fn apply(&self, event: &SdkInitEvent) -> Self {
        if self.is_terminal() {
            return self.clone();
        }
        match event {
            SdkInitEvent::Progress(reported) => {
                let reported = (*reported).min(100);
                let progress = match self {
                    Self::InProgress { progress } => (*progress).max(reported),
                    _ => reported,
                };
                Self::InProgress { progress }
            }
            SdkInitEvent::Completed => Self::Completed,
            SdkInitEvent::Failed(reason) => Self::Failed {
                reason: reason.clone(),
            },
        }
    }

    /// Whether the state is `Completed` or `Failed`.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn progress_is_clamped() {
        let state = SdkInitState::NotStarted.apply(&SdkInitEvent::Progress(250));
        assert_eq!(state, SdkInitState::InProgress { progress: 100 });
    }

    #[rstest]
    fn failure_keeps_reason_and_absorbs_completion() {
        let failed = SdkInitState::InProgress { progress: 30 }
            .apply(&SdkInitEvent::Failed(Some("disk full".to_owned())));

        assert_eq!(
            failed.apply(&SdkInitEvent::Completed),
            SdkInitState::Failed {
                reason: Some("disk full".to_owned())
            }
        );
    }

    #[rstest]
    #[case(SdkInitState::NotStarted, false)]
    #[case(SdkInitState::InProgress { progress: 99 }, false)]
    #[case(SdkInitState::Completed, true)]
    #[case(SdkInitState::Failed { reason: None }, true)]
    fn terminal_states(#[case] state: SdkInitState, #[case] terminal: bool) {
        assert_eq!(state.is_terminal(), terminal);
    }
}
