//! Lifecycle status shared by scenes and jobs.

use serde::{Deserialize, Serialize};

/// Generation lifecycle of a scene or a job.
///
/// Legal moves are `Pending -> Running -> {Success, Failed}` and
/// `Failed -> Pending` (explicit retry).
///
/// # Examples
///
/// ```
/// use storyloom_core::GenerationStatus;
///
/// assert!(GenerationStatus::Pending.can_transition_to(GenerationStatus::Running));
/// assert!(GenerationStatus::Failed.can_transition_to(GenerationStatus::Pending));
/// assert!(!GenerationStatus::Success.can_transition_to(GenerationStatus::Pending));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationStatus {
    /// Waiting to be generated
    #[default]
    Pending,
    /// Generation in flight
    Running,
    /// Generation produced a result
    Success,
    /// Generation failed; see the entity's error field
    Failed,
}

impl GenerationStatus {
    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: GenerationStatus) -> bool {
        use GenerationStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Running, Success) | (Running, Failed) | (Failed, Pending)
        )
    }

    /// Whether the entity has reached a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationStatus::Success | GenerationStatus::Failed)
    }
}
