//! Advisory coach messages.
//!
//! Messages are purely advisory and never change a plan. Selection is
//! deterministic: Low readiness always wins, a just-completed workout
//! comes next, and otherwise a rotation cursor walks a static catalog
//! of motivation and tip messages.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{CoachMessage, MessageKind};
use crate::readiness::ReadinessBand;

const WARNING_MESSAGES: &[&str] = &[
    "Your stress levels have been high. Consider an extra rest day or a light yoga session.",
    "Readiness is low today. Swap intensity for easy running and get to bed early tonight.",
];

const FEEDBACK_MESSAGES: &[&str] = &[
    "Your consistency is paying off. I've noticed your pace improving over the last 2 weeks!",
    "Nice work checking that one off. Stacking sessions like this is how fitness is built.",
];

const ROTATION_MESSAGES: &[(MessageKind, &str)] = &[
    (
        MessageKind::Motivation,
        "Great job getting out there today! Every run makes you stronger.",
    ),
    (
        MessageKind::Tip,
        "Remember to stay hydrated! Aim for 500ml of water in the hour before your run.",
    ),
    (
        MessageKind::Motivation,
        "Consistency beats intensity. Showing up is the hardest part, and you keep showing up.",
    ),
    (
        MessageKind::Tip,
        "Keep easy days truly easy. You should be able to hold a conversation the whole run.",
    ),
    (
        MessageKind::Motivation,
        "Trust the plan. The gains from this week's work arrive two weeks from now.",
    ),
    (
        MessageKind::Tip,
        "A short dynamic warmup before quality sessions makes the first interval feel much better.",
    ),
];

/// Composes advisory messages from readiness state and completion events
pub struct CoachMessenger;

impl CoachMessenger {
    /// Pick a message by priority: Low readiness, then a completion,
    /// then the catalog rotation.
    ///
    /// `rotation` is a caller-supplied cursor (for example day ordinal
    /// or a stored counter); the same cursor always yields the same
    /// message.
    pub fn compose(
        band: Option<ReadinessBand>,
        just_completed_workout: bool,
        rotation: usize,
        now: DateTime<Utc>,
    ) -> CoachMessage {
        let (kind, content) = if band == Some(ReadinessBand::Low) {
            (
                MessageKind::Warning,
                WARNING_MESSAGES[rotation % WARNING_MESSAGES.len()],
            )
        } else if just_completed_workout {
            (
                MessageKind::Feedback,
                FEEDBACK_MESSAGES[rotation % FEEDBACK_MESSAGES.len()],
            )
        } else {
            ROTATION_MESSAGES[rotation % ROTATION_MESSAGES.len()]
        };

        CoachMessage {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.to_string(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_readiness_always_warns() {
        for rotation in 0..10 {
            let message = CoachMessenger::compose(
                Some(ReadinessBand::Low),
                true,
                rotation,
                Utc::now(),
            );
            assert_eq!(message.kind, MessageKind::Warning);
        }
    }

    #[test]
    fn test_completion_yields_feedback() {
        let message = CoachMessenger::compose(None, true, 0, Utc::now());
        assert_eq!(message.kind, MessageKind::Feedback);

        let message = CoachMessenger::compose(Some(ReadinessBand::High), true, 3, Utc::now());
        assert_eq!(message.kind, MessageKind::Feedback);
    }

    #[test]
    fn test_rotation_is_deterministic() {
        let a = CoachMessenger::compose(None, false, 2, Utc::now());
        let b = CoachMessenger::compose(None, false, 2, Utc::now());
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.content, b.content);
    }

    #[test]
    fn test_rotation_walks_catalog() {
        let contents: Vec<String> = (0..ROTATION_MESSAGES.len())
            .map(|i| CoachMessenger::compose(None, false, i, Utc::now()).content)
            .collect();
        let unique: std::collections::HashSet<&String> = contents.iter().collect();
        assert_eq!(unique.len(), ROTATION_MESSAGES.len());

        // Cursor wraps around
        let wrapped = CoachMessenger::compose(None, false, ROTATION_MESSAGES.len(), Utc::now());
        assert_eq!(wrapped.content, contents[0]);
    }

    #[test]
    fn test_rotation_only_motivation_or_tip() {
        for rotation in 0..ROTATION_MESSAGES.len() {
            let message = CoachMessenger::compose(None, false, rotation, Utc::now());
            assert!(matches!(
                message.kind,
                MessageKind::Motivation | MessageKind::Tip
            ));
        }
    }
}
