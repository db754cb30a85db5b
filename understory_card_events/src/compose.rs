// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event composer: build [`CardEvent`] payloads.
//!
//! Transition payloads carry the names from a [`CardTransition`] plus the age of the
//! document's last interaction. Unload payloads additionally take the pending
//! interaction record out of the tracker, so each gesture is reported once.

use crate::host::InteractionClock;
use crate::interaction::InteractionState;
use crate::transition::{CardTransition, TransitionState};
use crate::types::{CardEvent, CardEventKind, InteractionRecord, PointerEvent, Timestamp};

/// Build the payload for `transition`.
///
/// `tracker` is the document's interaction state, if tracking is attached. For
/// unloads it is drained via [`InteractionState::take_for_unload`] after the age has
/// been read.
pub fn transition_event(
    transition: CardTransition,
    tracker: Option<&mut InteractionState>,
    now: Timestamp,
) -> CardEvent {
    let kind = transition.kind();
    let mut event = CardEvent::new(kind);
    match transition {
        CardTransition::Unload {
            previous,
            current,
            next,
        } => {
            event.previous_card_name = previous;
            event.current_card_name = Some(current);
            event.next_card_name = Some(next);
        }
        CardTransition::Prepare { previous, current }
        | CardTransition::Load { previous, current } => {
            event.previous_card_name = previous;
            event.current_card_name = Some(current);
        }
    }

    let Some(tracker) = tracker else {
        return event;
    };
    event.last_interaction_age = interaction_clock(tracker, now).last_interaction_age();
    if kind == CardEventKind::Unload {
        event.interaction = tracker.take_for_unload();
    }
    event
}

/// Build the payload for a completed pointer gesture.
pub fn interaction_event(
    names: &TransitionState,
    record: InteractionRecord,
    pointer: &PointerEvent,
    tracker: &InteractionState,
    now: Timestamp,
) -> CardEvent {
    let mut event = CardEvent::new(CardEventKind::Interaction);
    event.previous_card_name = names.prior().map(Into::into);
    event.current_card_name = names.current().map(Into::into);
    event.last_interaction_age = interaction_clock(tracker, now).last_interaction_age();
    event.interaction = Some(record);
    event.pointer = Some(pointer.clone());
    event
}

/// Interaction timing view of `tracker` at `now`.
pub fn interaction_clock(tracker: &InteractionState, now: Timestamp) -> InteractionClock {
    InteractionClock {
        last_interaction_time: tracker.last_interaction_time(),
        now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::SwipeThresholds;
    use crate::types::ElementRef;
    use kurbo::Point;

    fn unload() -> CardTransition {
        CardTransition::Unload {
            previous: None,
            current: "Intro".into(),
            next: "Menu".into(),
        }
    }

    #[test]
    fn load_payload_has_no_next_or_interaction() {
        let mut tracker = InteractionState::new();
        tracker.pointer_up(Point::ZERO, 100, SwipeThresholds::default());
        let ev = transition_event(
            CardTransition::Load {
                previous: Some("Intro".into()),
                current: "Menu".into(),
            },
            Some(&mut tracker),
            400,
        );
        assert_eq!(ev.kind, CardEventKind::Load);
        assert_eq!(ev.previous_card_name.as_deref(), Some("Intro"));
        assert_eq!(ev.current_card_name.as_deref(), Some("Menu"));
        assert_eq!(ev.next_card_name, None);
        assert_eq!(ev.last_interaction_age, Some(300));
        assert_eq!(ev.interaction, None);
        assert!(tracker.last_interaction().is_some(), "load does not consume");
    }

    #[test]
    fn unload_drains_the_tracker() {
        let mut tracker = InteractionState::new();
        tracker.pointer_down(Point::new(0.0, 0.0), 100);
        tracker.pointer_up(Point::new(40.0, 0.0), 200, SwipeThresholds::default());

        let ev = transition_event(unload(), Some(&mut tracker), 250);
        assert_eq!(ev.next_card_name.as_deref(), Some("Menu"));
        assert_eq!(ev.last_interaction_age, Some(50), "age read before reset");
        let rec = ev.interaction.expect("gesture reported");
        assert_eq!(rec.distance, Some(40.0));
        assert!(rec.is_swipe);

        let again = transition_event(unload(), Some(&mut tracker), 300);
        assert_eq!(again.interaction, None);
        assert_eq!(again.last_interaction_age, None);
    }

    #[test]
    fn untracked_document_has_no_age() {
        let ev = transition_event(unload(), None, 1_000);
        assert_eq!(ev.last_interaction_age, None);
        assert_eq!(ev.interaction, None);
    }

    #[test]
    fn interaction_payload_carries_pointer_and_names() {
        let mut names = TransitionState::new();
        let _ = names.load("Intro");
        let _ = names.load("Menu");
        let mut tracker = InteractionState::new();
        let record = tracker.pointer_up(Point::new(3.0, 4.0), 90, SwipeThresholds::default());
        let pointer = PointerEvent::new(3.0, 4.0, ElementRef::new("button"));

        let ev = interaction_event(&names, record.clone(), &pointer, &tracker, 90);
        assert_eq!(ev.kind, CardEventKind::Interaction);
        assert_eq!(ev.previous_card_name.as_deref(), Some("Intro"));
        assert_eq!(ev.current_card_name.as_deref(), Some("Menu"));
        assert_eq!(ev.last_interaction_age, Some(0));
        assert_eq!(ev.interaction, Some(record));
        assert_eq!(ev.pointer, Some(pointer));
    }
}
