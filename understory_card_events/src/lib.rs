// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_card_events --heading-base-level=0

//! Understory Card Events: deterministic, `no_std` card transition events for scene-based documents.
//!
//! ## Overview
//!
//! This crate sits on top of a document runtime that reports two low-level scene callbacks,
//! "prepare for display" and "loaded", plus raw pointer-down/pointer-up input.
//! From those it derives four named events:
//!
//! - `HypeCardUnload`: the current card is about to be replaced (previous, current, next).
//! - `HypeCardPrepare`: the incoming card is about to be displayed (previous, current).
//! - `HypeCardLoad`: a new card finished loading (previous, current).
//! - `HypeCardInteraction`: a pointer gesture completed (distance, duration, swipe).
//!
//! It does not render, hit test, or own the document. The host implements
//! [`Document`](crate::host::Document) and calls the [`CardEvents`] entry points from its
//! native callbacks.
//!
//! ## Transitions
//!
//! Per document the engine remembers the current card and the one before it.
//! A prepare or load whose scene name equals the current card fires nothing.
//! The very first load fires a load with no previous card and no unload.
//! See [`transition`](crate::transition).
//!
//! ## Interactions
//!
//! Pointer gestures are paired down→up and classified as swipes using the
//! `minSwipeDistance` and `maxSwipeDuration` [defaults](crate::defaults).
//! The most recent gesture is handed to the next unload payload exactly once, then
//! forgotten. See [`interaction`](crate::interaction).
//!
//! ## Dispatch
//!
//! Every derived event goes through a fixed tier order: the kind's default handler, the
//! catch-all default handler, the document's catch-all handler, the document's handler for
//! the kind, then registered listeners. A listener returning
//! [`Outcome::Halt`](crate::types::Outcome::Halt) stops the remaining listeners.
//! See [`dispatch`](crate::dispatch).
//!
//! ## Example
//!
//! ```
//! use understory_card_events::CardEvents;
//! use understory_card_events::clock::ManualClock;
//! use understory_card_events::host::Document;
//! use understory_card_events::types::{CardEventKind, DocumentId, ElementRef, Outcome, PointerEvent};
//!
//! struct Doc { scene: String }
//! impl Document for Doc {
//!     fn document_id(&self) -> DocumentId { DocumentId::new("index") }
//!     fn current_scene_name(&self) -> String { self.scene.clone() }
//! }
//!
//! let clock = ManualClock::new(0);
//! let mut engine = CardEvents::new(clock.clone());
//! let unloads = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//! let seen = unloads.clone();
//! engine.add_listener(CardEventKind::Unload, move |_, ev| {
//!     seen.borrow_mut().push(ev.clone());
//!     Ok(Outcome::Continue)
//! });
//!
//! let root = ElementRef::new("index_hype_container");
//! let mut doc = Doc { scene: "Intro".into() };
//! engine.document_load(&mut doc, &root);
//! engine.scene_load(&doc, &root).unwrap();
//!
//! // A quick leftward drag on the intro card.
//! engine.pointer_down(&doc, &PointerEvent::new(300.0, 200.0, root.clone()));
//! clock.advance(180);
//! engine.pointer_up(&doc, &PointerEvent::new(200.0, 210.0, root.clone())).unwrap();
//!
//! doc.scene = "Menu".into();
//! engine.scene_prepare(&doc, &root).unwrap();
//!
//! let unloads = unloads.borrow();
//! assert_eq!(unloads[0].current_card_name.as_deref(), Some("Intro"));
//! assert_eq!(unloads[0].next_card_name.as_deref(), Some("Menu"));
//! assert!(unloads[0].interaction.as_ref().unwrap().is_swipe);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default) adds
//! [`SystemClock`](crate::clock::SystemClock); the `serde` feature makes payloads serializable.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod clock;
pub mod compose;
pub mod defaults;
pub mod dispatch;
pub mod engine;
pub mod host;
pub mod interaction;
pub mod transition;
pub mod types;

pub use engine::CardEvents;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::compose::transition_event;
    use crate::interaction::{InteractionState, SwipeThresholds};
    use crate::transition::CardTransition;
    use crate::types::{CardEvent, CardEventKind, ElementRef};
    use kurbo::Point;

    const GESTURE_KEYS: [&str; 8] = [
        "pointerDown",
        "pointerUp",
        "distance",
        "duration",
        "isSwipe",
        "swipeDirection",
        "minSwipeDistance",
        "maxSwipeDuration",
    ];

    fn unload() -> CardTransition {
        CardTransition::Unload {
            previous: None,
            current: "Intro".into(),
            next: "Menu".into(),
        }
    }

    #[test]
    fn absent_fields_are_omitted() {
        let mut ev = CardEvent::new(CardEventKind::Load);
        ev.target = ElementRef::new("scene");
        ev.current_card_name = Some("Intro".into());
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "HypeCardLoad",
                "target": "scene",
                "currentCardName": "Intro",
            })
        );
    }

    #[test]
    fn unload_flattens_the_gesture_into_the_payload() {
        let mut tracker = InteractionState::new();
        tracker.pointer_down(Point::new(0.0, 0.0), 100);
        tracker.pointer_up(Point::new(40.0, 0.0), 200, SwipeThresholds::default());
        let mut ev = transition_event(unload(), Some(&mut tracker), 250);
        ev.target = ElementRef::new("scene");

        let json = serde_json::to_value(&ev).unwrap();
        let obj = json.as_object().unwrap();
        for key in GESTURE_KEYS {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert!(!obj.contains_key("interaction"), "record is flattened");
        assert!(!obj.contains_key("pointer"));
        assert_eq!(obj["type"], "HypeCardUnload");
        assert_eq!(obj["nextCardName"], "Menu");
        assert_eq!(obj["lastInteractionAge"], 50);
        assert_eq!(obj["distance"], 40.0);
        assert_eq!(obj["duration"], 100);
        assert_eq!(obj["isSwipe"], true);
        assert_eq!(obj["swipeDirection"], "right");
        assert_eq!(obj["maxSwipeDuration"], 750);
    }

    #[test]
    fn unload_without_gesture_has_no_gesture_keys() {
        let mut tracker = InteractionState::new();
        let ev = transition_event(unload(), Some(&mut tracker), 250);

        let json = serde_json::to_value(&ev).unwrap();
        let obj = json.as_object().unwrap();
        for key in GESTURE_KEYS {
            assert!(!obj.contains_key(key), "unexpected {key}");
        }
        assert!(!obj.contains_key("interaction"));
        assert!(!obj.contains_key("pointer"));
        assert!(!obj.contains_key("lastInteractionAge"));
        assert_eq!(obj["currentCardName"], "Intro");
    }
}
