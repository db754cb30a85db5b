// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition state: compute card transitions from observed scene names.
//!
//! ## Usage
//!
//! Feed the scene name read on each native prepare and load callback into
//! [`TransitionState::prepare`] and [`TransitionState::load`]. Each returns the
//! transitions to fire, in order. Re-observing the current name yields nothing.
//!
//! ```
//! use understory_card_events::transition::{CardTransition, TransitionState};
//! let mut t = TransitionState::new();
//! assert_eq!(
//!     t.load("Intro"),
//!     vec![CardTransition::Load { previous: None, current: "Intro".into() }]
//! );
//! assert_eq!(t.prepare("Menu").len(), 2);
//! assert_eq!(t.load("Menu").len(), 1);
//! assert!(t.prepare("Menu").is_empty());
//! ```
//!
//! ## Prior name
//!
//! Both [`prepare`](TransitionState::prepare) and [`load`](TransitionState::load)
//! copy the current name into the prior slot when they fire. After a full
//! prepare + load cycle the prior name is the card that was current before prepare
//! began, and the current name is the newly loaded card.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::types::CardEventKind;

/// Per-document record of the two most recently loaded cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionState {
    current: Option<String>,
    prior: Option<String>,
}

/// A card transition to fire.
///
/// Returned by [`TransitionState::prepare`] and [`TransitionState::load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardTransition {
    /// The current card is about to be replaced by `next`.
    Unload {
        /// Card loaded before `current`.
        previous: Option<String>,
        /// Card being replaced.
        current: String,
        /// Card replacing it.
        next: String,
    },
    /// `current` is about to be displayed.
    Prepare {
        /// Card currently shown, if any.
        previous: Option<String>,
        /// Incoming card.
        current: String,
    },
    /// `current` finished loading.
    Load {
        /// Card shown before, if any.
        previous: Option<String>,
        /// Loaded card.
        current: String,
    },
}

impl CardTransition {
    /// Event kind this transition is dispatched as.
    pub fn kind(&self) -> CardEventKind {
        match self {
            Self::Unload { .. } => CardEventKind::Unload,
            Self::Prepare { .. } => CardEventKind::Prepare,
            Self::Load { .. } => CardEventKind::Load,
        }
    }
}

impl TransitionState {
    /// State with no card recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the most recently loaded card.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Name of the card loaded before [`current`](Self::current).
    pub fn prior(&self) -> Option<&str> {
        self.prior.as_deref()
    }

    /// Forget both names.
    pub fn reset(&mut self) {
        self.current = None;
        self.prior = None;
    }

    fn changes_to(&self, name: &str) -> bool {
        self.current.as_deref() != Some(name)
    }

    /// Observe a prepare-for-display of `incoming`.
    ///
    /// Emits an unload (only when a card is current) followed by a prepare, or
    /// nothing when `incoming` is already current.
    pub fn prepare(&mut self, incoming: &str) -> Vec<CardTransition> {
        if !self.changes_to(incoming) {
            log::trace!("prepare of current card {incoming:?} ignored");
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        if let Some(current) = &self.current {
            out.push(CardTransition::Unload {
                previous: self.prior.clone(),
                current: current.clone(),
                next: incoming.into(),
            });
        }
        out.push(CardTransition::Prepare {
            previous: self.current.clone(),
            current: incoming.into(),
        });
        self.prior.clone_from(&self.current);
        out
    }

    /// Observe a load of `loaded`.
    ///
    /// Emits a load, or nothing when `loaded` is already current.
    pub fn load(&mut self, loaded: &str) -> Vec<CardTransition> {
        if !self.changes_to(loaded) {
            log::trace!("load of current card {loaded:?} ignored");
            return Vec::new();
        }
        let previous = self.current.replace(loaded.into());
        self.prior.clone_from(&previous);
        vec![CardTransition::Load {
            previous,
            current: loaded.into(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(previous: Option<&str>, current: &str) -> CardTransition {
        CardTransition::Load {
            previous: previous.map(Into::into),
            current: current.into(),
        }
    }

    #[test]
    fn first_load_has_no_previous() {
        let mut t = TransitionState::new();
        assert_eq!(t.load("Intro"), vec![load(None, "Intro")]);
        assert_eq!(t.current(), Some("Intro"));
        assert_eq!(t.prior(), None);
    }

    #[test]
    fn repeated_load_is_suppressed() {
        let mut t = TransitionState::new();
        let _ = t.load("Intro");
        assert!(t.load("Intro").is_empty());
        assert_eq!(t.load("Menu"), vec![load(Some("Intro"), "Menu")]);
        assert!(t.load("Menu").is_empty());
        assert_eq!(t.load("Intro"), vec![load(Some("Menu"), "Intro")]);
    }

    // Any sequence: one load per actual change.
    #[test]
    fn load_fires_once_per_change() {
        let names = ["A", "A", "B", "B", "B", "A", "C", "C", "A"];
        let mut t = TransitionState::new();
        let fired: usize = names.iter().map(|n| t.load(n).len()).sum();
        assert_eq!(fired, 5, "A, B, A, C, A");
    }

    #[test]
    fn prepare_before_any_load_has_no_unload() {
        let mut t = TransitionState::new();
        assert_eq!(
            t.prepare("Intro"),
            vec![CardTransition::Prepare {
                previous: None,
                current: "Intro".into(),
            }]
        );
        // Prepare does not record the incoming card as current.
        assert_eq!(t.current(), None);
    }

    #[test]
    fn full_cycle_updates_prior_and_current() {
        let mut t = TransitionState::new();
        let _ = t.load("Intro");
        assert_eq!(
            t.prepare("Menu"),
            vec![
                CardTransition::Unload {
                    previous: None,
                    current: "Intro".into(),
                    next: "Menu".into(),
                },
                CardTransition::Prepare {
                    previous: Some("Intro".into()),
                    current: "Menu".into(),
                },
            ]
        );
        assert_eq!(t.prior(), Some("Intro"));
        assert_eq!(t.load("Menu"), vec![load(Some("Intro"), "Menu")]);
        assert_eq!(t.prior(), Some("Intro"));
        assert_eq!(t.current(), Some("Menu"));
        assert!(t.prepare("Menu").is_empty(), "no-op prepare");

        let second = t.prepare("End");
        assert_eq!(
            second[0],
            CardTransition::Unload {
                previous: Some("Intro".into()),
                current: "Menu".into(),
                next: "End".into(),
            }
        );
        assert_eq!(second[1].kind(), CardEventKind::Prepare);
    }

    #[test]
    fn reset_forgets_names() {
        let mut t = TransitionState::new();
        let _ = t.load("Intro");
        t.reset();
        assert_eq!(t, TransitionState::new());
        assert_eq!(t.load("Intro").len(), 1, "reload fires again");
    }
}
