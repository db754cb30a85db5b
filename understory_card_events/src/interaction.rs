// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction tracker: pointer-down/up pairing and swipe classification.
//!
//! ## States
//!
//! Each document cycles `Idle → DownRecorded → Idle` once per gesture.
//! A pointer-down overwrites any stale pending down; there is no gesture id.
//! A pointer-up without a pending down still completes a gesture, with distance,
//! duration and direction left absent.
//!
//! ```
//! use kurbo::Point;
//! use understory_card_events::interaction::{InteractionState, SwipeThresholds};
//! use understory_card_events::types::SwipeDirection;
//!
//! let mut s = InteractionState::new();
//! s.pointer_down(Point::new(100.0, 10.0), 1_000);
//! let rec = s.pointer_up(Point::new(60.0, 12.0), 1_200, SwipeThresholds::default());
//! assert!(rec.is_swipe);
//! assert_eq!(rec.swipe_direction, Some(SwipeDirection::Left));
//! assert_eq!(s.last_interaction_time(), Some(1_200));
//! ```

use kurbo::Point;

use crate::defaults::{DEFAULT_MAX_SWIPE_DURATION, DEFAULT_MIN_SWIPE_DISTANCE};
use crate::types::{InteractionRecord, PointerSample, SwipeDirection, Timestamp};

/// Thresholds a gesture must meet to count as a swipe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeThresholds {
    /// Minimum distance in pixels (inclusive).
    pub min_distance: f64,
    /// Maximum duration in milliseconds (inclusive).
    pub max_duration: u64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_SWIPE_DISTANCE,
            max_duration: DEFAULT_MAX_SWIPE_DURATION,
        }
    }
}

impl SwipeThresholds {
    /// Whether a gesture of `distance` pixels over `duration` ms is a swipe.
    pub fn is_swipe(&self, distance: f64, duration: u64) -> bool {
        distance >= self.min_distance && duration <= self.max_duration
    }
}

/// Per-document pointer tracking state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pending_down: Option<PointerSample>,
    last_interaction: Option<InteractionRecord>,
    last_interaction_time: Option<Timestamp>,
}

impl InteractionState {
    /// Idle state with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down awaiting its pointer-up, if any.
    pub fn pending_down(&self) -> Option<&PointerSample> {
        self.pending_down.as_ref()
    }

    /// Most recent completed gesture not yet reported in an unload.
    pub fn last_interaction(&self) -> Option<&InteractionRecord> {
        self.last_interaction.as_ref()
    }

    /// When the last gesture completed.
    pub fn last_interaction_time(&self) -> Option<Timestamp> {
        self.last_interaction_time
    }

    /// Record a pointer-down.
    pub fn pointer_down(&mut self, position: Point, now: Timestamp) {
        log::trace!("pointer down at {position:?} ({now} ms)");
        self.pending_down = Some(PointerSample {
            position,
            time: now,
        });
    }

    /// Complete a gesture with a pointer-up and return its record.
    ///
    /// The record is also kept as [`last_interaction`](Self::last_interaction).
    pub fn pointer_up(
        &mut self,
        position: Point,
        now: Timestamp,
        thresholds: SwipeThresholds,
    ) -> InteractionRecord {
        let up = PointerSample {
            position,
            time: now,
        };
        let record = classify(self.pending_down.take(), up, thresholds);
        log::trace!(
            "pointer up at {position:?}: distance {:?}, duration {:?}, swipe {}",
            record.distance,
            record.duration,
            record.is_swipe
        );
        self.last_interaction = Some(record.clone());
        self.last_interaction_time = Some(now);
        record
    }

    /// Hand the last gesture off to an unload payload.
    ///
    /// Clears the record, the pending down and the last interaction time, so the
    /// gesture is reported exactly once.
    pub fn take_for_unload(&mut self) -> Option<InteractionRecord> {
        self.pending_down = None;
        self.last_interaction_time = None;
        self.last_interaction.take()
    }
}

/// Build the record for a gesture ending in `up`.
pub fn classify(
    down: Option<PointerSample>,
    up: PointerSample,
    thresholds: SwipeThresholds,
) -> InteractionRecord {
    let mut record = InteractionRecord {
        pointer_down: down,
        pointer_up: up,
        distance: None,
        duration: None,
        is_swipe: false,
        swipe_direction: None,
        min_swipe_distance: thresholds.min_distance,
        max_swipe_duration: thresholds.max_duration,
    };
    if let Some(down) = down {
        let delta = up.position - down.position;
        let distance = delta.hypot();
        let duration = up.time.saturating_sub(down.time);
        record.distance = Some(distance);
        record.duration = Some(duration);
        record.is_swipe = thresholds.is_swipe(distance, duration);
        if record.is_swipe {
            record.swipe_direction = Some(SwipeDirection::from_displacement(delta));
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, time: Timestamp) -> PointerSample {
        PointerSample {
            position: Point::new(x, y),
            time,
        }
    }

    #[test]
    fn swipe_when_far_and_fast() {
        let t = SwipeThresholds::default();
        assert!(t.is_swipe(40.0, 500));
        assert!(!t.is_swipe(40.0, 900), "too slow");
        assert!(!t.is_swipe(10.0, 100), "too short");
        // Both bounds are inclusive.
        assert!(t.is_swipe(30.0, 750));
    }

    #[test]
    fn classify_measures_distance_and_duration() {
        let rec = classify(
            Some(sample(0.0, 0.0, 1_000)),
            sample(30.0, 40.0, 1_500),
            SwipeThresholds::default(),
        );
        assert_eq!(rec.distance, Some(50.0));
        assert_eq!(rec.duration, Some(500));
        assert!(rec.is_swipe);
        assert_eq!(rec.swipe_direction, Some(SwipeDirection::Down));
        assert_eq!(rec.min_swipe_distance, 30.0);
        assert_eq!(rec.max_swipe_duration, 750);
    }

    #[test]
    fn slow_drag_has_no_direction() {
        let rec = classify(
            Some(sample(0.0, 0.0, 0)),
            sample(-40.0, 0.0, 900),
            SwipeThresholds::default(),
        );
        assert_eq!(rec.distance, Some(40.0));
        assert!(!rec.is_swipe);
        assert_eq!(rec.swipe_direction, None);
    }

    #[test]
    fn up_without_down_is_tolerated() {
        let mut s = InteractionState::new();
        let rec = s.pointer_up(Point::new(5.0, 5.0), 42, SwipeThresholds::default());
        assert_eq!(rec.pointer_down, None);
        assert_eq!(rec.distance, None);
        assert_eq!(rec.duration, None);
        assert!(!rec.is_swipe);
        assert_eq!(s.last_interaction_time(), Some(42));
    }

    #[test]
    fn latest_down_wins() {
        let mut s = InteractionState::new();
        s.pointer_down(Point::new(0.0, 0.0), 0);
        s.pointer_down(Point::new(100.0, 0.0), 100);
        let rec = s.pointer_up(Point::new(100.0, 10.0), 200, SwipeThresholds::default());
        assert_eq!(rec.distance, Some(10.0));
        assert_eq!(rec.duration, Some(100));
        assert!(s.pending_down().is_none(), "up consumes the pending down");
    }

    #[test]
    fn custom_thresholds_are_recorded() {
        let t = SwipeThresholds {
            min_distance: 5.0,
            max_duration: 50,
        };
        let rec = classify(Some(sample(0.0, 0.0, 0)), sample(0.0, -6.0, 40), t);
        assert!(rec.is_swipe);
        assert_eq!(rec.swipe_direction, Some(SwipeDirection::Up));
        assert_eq!(rec.min_swipe_distance, 5.0);
        assert_eq!(rec.max_swipe_duration, 50);
    }

    #[test]
    fn unload_hand_off_is_one_shot() {
        let mut s = InteractionState::new();
        s.pointer_down(Point::new(0.0, 0.0), 0);
        s.pointer_up(Point::new(50.0, 0.0), 100, SwipeThresholds::default());
        s.pointer_down(Point::new(1.0, 1.0), 150);

        let first = s.take_for_unload();
        assert!(first.is_some());
        assert!(s.pending_down().is_none());
        assert!(s.last_interaction_time().is_none());
        assert!(s.take_for_unload().is_none(), "second hand-off is empty");
    }
}
