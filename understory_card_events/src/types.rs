// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: identifiers, event kinds, outcomes, pointer samples, and payloads.
//!
//! ## Overview
//!
//! These types describe what flows through the engine. Native lifecycle callbacks are
//! named by [`NativeEvent`], derived events by [`CardEventKind`], and every derived
//! event carries a [`CardEvent`] payload.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Vec2};

/// Milliseconds on the host's clock.
///
/// See [`Clock`](crate::clock::Clock).
pub type Timestamp = u64;

/// Opaque identifier of one loaded document instance.
///
/// Stable for the life of the document; the engine keys all per-document state by it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a host element (a document root, a scene, or a pointer target).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementRef(pub String);

impl ElementRef {
    /// Create an element reference from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Derived event kinds.
///
/// [`Generic`](Self::Generic) names the catch-all slot: handlers registered under it
/// observe every other kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum CardEventKind {
    /// The incoming card is about to be displayed.
    Prepare,
    /// The current card is about to be replaced.
    Unload,
    /// A new card finished loading.
    Load,
    /// A pointer gesture completed.
    Interaction,
    /// Catch-all handler slot.
    Generic,
}

impl CardEventKind {
    /// Kinds that are actually dispatched, in catalog order.
    pub const DERIVED: [Self; 4] = [Self::Prepare, Self::Unload, Self::Load, Self::Interaction];

    /// Host-facing name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "HypeCardPrepare",
            Self::Unload => "HypeCardUnload",
            Self::Load => "HypeCardLoad",
            Self::Interaction => "HypeCardInteraction",
            Self::Generic => "HypeCardEvent",
        }
    }

    /// Whether this is the catch-all slot.
    pub const fn is_generic(self) -> bool {
        matches!(self, Self::Generic)
    }
}

impl fmt::Display for CardEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEventName(pub String);

impl FromStr for CardEventKind {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HypeCardPrepare" => Ok(Self::Prepare),
            "HypeCardUnload" => Ok(Self::Unload),
            "HypeCardLoad" => Ok(Self::Load),
            "HypeCardInteraction" => Ok(Self::Interaction),
            "HypeCardEvent" => Ok(Self::Generic),
            other => Err(UnknownEventName(other.into())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CardEventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Native lifecycle callbacks consumed from the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NativeEvent {
    /// A document instance finished loading.
    DocumentLoad,
    /// A scene is about to be displayed; the old one is still present.
    ScenePrepareForDisplay,
    /// A scene finished loading.
    SceneLoad,
}

impl NativeEvent {
    /// All native events the engine listens to, in registration order.
    pub const ALL: [Self; 3] = [Self::DocumentLoad, Self::ScenePrepareForDisplay, Self::SceneLoad];

    /// Host-facing name of this callback.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DocumentLoad => "HypeDocumentLoad",
            Self::ScenePrepareForDisplay => "HypeScenePrepareForDisplay",
            Self::SceneLoad => "HypeSceneLoad",
        }
    }
}

impl fmt::Display for NativeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NativeEvent {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HypeDocumentLoad" => Ok(Self::DocumentLoad),
            "HypeScenePrepareForDisplay" => Ok(Self::ScenePrepareForDisplay),
            "HypeSceneLoad" => Ok(Self::SceneLoad),
            other => Err(UnknownEventName(other.into())),
        }
    }
}

/// Listener outcome controlling dispatch.
///
/// Returned by every registered listener. The dispatcher checks it after each call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Keep delivering to the remaining listeners.
    Continue,
    /// Stop delivering; the overall dispatch result becomes `Halt`.
    Halt,
}

impl Outcome {
    /// Whether dispatch was stopped.
    pub const fn is_halt(self) -> bool {
        matches!(self, Self::Halt)
    }
}

/// A native pointer event as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PointerEvent {
    /// Client-space position (`clientX`, `clientY`).
    pub position: Point,
    /// Element the pointer event was targeted at.
    pub target: ElementRef,
}

impl PointerEvent {
    /// Create a pointer event at client coordinates `(x, y)`.
    pub fn new(x: f64, y: f64, target: ElementRef) -> Self {
        Self {
            position: Point::new(x, y),
            target,
        }
    }
}

/// A timestamped pointer position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointerSample {
    /// Client-space position.
    pub position: Point,
    /// When the sample was taken.
    pub time: Timestamp,
}

/// Direction of a swipe in screen coordinates (y grows downwards).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SwipeDirection {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
}

impl SwipeDirection {
    /// Classify a displacement.
    ///
    /// Horizontal only when `|dx| > |dy|`; equal magnitudes resolve vertically.
    pub fn from_displacement(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x < 0.0 { Self::Left } else { Self::Right }
        } else if delta.y < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Result of one completed pointer gesture.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InteractionRecord {
    /// Matching pointer-down, if one was recorded.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pointer_down: Option<PointerSample>,
    /// The pointer-up that completed the gesture.
    pub pointer_up: PointerSample,
    /// Euclidean distance between down and up, absent without a down.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub distance: Option<f64>,
    /// Milliseconds between down and up, absent without a down.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub duration: Option<u64>,
    /// Whether the gesture met both swipe thresholds.
    pub is_swipe: bool,
    /// Direction, reported for swipes only.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub swipe_direction: Option<SwipeDirection>,
    /// Distance threshold in effect for this gesture.
    pub min_swipe_distance: f64,
    /// Duration threshold in effect for this gesture.
    pub max_swipe_duration: u64,
}

/// Payload of a derived event.
///
/// Built by the [composer](crate::compose) and stamped with [`kind`](Self::kind)
/// and [`target`](Self::target) by the [dispatcher](crate::dispatch).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CardEvent {
    /// Event kind.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: CardEventKind,
    /// Element the event is dispatched for.
    pub target: ElementRef,
    /// Card that was current before the transition.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub previous_card_name: Option<String>,
    /// Card that is current for this event.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub current_card_name: Option<String>,
    /// Card the transition is heading to, when known.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub next_card_name: Option<String>,
    /// Milliseconds since the last completed pointer gesture.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub last_interaction_age: Option<u64>,
    /// Interaction telemetry; unload and interaction events only.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub interaction: Option<InteractionRecord>,
    /// Native pointer fields; interaction events only.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pointer: Option<PointerEvent>,
}

impl CardEvent {
    /// An empty payload of the given kind.
    pub fn new(kind: CardEventKind) -> Self {
        Self {
            kind,
            target: ElementRef::default(),
            previous_card_name: None,
            current_card_name: None,
            next_card_name: None,
            last_interaction_age: None,
            interaction: None,
            pointer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipe_direction_horizontal_wins_when_strictly_larger() {
        assert_eq!(
            SwipeDirection::from_displacement(Vec2::new(-50.0, 5.0)),
            SwipeDirection::Left
        );
        assert_eq!(
            SwipeDirection::from_displacement(Vec2::new(50.0, -5.0)),
            SwipeDirection::Right
        );
    }

    #[test]
    fn swipe_direction_vertical() {
        assert_eq!(
            SwipeDirection::from_displacement(Vec2::new(5.0, -50.0)),
            SwipeDirection::Up
        );
        assert_eq!(
            SwipeDirection::from_displacement(Vec2::new(-5.0, 50.0)),
            SwipeDirection::Down
        );
    }

    // Equal magnitudes fall through the |dx| > |dy| test.
    #[test]
    fn swipe_direction_tie_is_vertical() {
        assert_eq!(
            SwipeDirection::from_displacement(Vec2::new(30.0, 30.0)),
            SwipeDirection::Down
        );
        assert_eq!(
            SwipeDirection::from_displacement(Vec2::new(-30.0, -30.0)),
            SwipeDirection::Up
        );
    }

    #[test]
    fn event_names_parse_back() {
        for kind in CardEventKind::DERIVED {
            assert_eq!(kind.as_str().parse::<CardEventKind>(), Ok(kind));
        }
        assert_eq!("HypeCardEvent".parse(), Ok(CardEventKind::Generic));
        for native in NativeEvent::ALL {
            assert_eq!(native.as_str().parse::<NativeEvent>(), Ok(native));
        }
        assert_eq!(
            "HypeSceneUnload".parse::<NativeEvent>(),
            Err(UnknownEventName("HypeSceneUnload".into()))
        );
    }
}
