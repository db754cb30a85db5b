// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default registry: swipe thresholds, the scene-name accessor, and default handlers.
//!
//! ## Keys
//!
//! Keys use the host's names and parse with [`str::parse`]:
//!
//! - `minSwipeDistance`: pixels, default [`DEFAULT_MIN_SWIPE_DISTANCE`].
//! - `maxSwipeDuration`: milliseconds, default [`DEFAULT_MAX_SWIPE_DURATION`].
//! - `sceneNameFunction`: accessor name, default [`DEFAULT_SCENE_NAME_FUNCTION`].
//! - `HypeCardPrepare`, `HypeCardUnload`, `HypeCardLoad`, `HypeCardInteraction`: the
//!   built-in default handler for that event.
//! - `HypeCardEvent`: the catch-all default handler.
//!
//! Any other key is stored as-is and never read by the engine.
//!
//! ## Reading
//!
//! A recognized key holding the wrong kind of value, or removed by
//! [`Defaults::replace`], reads as its built-in default.
//!
//! ```
//! use understory_card_events::defaults::{DefaultKey, DefaultValue, Defaults};
//! let mut d = Defaults::new();
//! assert_eq!(d.swipe_thresholds().min_distance, 30.0);
//! d.set("minSwipeDistance".parse().unwrap(), DefaultValue::Number(48.0));
//! assert_eq!(d.swipe_thresholds().min_distance, 48.0);
//! d.set(DefaultKey::MinSwipeDistance, DefaultValue::Text("wide".into()));
//! assert_eq!(d.swipe_thresholds().min_distance, 30.0);
//! ```

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use crate::host::Handler;
use crate::interaction::SwipeThresholds;
use crate::types::CardEventKind;

/// Minimum swipe distance in pixels.
pub const DEFAULT_MIN_SWIPE_DISTANCE: f64 = 30.0;

/// Maximum swipe duration in milliseconds.
pub const DEFAULT_MAX_SWIPE_DURATION: u64 = 750;

/// Scene-name accessor used when none is configured.
pub const DEFAULT_SCENE_NAME_FUNCTION: &str = "currentSceneName";

/// A key in the default registry.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum DefaultKey {
    /// `minSwipeDistance`.
    MinSwipeDistance,
    /// `maxSwipeDuration`.
    MaxSwipeDuration,
    /// `sceneNameFunction`.
    SceneNameFunction,
    /// Default handler for an event kind; `Generic` is the catch-all.
    Handler(CardEventKind),
    /// Any other key, stored inertly.
    Custom(String),
}

impl DefaultKey {
    /// Host-facing name of this key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::MinSwipeDistance => "minSwipeDistance",
            Self::MaxSwipeDuration => "maxSwipeDuration",
            Self::SceneNameFunction => "sceneNameFunction",
            Self::Handler(kind) => kind.as_str(),
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for DefaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefaultKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "minSwipeDistance" => Self::MinSwipeDistance,
            "maxSwipeDuration" => Self::MaxSwipeDuration,
            "sceneNameFunction" => Self::SceneNameFunction,
            other => match other.parse::<CardEventKind>() {
                Ok(kind) => Self::Handler(kind),
                Err(_) => Self::Custom(other.to_owned()),
            },
        })
    }
}

impl From<CardEventKind> for DefaultKey {
    fn from(kind: CardEventKind) -> Self {
        Self::Handler(kind)
    }
}

/// A value in the default registry.
#[derive(Clone)]
pub enum DefaultValue {
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A boolean.
    Bool(bool),
    /// A handler.
    Handler(Handler),
}

impl DefaultValue {
    /// The number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The handler, if this is one.
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Self::Handler(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<f64> for DefaultValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for DefaultValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for DefaultValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for DefaultValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Handler> for DefaultValue {
    fn from(h: Handler) -> Self {
        Self::Handler(h)
    }
}

/// The registry's backing mapping.
pub type DefaultMap = BTreeMap<DefaultKey, DefaultValue>;

/// Configurable defaults shared by every document.
#[derive(Clone, Debug)]
pub struct Defaults {
    values: DefaultMap,
}

impl Default for Defaults {
    fn default() -> Self {
        Self::new()
    }
}

impl Defaults {
    /// Registry seeded with the built-in thresholds and accessor name.
    pub fn new() -> Self {
        let mut values = DefaultMap::new();
        values.insert(
            DefaultKey::MinSwipeDistance,
            DefaultValue::Number(DEFAULT_MIN_SWIPE_DISTANCE),
        );
        values.insert(
            DefaultKey::MaxSwipeDuration,
            DefaultValue::Number(DEFAULT_MAX_SWIPE_DURATION as f64),
        );
        values.insert(
            DefaultKey::SceneNameFunction,
            DefaultValue::Text(DEFAULT_SCENE_NAME_FUNCTION.to_owned()),
        );
        Self { values }
    }

    /// Set one key, returning the previous value.
    pub fn set(&mut self, key: DefaultKey, value: impl Into<DefaultValue>) -> Option<DefaultValue> {
        self.values.insert(key, value.into())
    }

    /// Replace the whole mapping.
    pub fn replace(&mut self, values: DefaultMap) {
        self.values = values;
    }

    /// Value for `key`, if set.
    pub fn get(&self, key: &DefaultKey) -> Option<&DefaultValue> {
        self.values.get(key)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &DefaultKey) -> Option<DefaultValue> {
        self.values.remove(key)
    }

    /// The whole mapping.
    pub fn all(&self) -> &DefaultMap {
        &self.values
    }

    /// Swipe thresholds currently in effect.
    pub fn swipe_thresholds(&self) -> SwipeThresholds {
        let min_distance = self
            .number(&DefaultKey::MinSwipeDistance)
            .unwrap_or(DEFAULT_MIN_SWIPE_DISTANCE);
        let max_duration = self
            .number(&DefaultKey::MaxSwipeDuration)
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map_or(DEFAULT_MAX_SWIPE_DURATION, |ms| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "finite and non-negative, checked above"
                )]
                let ms = ms as u64;
                ms
            });
        SwipeThresholds {
            min_distance,
            max_duration,
        }
    }

    /// Name of the configured scene-name accessor.
    pub fn scene_name_function(&self) -> &str {
        self.get(&DefaultKey::SceneNameFunction)
            .and_then(DefaultValue::as_text)
            .unwrap_or(DEFAULT_SCENE_NAME_FUNCTION)
    }

    /// Default handler registered for `kind`, if any.
    pub fn handler(&self, kind: CardEventKind) -> Option<&Handler> {
        self.get(&DefaultKey::Handler(kind))
            .and_then(DefaultValue::as_handler)
    }

    fn number(&self, key: &DefaultKey) -> Option<f64> {
        let value = self.get(key)?;
        let n = value.as_number();
        if n.is_none() {
            log::warn!("default `{key}` is not a number ({value:?}); using built-in");
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::handler;
    use alloc::string::ToString;

    #[test]
    fn builtins_are_seeded() {
        let d = Defaults::new();
        let t = d.swipe_thresholds();
        assert_eq!(t.min_distance, 30.0, "min distance default");
        assert_eq!(t.max_duration, 750, "max duration default");
        assert_eq!(d.scene_name_function(), "currentSceneName");
        assert_eq!(d.all().len(), 3, "only the three built-ins");
    }

    #[test]
    fn keys_round_trip_through_names() {
        for name in [
            "minSwipeDistance",
            "maxSwipeDuration",
            "sceneNameFunction",
            "HypeCardLoad",
            "HypeCardEvent",
            "somethingElse",
        ] {
            let key: DefaultKey = name.parse().unwrap();
            assert_eq!(key.to_string(), name);
        }
        assert_eq!(
            "HypeCardEvent".parse::<DefaultKey>(),
            Ok(DefaultKey::Handler(CardEventKind::Generic))
        );
        assert_eq!(
            "somethingElse".parse::<DefaultKey>(),
            Ok(DefaultKey::Custom("somethingElse".into()))
        );
    }

    #[test]
    fn unknown_keys_are_stored_inertly() {
        let mut d = Defaults::new();
        d.set(DefaultKey::Custom("theme".into()), "dark");
        assert_eq!(
            d.get(&DefaultKey::Custom("theme".into()))
                .and_then(DefaultValue::as_text),
            Some("dark")
        );
        assert_eq!(d.swipe_thresholds(), SwipeThresholds::default());
    }

    #[test]
    fn replace_drops_builtins_and_falls_back() {
        let mut d = Defaults::new();
        let mut map = DefaultMap::new();
        map.insert(DefaultKey::MaxSwipeDuration, DefaultValue::Number(300.0));
        d.replace(map);
        assert!(d.get(&DefaultKey::MinSwipeDistance).is_none());
        let t = d.swipe_thresholds();
        assert_eq!(t.min_distance, DEFAULT_MIN_SWIPE_DISTANCE);
        assert_eq!(t.max_duration, 300);
        assert_eq!(d.scene_name_function(), DEFAULT_SCENE_NAME_FUNCTION);
    }

    #[test]
    fn negative_duration_falls_back() {
        let mut d = Defaults::new();
        d.set(DefaultKey::MaxSwipeDuration, -5.0);
        assert_eq!(d.swipe_thresholds().max_duration, DEFAULT_MAX_SWIPE_DURATION);
    }

    #[test]
    fn handlers_are_looked_up_by_kind() {
        let mut d = Defaults::new();
        assert!(d.handler(CardEventKind::Load).is_none());
        d.set(CardEventKind::Load.into(), handler(|_, _| Ok(())));
        assert!(d.handler(CardEventKind::Load).is_some());
        assert!(d.handler(CardEventKind::Generic).is_none());
        // A non-handler value under a handler key is ignored.
        d.set(CardEventKind::Generic.into(), true);
        assert!(d.handler(CardEventKind::Generic).is_none());
    }
}
