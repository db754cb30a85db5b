// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine: per-document state plus the native entry points.
//!
//! ## Overview
//!
//! [`CardEvents`] owns the [default registry](crate::defaults::Defaults), the
//! [listener registry](crate::dispatch::Listeners), and a map from
//! [`DocumentId`] to per-document state. The host calls one entry point per native
//! callback:
//!
//! - [`CardEvents::document_load`] for `HypeDocumentLoad`,
//! - [`CardEvents::scene_prepare`] for `HypeScenePrepareForDisplay`,
//! - [`CardEvents::scene_load`] for `HypeSceneLoad`,
//! - [`CardEvents::pointer_down`] / [`CardEvents::pointer_up`] for native pointer events,
//!
//! or routes lifecycle callbacks by name through [`CardEvents::handle_native`].
//!
//! ## Lifetime
//!
//! Per-document entries are created on first observation and live as long as the
//! engine. Reloading a document forgets its card names but keeps its pointer
//! tracking, so native pointer listeners are attached once per identifier.

use alloc::string::String;

use hashbrown::HashMap;

use crate::clock::Clock;
use crate::compose;
use crate::defaults::{DEFAULT_SCENE_NAME_FUNCTION, DefaultKey, DefaultMap, DefaultValue, Defaults};
use crate::dispatch::{DispatchError, Listeners, dispatch};
use crate::host::{Document, HandlerContext, HandlerError, InteractionClock};
use crate::interaction::InteractionState;
use crate::transition::{CardTransition, TransitionState};
use crate::types::{
    CardEvent, CardEventKind, DocumentId, ElementRef, NativeEvent, Outcome, PointerEvent,
    Timestamp,
};

/// Per-document state.
#[derive(Clone, Debug, Default, PartialEq)]
struct DocumentState {
    transition: TransitionState,
    /// `Some` once pointer tracking is attached.
    interaction: Option<InteractionState>,
}

impl DocumentState {
    fn interaction_clock(&self, now: Timestamp) -> InteractionClock {
        match &self.interaction {
            Some(tracker) => compose::interaction_clock(tracker, now),
            None => InteractionClock {
                last_interaction_time: None,
                now,
            },
        }
    }
}

/// Scene-transition event engine.
///
/// ```
/// use understory_card_events::CardEvents;
/// use understory_card_events::clock::ManualClock;
/// use understory_card_events::host::Document;
/// use understory_card_events::types::{CardEventKind, DocumentId, ElementRef, Outcome};
///
/// struct Doc(&'static str);
/// impl Document for Doc {
///     fn document_id(&self) -> DocumentId { DocumentId::new("doc") }
///     fn current_scene_name(&self) -> String { self.0.into() }
/// }
///
/// let mut engine = CardEvents::new(ManualClock::new(0));
/// engine.add_listener(CardEventKind::Load, |_, ev| {
///     println!("{:?} → {:?}", ev.previous_card_name, ev.current_card_name);
///     Ok(Outcome::Continue)
/// });
/// let root = ElementRef::new("root");
/// engine.document_load(&mut Doc("Intro"), &root);
/// engine.scene_load(&Doc("Intro"), &root).unwrap();
/// assert_eq!(engine.current_card_name(&DocumentId::new("doc")), Some("Intro"));
/// ```
pub struct CardEvents<C: Clock> {
    clock: C,
    defaults: Defaults,
    listeners: Listeners,
    documents: HashMap<DocumentId, DocumentState>,
}

impl<C: Clock> core::fmt::Debug for CardEvents<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CardEvents")
            .field("defaults", &self.defaults)
            .field("listeners", &self.listeners)
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl Default for CardEvents<crate::clock::SystemClock> {
    fn default() -> Self {
        Self::new(crate::clock::SystemClock)
    }
}

impl<C: Clock> CardEvents<C> {
    /// Create an engine reading time from `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            defaults: Defaults::new(),
            listeners: Listeners::new(),
            documents: HashMap::new(),
        }
    }

    /// Set one default, returning the previous value.
    pub fn set_default(
        &mut self,
        key: DefaultKey,
        value: impl Into<DefaultValue>,
    ) -> Option<DefaultValue> {
        self.defaults.set(key, value)
    }

    /// Replace all defaults.
    pub fn replace_defaults(&mut self, values: DefaultMap) {
        self.defaults.replace(values);
    }

    /// Default for `key`, if set.
    pub fn get_default(&self, key: &DefaultKey) -> Option<&DefaultValue> {
        self.defaults.get(key)
    }

    /// The default registry.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Append a listener for `kind`.
    pub fn add_listener<F>(&mut self, kind: CardEventKind, listener: F)
    where
        F: FnMut(&HandlerContext<'_>, &CardEvent) -> Result<Outcome, HandlerError> + 'static,
    {
        self.listeners.register(kind, listener);
    }

    /// The listener registry.
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Most recently loaded card of a document.
    pub fn current_card_name(&self, id: &DocumentId) -> Option<&str> {
        self.documents.get(id)?.transition.current()
    }

    /// Card loaded before the current one.
    pub fn prior_card_name(&self, id: &DocumentId) -> Option<&str> {
        self.documents.get(id)?.transition.prior()
    }

    /// Whether pointer tracking is attached for a document.
    pub fn is_tracking(&self, id: &DocumentId) -> bool {
        self.documents
            .get(id)
            .is_some_and(|s| s.interaction.is_some())
    }

    /// When the document's last pointer gesture completed.
    pub fn last_interaction_time(&self, id: &DocumentId) -> Option<Timestamp> {
        self.documents
            .get(id)?
            .interaction
            .as_ref()?
            .last_interaction_time()
    }

    /// Milliseconds since the document's last pointer gesture.
    pub fn last_interaction_age(&self, id: &DocumentId) -> Option<u64> {
        let now = self.clock.now();
        self.documents
            .get(id)?
            .interaction_clock(now)
            .last_interaction_age()
    }

    /// Route a native lifecycle callback by kind.
    pub fn handle_native(
        &mut self,
        event: NativeEvent,
        doc: &mut dyn Document,
        element: &ElementRef,
    ) -> Result<Outcome, DispatchError> {
        match event {
            NativeEvent::DocumentLoad => {
                self.document_load(doc, element);
                Ok(Outcome::Continue)
            }
            NativeEvent::ScenePrepareForDisplay => self.scene_prepare(doc, element),
            NativeEvent::SceneLoad => self.scene_load(doc, element),
        }
    }

    /// `HypeDocumentLoad`: forget card names and attach pointer tracking once.
    ///
    /// The root element is looked up by the document id, falling back to `element`.
    pub fn document_load(&mut self, doc: &mut dyn Document, element: &ElementRef) {
        let id = doc.document_id();
        let state = self.documents.entry(id.clone()).or_default();
        state.transition.reset();
        if state.interaction.is_some() {
            log::debug!("document {id} reloaded; pointer tracking already attached");
            return;
        }
        state.interaction = Some(InteractionState::new());
        let root = doc
            .element_by_id(id.as_str())
            .unwrap_or_else(|| element.clone());
        log::debug!("document {id} loaded; attaching pointer tracking to {root:?}");
        doc.attach_pointer_listeners(&root);
    }

    /// `HypeScenePrepareForDisplay`: fire unload (if a card is current) and prepare.
    ///
    /// Returns `Halt` when any of the dispatches was halted by a listener.
    pub fn scene_prepare(
        &mut self,
        doc: &dyn Document,
        element: &ElementRef,
    ) -> Result<Outcome, DispatchError> {
        let incoming = self.scene_name(doc);
        let transitions = self
            .documents
            .entry(doc.document_id())
            .or_default()
            .transition
            .prepare(&incoming);
        self.fire(doc, element, transitions)
    }

    /// `HypeSceneLoad`: fire load when the loaded card differs from the current one.
    pub fn scene_load(
        &mut self,
        doc: &dyn Document,
        element: &ElementRef,
    ) -> Result<Outcome, DispatchError> {
        let loaded = self.scene_name(doc);
        let transitions = self
            .documents
            .entry(doc.document_id())
            .or_default()
            .transition
            .load(&loaded);
        self.fire(doc, element, transitions)
    }

    /// Native pointer-down on a document's root.
    ///
    /// Ignored until [`document_load`](Self::document_load) has attached tracking.
    pub fn pointer_down(&mut self, doc: &dyn Document, event: &PointerEvent) {
        let now = self.clock.now();
        let id = doc.document_id();
        let Some(tracker) = self
            .documents
            .get_mut(&id)
            .and_then(|s| s.interaction.as_mut())
        else {
            log::trace!("pointer-down for untracked document {id}");
            return;
        };
        tracker.pointer_down(event.position, now);
    }

    /// Native pointer-up on a document's root: record the gesture and fire
    /// `HypeCardInteraction` for the pointer's target.
    ///
    /// Ignored until [`document_load`](Self::document_load) has attached tracking.
    pub fn pointer_up(
        &mut self,
        doc: &dyn Document,
        event: &PointerEvent,
    ) -> Result<Outcome, DispatchError> {
        let now = self.clock.now();
        let thresholds = self.defaults.swipe_thresholds();
        let id = doc.document_id();
        let Some(state) = self.documents.get_mut(&id) else {
            log::trace!("pointer-up for untracked document {id}");
            return Ok(Outcome::Continue);
        };
        let Some(tracker) = state.interaction.as_mut() else {
            log::trace!("pointer-up for untracked document {id}");
            return Ok(Outcome::Continue);
        };
        let record = tracker.pointer_up(event.position, now, thresholds);
        let payload = compose::interaction_event(&state.transition, record, event, tracker, now);
        let cx = HandlerContext {
            document: doc,
            element: &event.target,
            interaction: compose::interaction_clock(tracker, now),
        };
        dispatch(&self.defaults, &mut self.listeners, &cx, payload)
    }

    fn scene_name(&self, doc: &dyn Document) -> String {
        let accessor = self.defaults.scene_name_function();
        if accessor != DEFAULT_SCENE_NAME_FUNCTION {
            match doc.scene_name_by(accessor) {
                Some(name) => return name,
                None => log::debug!(
                    "scene name accessor `{accessor}` unavailable; using current scene name"
                ),
            }
        }
        doc.current_scene_name()
    }

    fn fire(
        &mut self,
        doc: &dyn Document,
        element: &ElementRef,
        transitions: alloc::vec::Vec<CardTransition>,
    ) -> Result<Outcome, DispatchError> {
        if transitions.is_empty() {
            return Ok(Outcome::Continue);
        }
        let now = self.clock.now();
        let Some(state) = self.documents.get_mut(&doc.document_id()) else {
            return Ok(Outcome::Continue);
        };
        let mut result = Outcome::Continue;
        for transition in transitions {
            let payload = compose::transition_event(transition, state.interaction.as_mut(), now);
            let cx = HandlerContext {
                document: doc,
                element,
                interaction: state.interaction_clock(now),
            };
            if dispatch(&self.defaults, &mut self.listeners, &cx, payload)?.is_halt() {
                result = Outcome::Halt;
            }
        }
        Ok(result)
    }
}
