// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing seams: the document handle, handlers, and the context handlers receive.
//!
//! ## Overview
//!
//! The engine never owns a document. Each entry point borrows a [`Document`] for the
//! duration of one native callback, reads its identity and scene name through it, and
//! hands it to handlers inside a [`HandlerContext`].
//!
//! User handlers live on the document ([`Document::user_handler`]), typically in a
//! [`FunctionTable`]. Default handlers live in the
//! [default registry](crate::defaults::Defaults). Listeners live in the engine's
//! [listener registry](crate::dispatch::Listeners).

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use hashbrown::HashMap;

use crate::types::{CardEvent, CardEventKind, DocumentId, ElementRef, Timestamp};

/// Error type handlers and listeners may fail with.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result of a handler call.
pub type HandlerResult = Result<(), HandlerError>;

/// A shared, observational handler.
///
/// Used for default handlers and user handlers. Construct with [`handler`].
pub type Handler = Rc<dyn Fn(&HandlerContext<'_>, &CardEvent) -> HandlerResult>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&HandlerContext<'_>, &CardEvent) -> HandlerResult + 'static,
{
    Rc::new(f)
}

/// A loaded document instance as seen by the engine.
///
/// Only [`document_id`](Self::document_id) and
/// [`current_scene_name`](Self::current_scene_name) are required.
pub trait Document {
    /// Stable identifier of this document instance.
    fn document_id(&self) -> DocumentId;

    /// Name of the scene currently being shown or prepared.
    fn current_scene_name(&self) -> String;

    /// Call a scene-name accessor by name.
    ///
    /// Returns `None` when no accessor of that name exists; the engine then falls back
    /// to [`current_scene_name`](Self::current_scene_name).
    fn scene_name_by(&self, accessor: &str) -> Option<String> {
        let _ = accessor;
        None
    }

    /// User-supplied handler for `kind`, if any.
    fn user_handler(&self, kind: CardEventKind) -> Option<Handler> {
        let _ = kind;
        None
    }

    /// Look up an element by id.
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        let _ = id;
        None
    }

    /// Start delivering native pointer-down/pointer-up events on `root` to the engine.
    ///
    /// Called at most once per document identifier. Listeners should be passive.
    fn attach_pointer_listeners(&mut self, root: &ElementRef) {
        let _ = root;
    }
}

/// Read-only interaction timing for one document at one instant.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct InteractionClock {
    /// When the last pointer gesture completed.
    pub last_interaction_time: Option<Timestamp>,
    /// The instant this view was taken.
    pub now: Timestamp,
}

impl InteractionClock {
    /// Milliseconds since the last completed gesture, if any.
    pub fn last_interaction_age(&self) -> Option<u64> {
        self.last_interaction_time
            .map(|t| self.now.saturating_sub(t))
    }
}

/// Everything a handler or listener can see besides the payload.
pub struct HandlerContext<'a> {
    /// The document the event belongs to.
    pub document: &'a dyn Document,
    /// The element the event is dispatched for.
    pub element: &'a ElementRef,
    /// Interaction timing for the document.
    pub interaction: InteractionClock,
}

impl HandlerContext<'_> {
    /// When the last pointer gesture completed, if any.
    pub fn last_interaction_time(&self) -> Option<Timestamp> {
        self.interaction.last_interaction_time
    }

    /// Milliseconds since the last completed gesture, if any.
    pub fn last_interaction_age(&self) -> Option<u64> {
        self.interaction.last_interaction_age()
    }
}

impl fmt::Debug for HandlerContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerContext")
            .field("document", &self.document.document_id())
            .field("element", &self.element)
            .field("interaction", &self.interaction)
            .finish()
    }
}

/// A typed table of user handlers, one slot per event kind.
///
/// Hosts can embed one and forward [`Document::user_handler`] to [`FunctionTable::get`].
#[derive(Clone, Default)]
pub struct FunctionTable {
    slots: HashMap<CardEventKind, Handler>,
}

impl FunctionTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `kind`, replacing any previous one.
    pub fn set(&mut self, kind: CardEventKind, handler: Handler) -> &mut Self {
        self.slots.insert(kind, handler);
        self
    }

    /// Remove the handler for `kind`.
    pub fn remove(&mut self, kind: CardEventKind) -> Option<Handler> {
        self.slots.remove(&kind)
    }

    /// Handler for `kind`, if any.
    pub fn get(&self, kind: CardEventKind) -> Option<Handler> {
        self.slots.get(&kind).cloned()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: alloc::vec::Vec<_> = self.slots.keys().copied().collect();
        kinds.sort();
        f.debug_struct("FunctionTable")
            .field("kinds", &kinds)
            .finish_non_exhaustive()
    }
}
