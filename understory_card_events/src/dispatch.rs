// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch core: deliver a derived event to every handler tier in a fixed order.
//!
//! ## Order
//!
//! For an event of kind `K`:
//!
//! 1. [`Tier::SpecificDefault`]: the default handler registered for `K`.
//! 2. [`Tier::GenericDefault`]: the catch-all default handler, unless `K` is the
//!    catch-all.
//! 3. [`Tier::GenericUser`]: the document's catch-all handler, unless `K` is the
//!    catch-all.
//! 4. [`Tier::SpecificUser`]: the document's handler for `K`.
//! 5. [`Tier::Listener`]: every listener registered for `K`, in registration order.
//!    A listener returning [`Outcome::Halt`] stops delivery and the dispatch result
//!    is `Halt`.
//!
//! Tiers 1–4 are observational and always run. Errors are not caught: the first
//! failing handler aborts the pass and its error is returned, tagged with the tier.
//!
//! ```
//! use understory_card_events::dispatch::{Listeners, dispatch};
//! use understory_card_events::defaults::Defaults;
//! use understory_card_events::host::{Document, HandlerContext, InteractionClock};
//! use understory_card_events::types::{CardEvent, CardEventKind, DocumentId, ElementRef, Outcome};
//!
//! struct Doc;
//! impl Document for Doc {
//!     fn document_id(&self) -> DocumentId { DocumentId::new("doc") }
//!     fn current_scene_name(&self) -> String { "Intro".into() }
//! }
//!
//! let mut listeners = Listeners::new();
//! listeners.register(CardEventKind::Load, |_, _| Ok(Outcome::Halt));
//! listeners.register(CardEventKind::Load, |_, _| panic!("never reached"));
//!
//! let element = ElementRef::new("root");
//! let cx = HandlerContext { document: &Doc, element: &element, interaction: InteractionClock::default() };
//! let out = dispatch(&Defaults::new(), &mut listeners, &cx, CardEvent::new(CardEventKind::Load)).unwrap();
//! assert_eq!(out, Outcome::Halt);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::defaults::Defaults;
use crate::host::{Handler, HandlerContext, HandlerError};
use crate::types::{CardEvent, CardEventKind, Outcome};

/// A registered listener.
pub type Listener = Box<dyn FnMut(&HandlerContext<'_>, &CardEvent) -> Result<Outcome, HandlerError>>;

/// Handler tiers, in dispatch order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Tier {
    /// Default handler for the event's kind.
    SpecificDefault,
    /// Catch-all default handler.
    GenericDefault,
    /// Document's catch-all handler.
    GenericUser,
    /// Document's handler for the event's kind.
    SpecificUser,
    /// Registered listener at this index in the registry.
    Listener(usize),
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpecificDefault => f.write_str("default"),
            Self::GenericDefault => f.write_str("catch-all default"),
            Self::GenericUser => f.write_str("catch-all user"),
            Self::SpecificUser => f.write_str("user"),
            Self::Listener(i) => write!(f, "listener #{i}"),
        }
    }
}

/// Dispatch failure.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A handler or listener returned an error.
    #[error("{tier} handler for {kind} failed")]
    Handler {
        /// Event being dispatched.
        kind: CardEventKind,
        /// Tier that failed.
        tier: Tier,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Tier that failed.
    pub fn tier(&self) -> Tier {
        match self {
            Self::Handler { tier, .. } => *tier,
        }
    }
}

/// Ordered, append-only registry of `(kind, listener)` pairs.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(CardEventKind, Listener)>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<_> = self.entries.iter().map(|(k, _)| *k).collect();
        f.debug_struct("Listeners")
            .field("kinds", &kinds)
            .finish_non_exhaustive()
    }
}

impl Listeners {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `kind`.
    pub fn register<F>(&mut self, kind: CardEventKind, listener: F)
    where
        F: FnMut(&HandlerContext<'_>, &CardEvent) -> Result<Outcome, HandlerError> + 'static,
    {
        self.entries.push((kind, Box::new(listener)));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: CardEventKind) -> usize {
        self.entries.iter().filter(|(k, _)| *k == kind).count()
    }

    fn deliver(
        &mut self,
        cx: &HandlerContext<'_>,
        event: &CardEvent,
    ) -> Result<Outcome, DispatchError> {
        for (i, (kind, listener)) in self.entries.iter_mut().enumerate() {
            if *kind != event.kind {
                continue;
            }
            let outcome = listener(cx, event).map_err(|source| DispatchError::Handler {
                kind: event.kind,
                tier: Tier::Listener(i),
                source,
            })?;
            if outcome.is_halt() {
                log::debug!("{} halted by listener #{i}", event.kind);
                return Ok(Outcome::Halt);
            }
        }
        Ok(Outcome::Continue)
    }
}

fn call(
    tier: Tier,
    handler: Option<&Handler>,
    cx: &HandlerContext<'_>,
    event: &CardEvent,
) -> Result<(), DispatchError> {
    let Some(handler) = handler else {
        return Ok(());
    };
    handler(cx, event).map_err(|source| DispatchError::Handler {
        kind: event.kind,
        tier,
        source,
    })
}

/// Deliver `event` to every tier.
///
/// Stamps the payload's target with the context's element before delivery.
pub fn dispatch(
    defaults: &Defaults,
    listeners: &mut Listeners,
    cx: &HandlerContext<'_>,
    mut event: CardEvent,
) -> Result<Outcome, DispatchError> {
    let kind = event.kind;
    event.target = cx.element.clone();
    log::debug!(
        "dispatch {kind}: previous {:?}, current {:?}, next {:?}",
        event.previous_card_name,
        event.current_card_name,
        event.next_card_name
    );

    call(Tier::SpecificDefault, defaults.handler(kind), cx, &event)?;
    if !kind.is_generic() {
        call(
            Tier::GenericDefault,
            defaults.handler(CardEventKind::Generic),
            cx,
            &event,
        )?;
        let generic = cx.document.user_handler(CardEventKind::Generic);
        call(Tier::GenericUser, generic.as_ref(), cx, &event)?;
    }
    let specific = cx.document.user_handler(kind);
    call(Tier::SpecificUser, specific.as_ref(), cx, &event)?;

    listeners.deliver(cx, &event)
}
