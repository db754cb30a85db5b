// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card transitions from native scene callbacks.
//!
//! This example drives a document through Intro → Menu → End, printing every
//! derived event as JSON. Re-showing the current card produces nothing.
//!
//! Run:
//! - `cargo run -p understory_card_events_demos --example card_transitions`

use std::cell::RefCell;
use std::rc::Rc;

use understory_card_events::CardEvents;
use understory_card_events::clock::ManualClock;
use understory_card_events::host::{Document, FunctionTable, Handler, handler};
use understory_card_events::types::{
    CardEvent, CardEventKind, DocumentId, ElementRef, NativeEvent, Outcome,
};

struct Doc {
    scene: String,
    functions: FunctionTable,
}

impl Document for Doc {
    fn document_id(&self) -> DocumentId {
        DocumentId::new("index_hype_container")
    }

    fn current_scene_name(&self) -> String {
        self.scene.clone()
    }

    fn user_handler(&self, kind: CardEventKind) -> Option<Handler> {
        self.functions.get(kind)
    }
}

fn main() {
    let mut engine = CardEvents::new(ManualClock::new(0));
    let seen: Rc<RefCell<Vec<CardEvent>>> = Rc::default();
    for kind in CardEventKind::DERIVED {
        let seen = seen.clone();
        engine.add_listener(kind, move |_, ev| {
            println!("  {}", serde_json::to_string(ev)?);
            seen.borrow_mut().push(ev.clone());
            Ok(Outcome::Continue)
        });
    }

    let mut functions = FunctionTable::new();
    functions.set(
        CardEventKind::Generic,
        handler(|cx, ev| {
            println!("catch-all on {}: {}", cx.document.document_id(), ev.kind);
            Ok(())
        }),
    );
    let mut doc = Doc {
        scene: "Intro".into(),
        functions,
    };
    let root = ElementRef::new("index_hype_container");

    let script = [
        (NativeEvent::DocumentLoad, "Intro"),
        (NativeEvent::ScenePrepareForDisplay, "Intro"),
        (NativeEvent::SceneLoad, "Intro"),
        (NativeEvent::ScenePrepareForDisplay, "Menu"),
        (NativeEvent::SceneLoad, "Menu"),
        (NativeEvent::ScenePrepareForDisplay, "Menu"),
        (NativeEvent::ScenePrepareForDisplay, "End"),
        (NativeEvent::SceneLoad, "End"),
    ];
    for (native, scene) in script {
        doc.scene = scene.into();
        println!("== {native} ({scene}) ==");
        engine
            .handle_native(native, &mut doc, &root)
            .expect("no handler fails in this demo");
    }

    let kinds: Vec<_> = seen.borrow().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CardEventKind::Prepare,
            CardEventKind::Load,
            CardEventKind::Unload,
            CardEventKind::Prepare,
            CardEventKind::Load,
            CardEventKind::Unload,
            CardEventKind::Prepare,
            CardEventKind::Load,
        ]
    );
}
