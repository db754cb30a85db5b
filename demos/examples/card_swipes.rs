// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe telemetry handed to the next unload.
//!
//! A listener on `HypeCardInteraction` turns a left swipe into navigation; the
//! following unload reports that gesture once.
//!
//! Run:
//! - `cargo run -p understory_card_events_demos --example card_swipes`

use std::cell::Cell;
use std::rc::Rc;

use understory_card_events::CardEvents;
use understory_card_events::clock::ManualClock;
use understory_card_events::defaults::DefaultKey;
use understory_card_events::host::Document;
use understory_card_events::types::{
    CardEventKind, DocumentId, ElementRef, Outcome, PointerEvent, SwipeDirection,
};

struct Doc {
    scene: String,
}

impl Document for Doc {
    fn document_id(&self) -> DocumentId {
        DocumentId::new("swipes")
    }

    fn current_scene_name(&self) -> String {
        self.scene.clone()
    }
}

fn main() {
    let clock = ManualClock::new(10_000);
    let mut engine = CardEvents::new(clock.clone());
    engine.set_default(DefaultKey::MinSwipeDistance, 60.0);

    let go_next = Rc::new(Cell::new(false));
    let flag = go_next.clone();
    engine.add_listener(CardEventKind::Interaction, move |_, ev| {
        let rec = ev.interaction.as_ref().ok_or("interaction without record")?;
        println!(
            "interaction: distance {:?}, duration {:?}, swipe {:?}",
            rec.distance, rec.duration, rec.swipe_direction
        );
        flag.set(rec.swipe_direction == Some(SwipeDirection::Left));
        Ok(Outcome::Continue)
    });
    engine.add_listener(CardEventKind::Unload, |cx, ev| {
        println!(
            "unload {:?} → {:?}: gesture {:?}, age {:?} (now {:?})",
            ev.current_card_name,
            ev.next_card_name,
            ev.interaction.as_ref().map(|r| r.swipe_direction),
            ev.last_interaction_age,
            cx.last_interaction_age(),
        );
        Ok(Outcome::Continue)
    });

    let root = ElementRef::new("swipes");
    let mut doc = Doc {
        scene: "Page 1".into(),
    };
    engine.document_load(&mut doc, &root);
    engine.scene_load(&doc, &root).expect("load");

    // Too short for the 60px threshold.
    engine.pointer_down(&doc, &PointerEvent::new(400.0, 300.0, root.clone()));
    clock.advance(120);
    engine
        .pointer_up(&doc, &PointerEvent::new(370.0, 300.0, root.clone()))
        .expect("tap");
    assert!(!go_next.get());

    // A real swipe.
    engine.pointer_down(&doc, &PointerEvent::new(400.0, 300.0, root.clone()));
    clock.advance(200);
    engine
        .pointer_up(&doc, &PointerEvent::new(250.0, 320.0, root.clone()))
        .expect("swipe");
    assert!(go_next.get());

    clock.advance(50);
    doc.scene = "Page 2".into();
    engine.scene_prepare(&doc, &root).expect("prepare");
    engine.scene_load(&doc, &root).expect("load");

    let id = DocumentId::new("swipes");
    assert_eq!(engine.last_interaction_time(&id), None, "handed off");
}
