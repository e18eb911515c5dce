//! Integration tests for scripted walkthrough sessions
//!
//! Replays script tapes against sessions built from the bundled walkthroughs,
//! on a paused tokio clock so decay timers fire deterministically.

use super::common::{advance, bundled_session, location_change, render, write_tape};
use memo_lab::{replay, ScriptEvent, ScriptTape, TraceRecord};
use tempfile::TempDir;

fn unit(record: &TraceRecord, name: &str) -> (u64, bool) {
    let snapshot = record
        .status
        .units
        .iter()
        .find(|u| u.name == name)
        .unwrap_or_else(|| panic!("unit {name} missing at #{}", record.seq));
    (snapshot.count, snapshot.active)
}

/// Walk the broken-memo baseline: mount, trigger, re-render, advance
#[tokio::test(start_paused = true)]
async fn test_baseline_walkthrough() {
    let mut session = bundled_session("broken-memo");

    let mut events = location_change();
    events.push(ScriptEvent::Next);
    events.push(ScriptEvent::Trigger { step: None });
    events.extend(location_change());
    events.push(advance(600));
    events.push(ScriptEvent::Next);
    events.push(ScriptEvent::Back);
    events.push(ScriptEvent::Goto {
        step: "nope".to_string(),
    });
    events.push(ScriptEvent::Reset);

    let trace = replay(&mut session, &ScriptTape::new(events)).await;
    assert_eq!(trace.len(), 13);

    // Initial mount never flashes
    assert_eq!(unit(&trace[2], "ProductList"), (1, false));
    assert_eq!(unit(&trace[2], "ShoppingApp"), (1, false));

    // Forward navigation waits for the trigger
    assert_eq!(trace[3].status.step, "baseline");
    assert_eq!(
        trace[3].error.as_deref(),
        Some("Step baseline is waiting for its trigger")
    );
    assert!(trace[4].status.trigger_observed);

    // Location change re-renders everything
    assert_eq!(unit(&trace[7], "ShoppingApp"), (2, true));
    assert_eq!(unit(&trace[7], "Location"), (2, true));
    assert_eq!(unit(&trace[7], "ProductList"), (2, true));

    // Flags decay once the window passes
    for name in ["ShoppingApp", "Location", "ProductList"] {
        assert_eq!(unit(&trace[8], name), (2, false));
    }

    assert_eq!(trace[9].status.step, "memoiseProp");
    assert!(!trace[9].status.trigger_observed);

    // Back on baseline the trigger is remembered
    assert_eq!(trace[10].status.step, "baseline");
    assert!(trace[10].status.trigger_observed);

    assert_eq!(trace[11].status.step, "baseline");
    assert_eq!(trace[11].error.as_deref(), Some("Invalid step: nope"));

    // Reset clears triggers but leaves render counts alone
    assert_eq!(trace[12].status.step, "baseline");
    assert!(!trace[12].status.trigger_observed);
    assert_eq!(session.sequencer().trigger_observed("baseline"), Some(false));
    assert_eq!(unit(&trace[12], "ProductList"), (2, false));
}

/// Repeated renders inside the window keep the flag raised
#[tokio::test(start_paused = true)]
async fn test_debounced_flash() {
    let mut session = bundled_session("broken-memo");
    let tape = ScriptTape::new(vec![
        render("ProductList"),
        render("ProductList"),
        advance(300),
        render("ProductList"),
        advance(300),
        advance(250),
    ]);

    let trace = replay(&mut session, &tape).await;
    assert_eq!(unit(&trace[1], "ProductList"), (2, true));
    assert_eq!(unit(&trace[2], "ProductList"), (2, true));
    assert_eq!(unit(&trace[3], "ProductList"), (3, true));
    assert_eq!(unit(&trace[4], "ProductList"), (3, true));
    assert_eq!(unit(&trace[5], "ProductList"), (3, false));
}

/// Unmounting mid-window drops the unit; a remount counts from one
#[tokio::test(start_paused = true)]
async fn test_unmount_and_remount() {
    let mut session = bundled_session("broken-memo");
    let tape = ScriptTape::new(vec![
        render("ProductList"),
        render("ProductList"),
        ScriptEvent::Unmount {
            unit: "ProductList".to_string(),
        },
        advance(1_000),
        render("ProductList"),
    ]);

    let trace = replay(&mut session, &tape).await;
    assert!(trace[2].status.units.is_empty());
    assert!(trace[3].status.units.is_empty());
    assert_eq!(unit(&trace[4], "ProductList"), (1, false));
}

/// The last step of a walkthrough has no forward edge
#[tokio::test(start_paused = true)]
async fn test_walk_to_last_step_from_tape_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_tape(
        dir.path(),
        vec![
            ScriptEvent::Goto {
                step: "memoiseComponent".to_string(),
            },
            ScriptEvent::Trigger { step: None },
            ScriptEvent::Next,
            ScriptEvent::Next,
        ],
    );

    let tape = ScriptTape::read_jsonl_from_path(&path).expect("tape parses");
    let mut session = bundled_session("broken-memo");
    let trace = replay(&mut session, &tape).await;

    assert_eq!(trace[2].status.step, "memoisePropWithDependency");
    assert!(trace[2].error.is_none());
    assert_eq!(
        trace[3].error.as_deref(),
        Some("No next transition from step memoisePropWithDependency")
    );
}

/// Steps reached out of order keep their own trigger flags
#[tokio::test(start_paused = true)]
async fn test_context_walkthrough() {
    let mut session = bundled_session("context-memo");
    let tape = ScriptTape::new(vec![
        ScriptEvent::Trigger {
            step: Some("contextFixed".to_string()),
        },
        ScriptEvent::Goto {
            step: "contextFixed".to_string(),
        },
        ScriptEvent::Back,
        ScriptEvent::Note {
            message: "baseline trigger never fired".to_string(),
        },
    ]);

    let trace = replay(&mut session, &tape).await;
    assert_eq!(trace[0].status.step, "contextBreaks");
    assert!(!trace[0].status.trigger_observed);
    assert!(trace[1].status.trigger_observed);
    assert_eq!(trace[2].status.step, "contextBreaks");
    assert!(!trace[3].status.trigger_observed);
}

/// The hotkey lesson walks bad -> stale -> good and back again
#[tokio::test(start_paused = true)]
async fn test_latest_ref_walkthrough() {
    let mut session = bundled_session("latest-ref");
    let tape = ScriptTape::new(vec![
        render("HotkeyHandler"),
        ScriptEvent::Trigger { step: None },
        render("HotkeyHandler"),
        ScriptEvent::Next,
        ScriptEvent::Next,
        ScriptEvent::Trigger { step: None },
        ScriptEvent::Next,
        ScriptEvent::Back,
    ]);

    let trace = replay(&mut session, &tape).await;
    assert!(!trace[0].status.can_advance);
    assert!(trace[1].status.can_advance);
    assert!(trace[2].status.units[0].active);
    assert_eq!(trace[3].status.step, "latestRefStale");
    assert_eq!(
        trace[4].error.as_deref(),
        Some("Step latestRefStale is waiting for its trigger")
    );
    assert_eq!(trace[6].status.step, "latestRefGood");
    assert!(!trace[6].status.can_advance);
    assert_eq!(trace[7].status.step, "latestRefStale");
    assert!(trace[7].status.trigger_observed);
}
