//! End-to-end tests across the runtime components.

use std::cell::RefCell;
use std::rc::Rc;

use op_cli::{demo, Style};
use op_core::OpState;
use op_runtime::Scheduler;

#[test]
fn one_settlement_feeds_both_consumption_styles() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let log = Rc::new(RefCell::new(vec![]));

    let (op, settler) = runner.deferred::<String, String>();

    // Callback consumer.
    let callback_log = log.clone();
    let settled_log = log.clone();
    op.attach_callbacks(
        move |value| {
            callback_log.borrow_mut().push(format!("callback:{value}"));
            Ok(())
        },
        |_| Ok(()),
        move || {
            settled_log.borrow_mut().push("callback:finished".to_string());
            Ok(())
        },
    );

    // Suspended consumer.
    let await_log = log.clone();
    let awaited = op.clone();
    scheduler.spawn(async move {
        let value = awaited.result().await?;
        await_log.borrow_mut().push(format!("await:{value}"));
        Ok(())
    });

    settler.succeed("done".to_string());
    scheduler.run_until_done().unwrap();

    assert_eq!(op.state(), OpState::Fulfilled);
    let log = log.borrow();
    assert!(log.contains(&"callback:done".to_string()));
    assert!(log.contains(&"await:done".to_string()));
    // Per observer, the settled callback comes after the value.
    let value_at = log.iter().position(|e| e == "callback:done");
    let finished_at = log.iter().position(|e| e == "callback:finished");
    assert!(value_at < finished_at);
}

#[test]
fn rejected_operation_is_seen_identically_by_all_consumers() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let reasons = Rc::new(RefCell::new(vec![]));

    let (op, settler) = runner.deferred::<String, String>();

    let callback_reasons = reasons.clone();
    op.on_failure(move |reason| {
        callback_reasons.borrow_mut().push(reason);
        Ok(())
    });

    let await_reasons = reasons.clone();
    let awaited = op.clone();
    scheduler.spawn(async move {
        if let Err(failure) = awaited.result().await {
            await_reasons.borrow_mut().push(failure.into_reason());
        }
        Ok(())
    });

    settler.fail("out of retries".to_string());
    scheduler.run_until_done().unwrap();

    assert_eq!(
        *reasons.borrow(),
        vec!["out of retries".to_string(), "out of retries".to_string()]
    );
}

#[test]
fn cli_demo_drives_the_runtime_cleanly() {
    for fail in [false, true] {
        demo::run(fail, Style::Both).unwrap();
    }
}

#[test]
fn component_reexports_resolve() {
    use integration_tests::components;

    let mut scheduler = components::op_runtime::Scheduler::new();
    let runner = scheduler.runner();
    let op = runner.create::<i32, String>(|settler| settler.succeed(1));
    scheduler.run_until_done().unwrap();
    assert_eq!(op.state(), components::op_core::OpState::Fulfilled);
}

#[test]
fn many_operations_share_one_scheduler() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let total = Rc::new(RefCell::new(0));

    for i in 0..10 {
        let op = runner.create::<i32, String>(move |settler| settler.succeed(i));
        let total = total.clone();
        op.on_success(move |value| {
            *total.borrow_mut() += value;
            Ok(())
        });
    }

    scheduler.run_until_done().unwrap();
    assert_eq!(*total.borrow(), 45);
}
