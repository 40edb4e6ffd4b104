//! Unit tests for Operation observers and settlement

use std::cell::RefCell;
use std::rc::Rc;

use op_core::OpState;
use op_runtime::{RuntimeError, Scheduler, Settler};

#[test]
fn success_observer_receives_the_value() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();

    let op = runner.create::<i32, String>(|settler| settler.succeed(42));
    let seen = Rc::new(RefCell::new(vec![]));
    let sink = seen.clone();
    op.on_success(move |value| {
        sink.borrow_mut().push(value);
        Ok(())
    });

    scheduler.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), vec![42]);
}

#[test]
fn failure_observer_receives_the_reason() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();

    let op = runner.create::<i32, String>(|settler| settler.fail("boom".to_string()));
    let seen = Rc::new(RefCell::new(vec![]));
    let sink = seen.clone();
    op.on_failure(move |reason| {
        sink.borrow_mut().push(reason);
        Ok(())
    });

    scheduler.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), vec!["boom".to_string()]);
}

#[test]
fn wrong_side_observer_never_fires() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();

    let op = runner.create::<i32, String>(|settler| settler.succeed(1));
    let failure_fired = Rc::new(RefCell::new(false));
    let flag = failure_fired.clone();
    op.on_failure(move |_| {
        *flag.borrow_mut() = true;
        Ok(())
    });

    scheduler.run_until_done().unwrap();
    assert!(!*failure_fired.borrow());
}

#[test]
fn settled_observer_fires_for_either_outcome() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let count = Rc::new(RefCell::new(0));

    let ok = runner.create::<i32, String>(|settler| settler.succeed(1));
    let sink = count.clone();
    ok.on_settled(move || {
        *sink.borrow_mut() += 1;
        Ok(())
    });

    let bad = runner.create::<i32, String>(|settler| settler.fail("no".to_string()));
    let sink = count.clone();
    bad.on_settled(move || {
        *sink.borrow_mut() += 1;
        Ok(())
    });

    scheduler.run_until_done().unwrap();
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn settled_runs_after_the_outcome_handler() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let order = Rc::new(RefCell::new(vec![]));

    let op = runner.create::<i32, String>(|settler| settler.succeed(1));
    let success_order = order.clone();
    let settled_order = order.clone();
    op.attach_callbacks(
        move |_| {
            success_order.borrow_mut().push("success");
            Ok(())
        },
        |_| Ok(()),
        move || {
            settled_order.borrow_mut().push("settled");
            Ok(())
        },
    );

    scheduler.run_until_done().unwrap();
    assert_eq!(*order.borrow(), vec!["success", "settled"]);
}

#[test]
fn settled_still_runs_when_the_handler_fails() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let settled_ran = Rc::new(RefCell::new(false));

    let op = runner.create::<i32, String>(|settler| settler.succeed(1));
    let flag = settled_ran.clone();
    op.attach_callbacks(
        |_| Err(RuntimeError::Handler("observer blew up".to_string())),
        |_| Ok(()),
        move || {
            *flag.borrow_mut() = true;
            Ok(())
        },
    );

    let result = scheduler.run_until_done();
    assert_eq!(
        result,
        Err(RuntimeError::Handler("observer blew up".to_string()))
    );
    assert!(*settled_ran.borrow());
}

#[test]
fn observers_fire_in_attachment_order() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    let order = Rc::new(RefCell::new(vec![]));

    // Smuggle the settler out so settlement happens after attachment.
    let parked: Rc<RefCell<Option<Settler<i32, String>>>> = Rc::new(RefCell::new(None));
    let park = parked.clone();
    let op = runner.create::<i32, String>(move |settler| {
        *park.borrow_mut() = Some(settler);
    });

    for label in ["a", "b", "c"] {
        let order = order.clone();
        op.on_settled(move || {
            order.borrow_mut().push(label);
            Ok(())
        });
    }
    assert_eq!(op.state(), OpState::Pending);

    if let Some(settler) = parked.borrow_mut().take() {
        settler.succeed(7);
    }
    scheduler.run_until_done().unwrap();
    assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn second_settlement_is_not_observed() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();

    let op = runner.create::<i32, String>(|settler| {
        settler.succeed(1);
        settler.succeed(2);
        settler.fail("late".to_string());
    });
    let seen = Rc::new(RefCell::new(vec![]));
    let sink = seen.clone();
    op.on_success(move |value| {
        sink.borrow_mut().push(value);
        Ok(())
    });
    let failure_fired = Rc::new(RefCell::new(false));
    let flag = failure_fired.clone();
    op.on_failure(move |_| {
        *flag.borrow_mut() = true;
        Ok(())
    });

    scheduler.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), vec![1]);
    assert!(!*failure_fired.borrow());
    assert_eq!(op.state(), OpState::Fulfilled);
}

#[test]
fn settler_clones_share_the_single_fire_guard() {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();

    let op = runner.create::<&str, &str>(|settler| {
        let win = settler.clone();
        win.succeed("winner");
        settler.fail("loser");
    });

    let seen = Rc::new(RefCell::new(vec![]));
    let sink = seen.clone();
    op.on_success(move |value| {
        sink.borrow_mut().push(value);
        Ok(())
    });

    scheduler.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), vec!["winner"]);
}
