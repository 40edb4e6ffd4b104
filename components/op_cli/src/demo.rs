//! The operation-lifecycle demonstration.
//!
//! Creates one operation that settles synchronously (success or
//! failure per the `--fail` flag) and consumes it in the requested
//! style, printing each delivery so the ordering guarantees are
//! visible: the outcome handler first, the finalization step last.

use op_runtime::{Finalizer, Operation, Runner, Scheduler};
use tracing::debug;

use crate::cli::Style;
use crate::error::CliResult;

/// Runs the demonstration and returns once the scheduler is drained.
pub fn run(fail: bool, style: Style) -> CliResult<()> {
    let mut scheduler = Scheduler::new();
    let runner = scheduler.runner();
    debug!(fail, ?style, "starting lifecycle demo");

    match style {
        Style::Callback => callback_style(&mut scheduler, &runner, fail)?,
        Style::Await => await_style(&mut scheduler, &runner, fail)?,
        Style::Both => {
            callback_style(&mut scheduler, &runner, fail)?;
            await_style(&mut scheduler, &runner, fail)?;
        }
    }
    Ok(())
}

/// One unit of work that settles immediately, like the classic
/// "does this flag say we succeed" promise demo.
fn demo_operation(runner: &Runner, fail: bool) -> Operation<String, String> {
    runner.create(|settler| {
        if fail {
            settler.fail("operation failed".to_string());
        } else {
            settler.succeed("operation succeeded".to_string());
        }
    })
}

fn callback_style(scheduler: &mut Scheduler, runner: &Runner, fail: bool) -> CliResult<()> {
    let op = demo_operation(runner, fail);
    op.attach_callbacks(
        |value| {
            println!("{value}");
            Ok(())
        },
        |reason| {
            println!("{reason}");
            Ok(())
        },
        || {
            println!("operation finished");
            Ok(())
        },
    );
    scheduler.run_until_done()?;
    Ok(())
}

fn await_style(scheduler: &mut Scheduler, runner: &Runner, fail: bool) -> CliResult<()> {
    let op = demo_operation(runner, fail);
    scheduler.block_on(async move {
        let _finish = Finalizer::new(|| println!("operation finished"));
        match op.result().await {
            Ok(value) => println!("{value}"),
            Err(failure) => println!("{}", failure.into_reason()),
        }
        Ok(())
    })?;
    Ok(())
}
