//! The lock/hold/release sequence.
//!
//! Status lines are written to the runner's output and flushed one at a
//! time, so a harness reading a pipe sees `waiting for lock` before the
//! process blocks and `lock acquired` before the hold starts.

use crate::error::Result;
use crate::events::{EventLog, LockEvent, LockEventAction};
use crate::locks::{LockTarget, TryLock};
use crate::request::LockRequest;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Runs one lock request against an output sink and a sleep function.
pub struct LockRunner<W, S> {
    out: W,
    sleep: S,
    events: EventLog,
}

impl<W, S> LockRunner<W, S>
where
    W: Write,
    S: FnMut(Duration),
{
    pub fn new(out: W, sleep: S, events: EventLog) -> Self {
        Self { out, sleep, events }
    }

    /// Open, lock, hold, and release.
    ///
    /// If anything fails after the lock is taken, the guard's `Drop`
    /// releases it on the way out.
    pub fn run(&mut self, request: &LockRequest) -> Result<()> {
        let target = LockTarget::open(&request.path, request.lock_fn)?;

        let guard = match target.try_lock(request.mode)? {
            TryLock::Acquired(guard) => guard,
            TryLock::Contended(target) => {
                self.say("waiting for lock")?;
                self.events
                    .record(&LockEvent::new(LockEventAction::Waiting, request));
                target.lock(request.mode)?
            }
        };

        self.say("lock acquired")?;
        self.events
            .record(&LockEvent::new(LockEventAction::Acquired, request));

        self.say(&format!("sleeping for {} seconds", request.hold_seconds))?;
        (self.sleep)(Duration::from_secs(request.hold_seconds));

        guard.release()?;
        self.say("lock released")?;
        self.events
            .record(&LockEvent::new(LockEventAction::Released, request));

        Ok(())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Run `request` against stdout with a real wall-clock sleep.
pub fn run(request: &LockRequest) -> Result<()> {
    let events = EventLog::new(request.events.clone());
    LockRunner::new(io::stdout().lock(), thread::sleep, events).run(request)
}
