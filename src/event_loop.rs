use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::constants::TOAST_TICK;
use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Input(Event),
    /// The tick interval elapsed. Timers (toast countdowns, blur delays)
    /// advance to the carried instant.
    Tick(Instant),
}

/// Single-threaded loop that owns the input driver.
///
/// Every pass delivers a `Tick` once the tick interval has elapsed, then
/// waits for input until the next tick is due. A burst of queued input is
/// drained in one pass so drags and wheel scrolls do not lag behind.
pub struct EventLoop<D> {
    driver: D,
    tick: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D) -> Self {
        Self::with_tick(driver, TOAST_TICK)
    }

    pub fn with_tick(driver: D, tick: Duration) -> Self {
        Self {
            driver,
            tick: tick.max(Duration::from_millis(1)),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, LoopEvent) -> io::Result<ControlFlow>,
    {
        let mut next_tick = Instant::now();
        loop {
            let now = Instant::now();
            if now >= next_tick {
                if handler(&mut self.driver, LoopEvent::Tick(now))? == ControlFlow::Quit {
                    return Ok(());
                }
                next_tick = now + self.tick;
            }

            let timeout = next_tick.saturating_duration_since(Instant::now());
            if self.driver.poll(timeout)? {
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, LoopEvent::Input(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
