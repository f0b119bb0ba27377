use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;

use super::InputDriver;

/// Replays a fixed queue of events. `read` on an empty queue is an
/// `UnexpectedEof` error.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    queue: VecDeque<Event>,
    polls: usize,
    mouse_capture: bool,
}

impl ScriptedDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            queue: events.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Number of `poll` calls so far.
    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture
    }
}

impl InputDriver for ScriptedDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        self.polls += 1;
        Ok(!self.queue.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn replays_in_order_then_runs_dry() {
        let mut driver = ScriptedDriver::new([
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            Event::Resize(80, 24),
        ]);
        assert!(driver.poll(Duration::ZERO).unwrap());
        assert!(matches!(driver.read().unwrap(), Event::Key(_)));
        assert_eq!(driver.read().unwrap(), Event::Resize(80, 24));
        assert!(!driver.poll(Duration::ZERO).unwrap());
        assert_eq!(
            driver.read().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
        assert_eq!(driver.polls(), 2);
    }
}
