//! Event side-channel
//!
//! The simulation only records [`GameEvent`]s. After each frame the host
//! drains them and hands them to an [`EventBus`], which fans them out to
//! listeners (sound, HUD flashes, logging). A listener that fails is logged
//! and skipped; it never reaches back into game state.

use std::cell::RefCell;
use std::rc::Rc;

use crate::Error;
use crate::sim::GameEvent;

pub trait EventListener {
    /// Short name used when reporting failures
    fn name(&self) -> &'static str;

    fn on_event(&mut self, event: &GameEvent) -> Result<(), Error>;
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver every event to every listener. Returns how many deliveries failed.
    pub fn dispatch(&mut self, events: &[GameEvent]) -> usize {
        let mut failures = 0;
        for event in events {
            for listener in &mut self.listeners {
                if let Err(e) = listener.on_event(event) {
                    failures += 1;
                    log::warn!("{} dropped {:?}: {}", listener.name(), event, e);
                }
            }
        }
        failures
    }
}

/// Lets the host keep a handle on a listener it also put on the bus
impl<L: EventListener> EventListener for Rc<RefCell<L>> {
    fn name(&self) -> &'static str {
        match self.try_borrow() {
            Ok(inner) => inner.name(),
            Err(_) => "shared",
        }
    }

    fn on_event(&mut self, event: &GameEvent) -> Result<(), Error> {
        let mut inner = self.try_borrow_mut().map_err(|_| Error::Listener {
            name: "shared",
            detail: "listener already borrowed".into(),
        })?;
        inner.on_event(event)
    }
}

/// Logs every event at debug level
#[derive(Debug, Default)]
pub struct EventLog;

impl EventListener for EventLog {
    fn name(&self) -> &'static str {
        "event-log"
    }

    fn on_event(&mut self, event: &GameEvent) -> Result<(), Error> {
        log::debug!("event: {:?}", event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<GameEvent>);

    impl EventListener for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn on_event(&mut self, event: &GameEvent) -> Result<(), Error> {
            self.0.push(*event);
            Ok(())
        }
    }

    struct Broken;

    impl EventListener for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn on_event(&mut self, _event: &GameEvent) -> Result<(), Error> {
            Err(Error::Listener {
                name: "broken",
                detail: "audio context suspended".into(),
            })
        }
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Broken));
        bus.subscribe(Box::new(recorder.clone()));
        bus.subscribe(Box::new(EventLog));

        let events = [GameEvent::Started, GameEvent::Collected { id: 4 }];
        let failures = bus.dispatch(&events);

        assert_eq!(failures, 2);
        assert_eq!(recorder.borrow().0, events.to_vec());
    }

    #[test]
    fn test_busy_shared_listener_is_skipped() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(recorder.clone()));

        let _held = recorder.borrow_mut();
        assert_eq!(bus.dispatch(&[GameEvent::TimeUp]), 1);
    }

    #[test]
    fn test_empty_bus() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());
        assert_eq!(bus.dispatch(&[GameEvent::Victory]), 0);
    }
}
