//! Model to view notifications
//!
//! The simulation records what happened during a tick as `GameEvent`s.
//! The frontend drains them and fans them out to listeners (sound,
//! animations) through an `EventBus`.

use super::brick::{BrickType, PowerType};

/// Something noteworthy that happened in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameStart,
    GameStopped,
    GameOver,
    GameWon,
    LevelStart { level: u32 },
    LevelComplete { level: u32 },
    /// Serve delay ended and the ball is in motion
    NewBall,
    HitWall,
    HitPaddle,
    HitBrick {
        row: usize,
        col: usize,
        kind: BrickType,
        destroyed: bool,
    },
    /// One ball left the playfield (others may remain)
    BallLost,
    /// The last ball in play was lost and a life is gone
    LastBallLost { lives_left: u8 },
    PowerPillReleased { power: PowerType },
    PowerPillCaught { power: PowerType },
    LaserFired,
    /// Paddle escaped through the Break gate
    LevelSkipped,
}

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Callback fan-out for game events
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it sees every event published afterwards
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver events in order to every listener
    pub fn publish_all(&mut self, events: &[GameEvent]) {
        for event in events {
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_all_listeners_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let a = seen.clone();
        bus.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = seen.clone();
        bus.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        bus.publish_all(&[GameEvent::HitWall, GameEvent::HitPaddle]);

        assert_eq!(
            *seen.borrow(),
            vec![
                ("a", GameEvent::HitWall),
                ("b", GameEvent::HitWall),
                ("a", GameEvent::HitPaddle),
                ("b", GameEvent::HitPaddle),
            ]
        );
    }
}
