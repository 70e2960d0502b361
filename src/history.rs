use super::*;

/// One caller-driven transition after the forced posts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum Event {
    Act {
        position: Position,
        action: Action,
        timestamp: Millis,
    },
    Deal {
        cards: Vec<Card>,
    },
    Resolve {
        verdicts: Vec<(Position, Verdict)>,
    },
}

impl Event {
    /// Applies this event to a hand, returning the next snapshot.
    pub fn apply(&self, hand: &Hand) -> Result<Hand, EngineError> {
        match self {
            Self::Act {
                position,
                action,
                timestamp,
            } => hand.apply_at(*position, *action, *timestamp),
            Self::Deal { cards } => hand.advance(cards.clone()),
            Self::Resolve { verdicts } => hand.showdown(verdicts),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Act {
                position, action, ..
            } => write!(f, "{:<4} {}", position, action),
            Self::Deal { cards } => {
                let cards = cards.iter().map(|c| c.to_string()).collect::<Vec<_>>();
                write!(f, "DEAL {}", cards.join(" "))
            }
            Self::Resolve { verdicts } => {
                let verdicts = verdicts
                    .iter()
                    .map(|(p, v)| format!("{}={}", p, v))
                    .collect::<Vec<_>>();
                write!(f, "SHOW {}", verdicts.join(" "))
            }
        }
    }
}

/// A hand as its setup plus the events applied to it.
///
/// The engine never undoes a transition. Rolling back means rebuilding from
/// the setup with fewer events, which is what [`rewind`](Self::rewind) does.
/// Every event is validated on push, so replaying a history never fails
/// unless it was deserialized from somewhere untrusted.
#[derive(Debug, Clone)]
pub struct History {
    setup: Setup,
    opened: Millis,
    events: Vec<Event>,
    head: Hand,
}

impl History {
    pub fn new(setup: Setup) -> Result<Self, EngineError> {
        Self::new_at(setup, now())
    }
    pub fn new_at(setup: Setup, opened: Millis) -> Result<Self, EngineError> {
        let head = Hand::start_at(&setup, opened)?;
        Ok(Self {
            setup,
            opened,
            events: vec![],
            head,
        })
    }
    pub fn setup(&self) -> &Setup {
        &self.setup
    }
    pub fn events(&self) -> &[Event] {
        &self.events
    }
    /// The latest snapshot.
    pub fn head(&self) -> &Hand {
        &self.head
    }
    /// Applies an event to the head, keeping it only if accepted.
    pub fn push(&mut self, event: Event) -> Result<&Hand, EngineError> {
        self.head = event.apply(&self.head)?;
        self.events.push(event);
        Ok(&self.head)
    }
    /// Every snapshot from the forced posts to the head.
    pub fn states(&self) -> Result<Vec<Hand>, EngineError> {
        let mut hand = Hand::start_at(&self.setup, self.opened)?;
        let mut states = vec![hand.clone()];
        for event in self.events.iter() {
            hand = event.apply(&hand)?;
            states.push(hand.clone());
        }
        Ok(states)
    }
    /// Drops the last `n` events and rebuilds the head from scratch.
    pub fn rewind(&mut self, n: usize) -> Result<&Hand, EngineError> {
        let keep = self.events.len().saturating_sub(n);
        let events = self.events[..keep].to_vec();
        let mut head = Hand::start_at(&self.setup, self.opened)?;
        for event in events.iter() {
            head = event.apply(&head)?;
        }
        log::debug!("rewound hand #{} to {} events", self.setup.number, keep);
        self.events = events;
        self.head = head;
        Ok(&self.head)
    }
}

impl TryFrom<&StoredHand> for History {
    type Error = EngineError;
    /// Reads the event stream back out of a stored hand's logs.
    fn try_from(stored: &StoredHand) -> Result<Self, Self::Error> {
        let opened = stored
            .rounds
            .first()
            .and_then(|r| r.actions().first())
            .map(|a| a.timestamp)
            .unwrap_or_default();
        let mut history = Self::new_at(stored.setup.clone(), opened)?;
        for (i, round) in stored.rounds.iter().enumerate() {
            if i > 0 {
                history.push(Event::Deal {
                    cards: round.revealed().to_vec(),
                })?;
            }
            for entry in round.choices() {
                history.push(Event::Act {
                    position: entry.position,
                    action: entry.action,
                    timestamp: entry.timestamp,
                })?;
            }
        }
        if history.head().phase() == Phase::Showdown {
            let verdicts = stored
                .settlements
                .iter()
                .filter_map(|s| s.verdict().map(|v| (s.position(), v)))
                .collect::<Vec<_>>();
            history.push(Event::Resolve { verdicts })?;
        }
        Ok(history)
    }
}
