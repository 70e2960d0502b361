use super::*;

/// A seat's final accounting for the hand.
///
/// # Fields
///
/// - `position` — Which seat this settles
/// - `risked` — Total chips committed over the hand
/// - `reward` — Total chips received back from the pot
/// - `state` — Final betting state, used for eligibility
/// - `verdict` — Recorded outcome for seats that reached the end holding cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Settlement {
    position: Position,
    risked: Chips,
    reward: Chips,
    state: State,
    verdict: Option<Verdict>,
}

impl Settlement {
    pub fn new(position: Position, risked: Chips, state: State, verdict: Option<Verdict>) -> Self {
        Self {
            position,
            risked,
            reward: 0,
            state,
            verdict,
        }
    }
    pub fn position(&self) -> Position {
        self.position
    }
    /// Total chips committed to pot.
    pub fn risked(&self) -> Chips {
        self.risked
    }
    /// Total chips received from pot.
    pub fn reward(&self) -> Chips {
        self.reward
    }
    pub fn state(&self) -> State {
        self.state
    }
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }
    /// Net chips won (reward - risked).
    pub fn won(&self) -> Chips {
        self.reward - self.risked
    }
    /// Adds chips to the reward (for pot distribution).
    pub(crate) fn add(&mut self, amount: Chips) {
        self.reward += amount;
    }
}

impl From<&Seat> for Settlement {
    fn from(seat: &Seat) -> Self {
        Self::new(seat.position(), seat.spent(), seat.state(), None)
    }
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let verdict = self
            .verdict
            .map(|v| v.to_string())
            .unwrap_or_else(|| self.state.to_string());
        write!(f, "{:<4} {:<7} {:+}", self.position, verdict, self.won())
    }
}
