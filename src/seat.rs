use super::*;

/// A player's state at the table for the current hand.
///
/// # Fields
///
/// - `position` — Seat role, fixed for the hand
/// - `state` — Betting, Shoving (all-in), or Folding
/// - `stack` — Chips behind (not yet committed)
/// - `stake` — Chips committed this street (the seat's current bet)
/// - `spent` — Total chips committed this hand, antes included
/// - `acted` — Whether the seat has acted since the round opened or was last reopened
///
/// Folded and all-in seats always report `acted`. A folded seat keeps its
/// stake for the rest of the street; those chips stay in the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Seat {
    position: Position,
    state: State,
    stack: Chips,
    stake: Chips,
    spent: Chips,
    acted: bool,
}

impl Seat {
    pub fn new(position: Position, stack: Chips) -> Self {
        Self {
            position,
            stack,
            stake: 0,
            spent: 0,
            acted: false,
            state: State::Betting,
        }
    }
}

impl From<(Position, Chips)> for Seat {
    fn from((position, stack): (Position, Chips)) -> Self {
        Self::new(position, stack)
    }
}

impl Seat {
    pub fn position(&self) -> Position {
        self.position
    }
    /// Chips behind (not committed to pot).
    pub fn stack(&self) -> Chips {
        self.stack
    }
    /// Chips committed this street.
    pub fn stake(&self) -> Chips {
        self.stake
    }
    /// Current betting status.
    pub fn state(&self) -> State {
        self.state
    }
    /// Total chips committed this hand.
    pub fn spent(&self) -> Chips {
        self.spent
    }
    pub fn acted(&self) -> bool {
        self.acted
    }
    /// Everything this seat could have in front of it this street.
    pub fn reach(&self) -> Chips {
        self.stake + self.stack
    }
}

impl Seat {
    /// Adds winnings to stack.
    pub(crate) fn win(&mut self, win: Chips) {
        self.stack += win;
    }
    /// Commits chips from stack to pot for this street.
    pub(crate) fn bet(&mut self, bet: Chips) {
        debug_assert!(bet >= 0 && bet <= self.stack);
        self.stack -= bet;
        self.stake += bet;
        self.spent += bet;
        if self.stack == 0 {
            self.shove();
        }
    }
    /// Commits dead money that does not count toward this street's bet.
    pub(crate) fn ante(&mut self, ante: Chips) {
        debug_assert!(ante >= 0 && ante <= self.stack);
        self.stack -= ante;
        self.spent += ante;
        if self.stack == 0 {
            self.shove();
        }
    }
    pub(crate) fn fold(&mut self) {
        self.state = State::Folding;
        self.acted = true;
    }
    pub(crate) fn shove(&mut self) {
        self.state = State::Shoving;
        self.acted = true;
    }
    pub(crate) fn touch(&mut self) {
        self.acted = true;
    }
    /// Clears the acted flag of a seat that can still bet.
    pub(crate) fn reopen(&mut self) {
        if self.state == State::Betting {
            self.acted = false;
        }
    }
    pub(crate) fn reset_stake(&mut self) {
        self.stake = 0;
    }
    pub(crate) fn reset_state(&mut self, state: State) {
        self.state = state;
        self.acted = state != State::Betting || self.acted;
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<4} {} {} {}",
            self.position,
            self.state,
            format!("${:>6}", self.stack),
            format!("[{:>5}]", self.stake),
        )
    }
}

/// Player betting status within a hand.
///
/// - `Betting` — Active and can still make decisions
/// - `Shoving` — All-in, no more decisions but still in the pot
/// - `Folding` — Out of the hand, chips already committed stay in the pot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum State {
    #[serde(rename = "active")]
    Betting,
    #[serde(rename = "all-in")]
    Shoving,
    #[serde(rename = "folded")]
    Folding,
}

impl State {
    /// True if player is still competing for the pot.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Betting | Self::Shoving)
    }
}

impl TryFrom<&str> for State {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_uppercase().as_str() {
            "P" => Ok(State::Betting),
            "S" => Ok(State::Shoving),
            "F" => Ok(State::Folding),
            _ => Err(format!("invalid state string: {}", s)),
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            State::Betting => write!(f, "P"),
            State::Shoving => write!(f, "S"),
            State::Folding => write!(f, "F"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_moves_chips_and_tracks_both_totals() {
        let mut seat = Seat::new(Position::Co, 100);
        seat.bet(30);
        assert_eq!(seat.stack(), 70);
        assert_eq!(seat.stake(), 30);
        assert_eq!(seat.spent(), 30);
        seat.reset_stake();
        seat.bet(10);
        assert_eq!(seat.stake(), 10);
        assert_eq!(seat.spent(), 40);
        assert_eq!(seat.state(), State::Betting);
    }

    #[test]
    fn emptying_stack_is_all_in() {
        let mut seat = Seat::new(Position::Btn, 25);
        seat.bet(25);
        assert_eq!(seat.state(), State::Shoving);
        assert!(seat.acted());
    }

    #[test]
    fn ante_is_not_stake() {
        let mut seat = Seat::new(Position::Bb, 100);
        seat.ante(5);
        assert_eq!(seat.stake(), 0);
        assert_eq!(seat.spent(), 5);
    }

    #[test]
    fn reopen_ignores_closed_seats() {
        let mut folded = Seat::new(Position::Sb, 10);
        folded.fold();
        folded.reopen();
        assert!(folded.acted());
        let mut live = Seat::new(Position::Bb, 10);
        live.touch();
        live.reopen();
        assert!(!live.acted());
    }
}
