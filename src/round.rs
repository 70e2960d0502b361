use super::*;

/// One accepted entry in a street's action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BettingAction {
    pub position: Position,
    pub action: Action,
    pub timestamp: Millis,
}

impl std::fmt::Display for BettingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<4} {}", self.position, self.action)
    }
}

/// Betting state for a single street.
///
/// # Fields
///
/// - `street` — Which street this round belongs to
/// - `revealed` — Community cards dealt when the round opened, if recorded
/// - `actions` — Append-only log of accepted actions, forced posts included
/// - `current_bet` — Highest stake this street; never decreases
/// - `min_raise` — Size of the last full raise, starting at the big blind
/// - `pot` — Hand pot as of the latest logged action
/// - `is_complete` — No seat is owed a decision on this street
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Round {
    street: Street,
    #[serde(default)]
    revealed: Vec<Card>,
    actions: Vec<BettingAction>,
    current_bet: Chips,
    min_raise: Chips,
    pot: Chips,
    is_complete: bool,
}

impl Round {
    pub fn new(street: Street, big_blind: Chips, pot: Chips) -> Self {
        Self {
            street,
            revealed: Vec::new(),
            actions: Vec::new(),
            current_bet: 0,
            min_raise: big_blind,
            pot,
            is_complete: false,
        }
    }
    pub fn with_cards(self, revealed: Vec<Card>) -> Self {
        Self { revealed, ..self }
    }
}

impl Round {
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn revealed(&self) -> &[Card] {
        &self.revealed
    }
    pub fn actions(&self) -> &[BettingAction] {
        &self.actions
    }
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }
    /// Voluntary decisions only, skipping blinds and antes.
    pub fn choices(&self) -> impl Iterator<Item = &BettingAction> {
        self.actions.iter().filter(|a| a.action.is_choice())
    }
    /// True once anyone has bet or raised by choice on this street.
    pub fn is_opened(&self) -> bool {
        self.choices().any(|a| a.action.is_aggro())
    }
}

impl Round {
    pub(crate) fn push(
        &mut self,
        position: Position,
        action: Action,
        timestamp: Millis,
        pot: Chips,
    ) {
        self.actions.push(BettingAction {
            position,
            action,
            timestamp,
        });
        self.pot = pot;
    }
    /// Lifts the bet level. Only a full raise moves `min_raise`.
    pub(crate) fn lift(&mut self, to: Chips, full: bool) {
        debug_assert!(to >= self.current_bet, "bet level never decreases");
        if full {
            self.min_raise = to - self.current_bet;
        }
        self.current_bet = to;
    }
    pub(crate) fn complete(&mut self) {
        self.is_complete = true;
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} (pot {})", self.street, self.pot)?;
        for card in self.revealed.iter() {
            write!(f, " {}", card)?;
        }
        writeln!(f)?;
        for action in self.actions.iter() {
            writeln!(f, "  {}", action)?;
        }
        Ok(())
    }
}
