use super::*;

/// Where a hand is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Betting(Street),
    Showdown,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Betting(street) => write!(f, "{}", street),
            Self::Showdown => write!(f, "showdown"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Who or what the hand is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// A seat owes a decision.
    Choice(Position),
    /// The round is over; the caller may open the given street.
    Chance(Street),
    /// Verdicts are needed to distribute the pot.
    Showdown,
    /// Chips have been distributed.
    Terminal,
}

/// A single hand of No-Limit Texas Hold'em being tracked.
///
/// `Hand` is the aggregate root: seats, rounds, pot, side pots and board
/// move together. Every transition takes `&self` and returns a new `Hand`,
/// so a rejected action leaves the caller's snapshot exactly as it was and
/// no partially applied state can be observed.
///
/// # Fields
///
/// - `setup` — How the hand was started; enough to replay it
/// - `phase` — Betting on a street, awaiting verdicts, or complete
/// - `pot` — Every chip contributed this hand, antes included
/// - `seats` — One per dealt-in player, in postflop order
/// - `rounds` — One per street reached, the last one current
/// - `side_pots` — Pot layers while anyone is all-in
/// - `next` — Seat owed the next decision, if any
/// - `board` — Community cards dealt so far
/// - `settlements` — Final accounting once complete
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Hand {
    setup: Setup,
    phase: Phase,
    pot: Chips,
    seats: Vec<Seat>,
    rounds: Vec<Round>,
    side_pots: Vec<SidePot>,
    next: Option<Position>,
    board: Vec<Card>,
    settlements: Vec<Settlement>,
}

/// Hand start.
impl Hand {
    /// Validates the setup, posts antes and blinds, and opens preflop.
    pub fn start(setup: &Setup) -> Result<Self, EngineError> {
        Self::start_at(setup, now())
    }
    /// [`start`](Self::start) with an explicit timestamp for the forced posts.
    pub fn start_at(setup: &Setup, timestamp: Millis) -> Result<Self, EngineError> {
        setup.validate()?;
        let config = setup.config;
        let seats = config
            .size
            .sequence(Street::Flop)
            .iter()
            .filter_map(|p| setup.players.iter().find(|(q, _)| q == p))
            .map(|(p, stack)| Seat::new(*p, *stack))
            .collect::<Vec<_>>();
        let mut hand = Self {
            setup: setup.clone(),
            phase: Phase::Betting(Street::Pref),
            pot: 0,
            seats,
            rounds: vec![Round::new(Street::Pref, config.big_blind, 0)],
            side_pots: vec![],
            next: None,
            board: vec![],
            settlements: vec![],
        };
        if let Some(ante) = config.ante {
            for position in hand.order() {
                hand.post(position, ante, Action::Ante, timestamp);
            }
        }
        hand.post(Position::Sb, config.small_blind, Action::Blind, timestamp);
        hand.post(Position::Bb, config.big_blind, Action::Blind, timestamp);
        hand.round_mut().lift(config.big_blind, false);
        log::debug!("hand #{} {} pot {}", setup.number, config, hand.pot);
        hand.proceed(None);
        Ok(hand)
    }
    /// Posts up to `amount` for a forced bet; short stacks go all-in.
    fn post(
        &mut self,
        position: Position,
        amount: Chips,
        kind: fn(Chips) -> Action,
        timestamp: Millis,
    ) {
        let Some(seat) = self.seats.iter_mut().find(|s| s.position() == position) else {
            return;
        };
        if seat.state() != State::Betting {
            return;
        }
        let amount = amount.min(seat.stack());
        let action = kind(amount);
        match action {
            Action::Ante(_) => seat.ante(amount),
            _ => seat.bet(amount),
        }
        self.pot += amount;
        let pot = self.pot;
        self.round_mut().push(position, action, timestamp, pot);
        log::trace!("{} posts {}", position, action);
    }
}

/// Public state accessors.
impl Hand {
    pub fn setup(&self) -> &Setup {
        &self.setup
    }
    pub fn number(&self) -> Number {
        self.setup.number
    }
    pub fn config(&self) -> Config {
        self.setup.config
    }
    pub fn hero(&self) -> Position {
        self.setup.hero
    }
    pub fn hole(&self) -> Option<Hole> {
        self.setup.hole
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// Total chips in the pot across all streets.
    pub fn pot(&self) -> Chips {
        self.pot
    }
    /// All seats, in postflop order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat(&self, position: Position) -> Option<&Seat> {
        self.seats.iter().find(|s| s.position() == position)
    }
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }
    /// The round for the latest street reached.
    pub fn round(&self) -> &Round {
        self.rounds.last().expect("a hand always has a round")
    }
    pub fn street(&self) -> Street {
        self.round().street()
    }
    pub fn side_pots(&self) -> &[SidePot] {
        &self.side_pots
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }
    /// The seat owed the next decision.
    pub fn next_to_act(&self) -> Option<Position> {
        self.next
    }
    /// Determines whether a seat, the dealer, or the operator moves next.
    pub fn turn(&self) -> Turn {
        match self.phase {
            Phase::Complete => Turn::Terminal,
            Phase::Showdown => Turn::Showdown,
            Phase::Betting(street) => match self.next {
                Some(position) => Turn::Choice(position),
                None => Turn::Chance(street.next().unwrap_or(Street::Rive)),
            },
        }
    }
    /// Full pot layering, main pot first.
    pub fn layers(&self) -> Vec<SidePot> {
        layers(&self.seats)
    }
    /// Seats still holding cards, in postflop order.
    pub fn contenders(&self) -> Vec<Position> {
        self.seats
            .iter()
            .filter(|s| s.state().is_active())
            .map(|s| s.position())
            .collect()
    }
    /// Chips in play: every stack plus whatever is still in the pot.
    pub fn total(&self) -> Chips {
        let stacks = self.seats.iter().map(|s| s.stack()).sum::<Chips>();
        match self.phase {
            Phase::Complete => stacks,
            _ => stacks + self.pot,
        }
    }
    pub fn can_advance_to_flop(&self) -> bool {
        self.can_advance_from(Street::Pref)
    }
    pub fn can_advance_to_turn(&self) -> bool {
        self.can_advance_from(Street::Flop)
    }
    pub fn can_advance_to_river(&self) -> bool {
        self.can_advance_from(Street::Turn)
    }
    fn can_advance_from(&self, street: Street) -> bool {
        self.phase == Phase::Betting(street) && self.round().is_complete()
    }
}

/// Action validation and application.
impl Hand {
    /// Returns a new hand with the action applied.
    ///
    /// Panics if the action is not legal in the current state.
    pub fn apply(&self, position: Position, action: Action) -> Self {
        self.try_apply(position, action).expect("valid action")
    }
    /// Fallible version of [`apply`](Self::apply), stamped with the wall clock.
    pub fn try_apply(&self, position: Position, action: Action) -> Result<Self, EngineError> {
        self.apply_at(position, action, now())
    }
    /// Validates and applies one action with an explicit log timestamp.
    ///
    /// On error `self` is untouched and nothing is logged.
    pub fn apply_at(
        &self,
        position: Position,
        action: Action,
        timestamp: Millis,
    ) -> Result<Self, EngineError> {
        self.check(position, &action)?;
        let mut child = self.clone();
        child.act(position, action, timestamp);
        Ok(child)
    }
    /// Concrete legal actions for a seat; empty when it cannot act now.
    pub fn legal(&self, position: Position) -> Vec<Action> {
        if self.next != Some(position) || !self.is_betting() {
            return vec![];
        }
        let Some(seat) = self.seat(position) else {
            return vec![];
        };
        let mut options = vec![Action::Fold];
        if self.may_check(seat) {
            options.push(Action::Check);
        }
        if self.may_call(seat) {
            options.push(self.calls(seat));
        }
        if self.may_raise(seat) {
            options.push(self.raise());
        }
        if self.may_shove(seat) {
            options.push(self.shove(seat));
        }
        options
    }
    /// Checks whether a specific action would be accepted.
    pub fn is_allowed(&self, position: Position, action: &Action) -> bool {
        self.check(position, action).is_ok()
    }

    fn check(&self, position: Position, action: &Action) -> Result<(), EngineError> {
        if !self.is_betting() {
            return Err(EngineError::sequence(format!(
                "no betting is open ({}, round complete: {})",
                self.phase,
                self.round().is_complete()
            )));
        }
        let seat = self
            .seat(position)
            .ok_or_else(|| EngineError::illegal(format!("{} is not dealt in", position)))?;
        match seat.state() {
            State::Folding => return Err(EngineError::illegal(format!("{} has folded", position))),
            State::Shoving => return Err(EngineError::illegal(format!("{} is all-in", position))),
            State::Betting => {}
        }
        if self.next != Some(position) {
            return Err(EngineError::sequence(format!(
                "{} acted out of turn; waiting on {}",
                position,
                self.next.map(|p| p.to_string()).unwrap_or_else(|| "nobody".into())
            )));
        }
        let current = self.round().current_bet();
        match *action {
            Action::Fold => Ok(()),
            Action::Check if seat.stake() != current => Err(EngineError::illegal(format!(
                "{} cannot check facing {} more",
                position,
                current - seat.stake()
            ))),
            // Guard only: the stake check above already turns away every seat
            // but the big blind on an unraised preflop.
            Action::Check if self.street() == Street::Pref && position != Position::Bb => {
                Err(EngineError::illegal(format!(
                    "only the big blind may check preflop, not {}",
                    position
                )))
            }
            Action::Check
                if self.street() == Street::Pref && current != self.config().big_blind =>
            {
                Err(EngineError::illegal("the big blind option is gone after a raise"))
            }
            Action::Check => Ok(()),
            Action::Call(_) if current <= seat.stake() => {
                Err(EngineError::illegal(format!("{} has nothing to call", position)))
            }
            Action::Call(amount) if amount != self.to_call(seat) => {
                Err(EngineError::illegal(format!(
                    "call must be {}, not {}",
                    self.to_call(seat),
                    amount
                )))
            }
            Action::Call(_) => Ok(()),
            Action::Raise(_) if seat.acted() => Err(EngineError::illegal(format!(
                "action was not reopened for {}",
                position
            ))),
            Action::Raise(to) if to > seat.reach() => Err(EngineError::illegal(format!(
                "raise to {} exceeds the {} behind",
                to,
                seat.reach()
            ))),
            Action::Raise(to) if to <= current => Err(EngineError::illegal(format!(
                "raise to {} does not exceed the bet of {}",
                to, current
            ))),
            Action::Raise(to) if to - current < self.round().min_raise() => {
                Err(EngineError::BelowMinimumRaise {
                    increment: to - current,
                    minimum: self.round().min_raise(),
                })
            }
            Action::Raise(_) => Ok(()),
            Action::Shove(total) if total != seat.reach() => Err(EngineError::illegal(format!(
                "all-in must be {}, not {}",
                seat.reach(),
                total
            ))),
            Action::Shove(total) if total > current && seat.acted() => {
                Err(EngineError::illegal(format!(
                    "action was not reopened for {}; call {} or fold",
                    position,
                    self.to_call(seat)
                )))
            }
            Action::Shove(_) => Ok(()),
            Action::Blind(_) | Action::Ante(_) => Err(EngineError::illegal(format!(
                "{} is posted at hand start only",
                action.label()
            ))),
        }
    }

    /// Core state transition. Assumes `check` passed.
    fn act(&mut self, position: Position, action: Action, timestamp: Millis) {
        let current = self.round().current_bet();
        let min_raise = self.round().min_raise();
        let seat = self.seat_mut(position);
        let stake = seat.stake();
        let chips = match action {
            Action::Fold => {
                seat.fold();
                0
            }
            Action::Check => {
                seat.touch();
                0
            }
            Action::Call(amount) => {
                seat.bet(amount);
                seat.touch();
                amount
            }
            Action::Raise(to) | Action::Shove(to) => {
                seat.bet(to - stake);
                seat.touch();
                to - stake
            }
            Action::Blind(_) | Action::Ante(_) => unreachable!("forced posts rejected by check"),
        };
        if let Action::Raise(to) | Action::Shove(to) = action {
            if to > current {
                let full = to - current >= min_raise;
                self.round_mut().lift(to, full);
                if full {
                    self.reopen(position);
                }
            }
        }
        self.pot += chips;
        let pot = self.pot;
        self.round_mut().push(position, action, timestamp, pot);
        log::debug!("{:<4} {}", position, action);
        self.proceed(Some(position));
    }

    /// Clears `acted` for everyone but the raiser.
    fn reopen(&mut self, raiser: Position) {
        for seat in self.seats.iter_mut().filter(|s| s.position() != raiser) {
            seat.reopen();
        }
    }
}

/// Street advancement.
impl Hand {
    /// Opens the next street once the current round is complete.
    ///
    /// `cards` is either empty or exactly the street's reveal count, none of
    /// them already on the board or in the hero's hole cards.
    pub fn advance(&self, cards: Vec<Card>) -> Result<Self, EngineError> {
        let street = match self.phase {
            Phase::Betting(street) if self.round().is_complete() => street,
            _ => {
                return Err(EngineError::sequence(format!(
                    "cannot advance from {} before the round is complete",
                    self.phase
                )));
            }
        };
        let next = street
            .next()
            .ok_or_else(|| EngineError::sequence("no street follows the river"))?;
        if !cards.is_empty() && cards.len() != next.n_revealed() {
            return Err(EngineError::illegal(format!(
                "the {} reveals {} cards, got {}",
                next,
                next.n_revealed(),
                cards.len()
            )));
        }
        for (i, card) in cards.iter().enumerate() {
            let seen = self.board.contains(card)
                || cards[..i].contains(card)
                || self.hole().is_some_and(|h| h.contains(card));
            if seen {
                return Err(EngineError::illegal(format!("{} is already dealt", card)));
            }
        }
        let mut child = self.clone();
        child.open(next, cards);
        Ok(child)
    }

    fn open(&mut self, street: Street, cards: Vec<Card>) {
        for seat in self.seats.iter_mut() {
            seat.reset_stake();
            seat.reopen();
        }
        self.board.extend(cards.iter().copied());
        let round = Round::new(street, self.config().big_blind, self.pot).with_cards(cards);
        self.rounds.push(round);
        self.phase = Phase::Betting(street);
        log::debug!("{} opens, pot {}", street, self.pot);
        self.proceed(None);
    }
}

/// Round bookkeeping after every transition.
impl Hand {
    /// Refreshes side pots, then either terminates the hand, closes the
    /// round, or finds the next seat to act after `last`.
    fn proceed(&mut self, last: Option<Position>) {
        debug_assert_eq!(
            self.pot,
            self.seats.iter().map(|s| s.spent()).sum::<Chips>(),
            "pot drifted from contributions"
        );
        self.side_pots = compute_side_pots(&self.seats);
        if self.is_everyone_folding() {
            self.round_mut().complete();
            self.next = None;
            let survivor = self.contenders();
            let verdicts = survivor
                .into_iter()
                .map(|p| (p, Verdict::Won))
                .collect::<Vec<_>>();
            self.resolve(&verdicts);
        } else if self.is_everyone_settled() {
            self.round_mut().complete();
            self.next = None;
            if self.street() == Street::Rive {
                self.phase = Phase::Showdown;
                log::debug!("showdown between {:?}", self.contenders());
            }
        } else {
            self.next = self.after(last);
        }
    }

    /// First seat owing a decision, searching clockwise from after `last`.
    fn after(&self, last: Option<Position>) -> Option<Position> {
        let order = self.config().size.sequence(self.street());
        let start = last
            .and_then(|p| order.iter().position(|o| *o == p))
            .map(|i| i + 1)
            .unwrap_or(0);
        let rotated = order
            .iter()
            .cycle()
            .skip(start)
            .take(order.len())
            .copied()
            .collect::<Vec<_>>();
        active(&rotated, &self.seats)
            .into_iter()
            .find(|p| self.seat(*p).is_some_and(|s| self.owes(s)))
    }

    fn owes(&self, seat: &Seat) -> bool {
        seat.state() == State::Betting
            && (!seat.acted() || seat.stake() < self.round().current_bet())
    }

    /// Nobody still betting owes a decision.
    ///
    /// A lone seat with chips behind has no one to bet against, so once it
    /// has matched the bet it need not act.
    fn is_everyone_settled(&self) -> bool {
        let current = self.round().current_bet();
        let betting = self
            .seats
            .iter()
            .filter(|s| s.state() == State::Betting)
            .collect::<Vec<_>>();
        let alone = betting.len() < 2;
        betting
            .iter()
            .all(|s| s.stake() == current && (s.acted() || alone))
    }

    /// Exactly one seat still holds cards.
    fn is_everyone_folding(&self) -> bool {
        self.seats.iter().filter(|s| s.state().is_active()).count() == 1
    }

    fn is_betting(&self) -> bool {
        matches!(self.phase, Phase::Betting(_)) && !self.round().is_complete()
    }

    /// Positions in the order of the current street.
    fn order(&self) -> Vec<Position> {
        self.config()
            .size
            .sequence(self.street())
            .iter()
            .copied()
            .filter(|p| self.seat(*p).is_some())
            .collect()
    }

    fn seat_mut(&mut self, position: Position) -> &mut Seat {
        self.seats
            .iter_mut()
            .find(|s| s.position() == position)
            .expect("position validated before mutation")
    }

    fn round_mut(&mut self) -> &mut Round {
        self.rounds.last_mut().expect("a hand always has a round")
    }
}

/// Bet sizing and action constructors.
impl Hand {
    /// Chips needed to call, capped by the stack.
    pub fn to_call(&self, seat: &Seat) -> Chips {
        (self.round().current_bet() - seat.stake()).clamp(0, seat.stack())
    }
    /// Smallest legal raise-to total.
    pub fn to_raise(&self) -> Chips {
        self.round().current_bet() + self.round().min_raise()
    }
    /// The seat's all-in total for this street.
    pub fn to_shove(&self, seat: &Seat) -> Chips {
        seat.reach()
    }
    pub fn calls(&self, seat: &Seat) -> Action {
        Action::Call(self.to_call(seat))
    }
    pub fn raise(&self) -> Action {
        Action::Raise(self.to_raise())
    }
    pub fn shove(&self, seat: &Seat) -> Action {
        Action::Shove(self.to_shove(seat))
    }
    fn may_check(&self, seat: &Seat) -> bool {
        self.is_allowed(seat.position(), &Action::Check)
    }
    /// Facing a bet that leaves chips behind after calling.
    fn may_call(&self, seat: &Seat) -> bool {
        self.round().current_bet() > seat.stake() && self.to_call(seat) < seat.stack()
    }
    /// Reopened, with more than a min-raise behind.
    fn may_raise(&self, seat: &Seat) -> bool {
        !seat.acted() && self.to_raise() < seat.reach()
    }
    /// Reopened, or all-in does not exceed the bet.
    fn may_shove(&self, seat: &Seat) -> bool {
        !seat.acted() || seat.reach() <= self.round().current_bet()
    }
}

/// Resolution and records.
impl Hand {
    /// Distributes the pot from operator-recorded verdicts.
    pub fn showdown(&self, verdicts: &[(Position, Verdict)]) -> Result<Self, EngineError> {
        if self.phase != Phase::Showdown {
            return Err(EngineError::sequence(format!(
                "verdicts are only taken at showdown, not {}",
                self.phase
            )));
        }
        Showdown::verify(&self.contenders(), verdicts)?;
        let mut child = self.clone();
        child.resolve(verdicts);
        Ok(child)
    }

    fn resolve(&mut self, verdicts: &[(Position, Verdict)]) {
        let ledger = self
            .seats
            .iter()
            .map(|seat| {
                let verdict = verdicts
                    .iter()
                    .find(|(p, _)| *p == seat.position())
                    .map(|(_, v)| *v);
                Settlement::new(seat.position(), seat.spent(), seat.state(), verdict)
            })
            .collect::<Vec<_>>();
        let settlements = Showdown::from((ledger, self.layers())).settle();
        for (seat, settlement) in self.seats.iter_mut().zip(settlements.iter()) {
            seat.win(settlement.reward());
        }
        self.settlements = settlements;
        self.phase = Phase::Complete;
        self.next = None;
        log::info!(
            "hand #{} complete, pot {} | {}",
            self.number(),
            self.pot,
            self.settlements
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" | ")
        );
    }

    /// The persistence record for a completed hand.
    pub fn record(&self) -> Result<StoredHand, EngineError> {
        if self.phase != Phase::Complete {
            return Err(EngineError::sequence(format!(
                "hand #{} is still in {}",
                self.number(),
                self.phase
            )));
        }
        Ok(StoredHand::from(self))
    }
}

impl TryFrom<&Setup> for Hand {
    type Error = EngineError;
    fn try_from(setup: &Setup) -> Result<Self, Self::Error> {
        Self::start(setup)
    }
}

impl Arbitrary for Hand {
    fn random() -> Self {
        Self::start(&Setup::random()).expect("random setups are valid")
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Hand #{} {} [{}]", self.number(), self.config(), self.phase)?;
        for seat in self.seats.iter() {
            let marker = if self.next == Some(seat.position()) { ">" } else { " " };
            writeln!(f, "{} {}", marker, seat)?;
        }
        writeln!(f, "Pot   {}", self.pot)?;
        for pot in self.side_pots.iter() {
            writeln!(f, "Side  {}", pot)?;
        }
        let board = self.board.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        writeln!(f, "Board {}", board.join(" "))?;
        Ok(())
    }
}
