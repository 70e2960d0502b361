use super::*;

/// Outcome recorded by the operator for a seat that reached showdown.
///
/// The engine does not rank hands; whoever is tracking the hand says who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Won,
    Lost,
    Chopped,
}

impl Verdict {
    /// Winning verdicts outrank losing ones. Won and Chopped never coexist.
    pub const fn tier(&self) -> u8 {
        match self {
            Self::Won | Self::Chopped => 1,
            Self::Lost => 0,
        }
    }
}

impl TryFrom<&str> for Verdict {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "won" | "win" | "w" => Ok(Self::Won),
            "lost" | "lose" | "l" => Ok(Self::Lost),
            "chopped" | "chop" | "c" => Ok(Self::Chopped),
            _ => Err(format!("invalid verdict: {}", s)),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
            Self::Chopped => write!(f, "chopped"),
        }
    }
}

/// Computes chip distributions at the end of a hand.
///
/// Walks the pot layers from the main pot up. Each layer goes to the
/// highest verdict tier among its eligible seats and is split evenly between
/// them, with odd chips going to the earliest seats in payout order. A layer
/// nobody is eligible for goes back to the seats that funded it.
///
/// Payouts are expected in postflop order so that odd chips land on the
/// seats closest to the left of the button.
pub struct Showdown {
    payouts: Vec<Settlement>,
    layers: Vec<SidePot>,
}

impl From<(Vec<Settlement>, Vec<SidePot>)> for Showdown {
    fn from((payouts, layers): (Vec<Settlement>, Vec<SidePot>)) -> Self {
        Self { payouts, layers }
    }
}

impl Showdown {
    /// Checks a verdict set against the seats still holding cards.
    ///
    /// Every live seat needs exactly one verdict and nobody else may have
    /// one. Either one seat won and the rest lost, or two or more chopped.
    pub fn verify(live: &[Position], verdicts: &[(Position, Verdict)]) -> Result<(), EngineError> {
        for (i, (position, _)) in verdicts.iter().enumerate() {
            if !live.contains(position) {
                return Err(EngineError::outcome(format!(
                    "{} is not contesting the pot",
                    position
                )));
            }
            if verdicts[..i].iter().any(|(p, _)| p == position) {
                return Err(EngineError::outcome(format!(
                    "{} has more than one verdict",
                    position
                )));
            }
        }
        if let Some(missing) = live.iter().find(|p| !verdicts.iter().any(|(v, _)| v == *p)) {
            return Err(EngineError::outcome(format!("{} has no verdict", missing)));
        }
        let won = verdicts.iter().filter(|(_, v)| *v == Verdict::Won).count();
        let chopped = verdicts.iter().filter(|(_, v)| *v == Verdict::Chopped).count();
        match (won, chopped) {
            (1, 0) => Ok(()),
            (0, n) if n >= 2 => Ok(()),
            _ => Err(EngineError::outcome(format!(
                "{} won and {} chopped; need one winner or two or more choppers",
                won, chopped
            ))),
        }
    }

    /// Distributes all chips and returns final settlements.
    pub fn settle(mut self) -> Vec<Settlement> {
        let mut floor = 0;
        for layer in std::mem::take(&mut self.layers) {
            if layer.is_uncalled() {
                self.refund(&layer, floor);
            } else {
                self.distribute(&layer);
            }
            floor = layer.max_contribution;
        }
        debug_assert!(self.is_complete(), "undistributed chips");
        self.payouts
    }

    /// Pays a layer to its best verdict tier among eligible seats. Verdicts
    /// name one winner for the whole hand, so a side layer that winner is
    /// capped out of, with only `lost` seats eligible, is split evenly
    /// between them.
    fn distribute(&mut self, layer: &SidePot) {
        let best = self
            .payouts
            .iter()
            .filter(|p| layer.eligible_players.contains(&p.position()))
            .map(|p| p.verdict().map(|v| v.tier()).unwrap_or(0))
            .max()
            .unwrap_or(0);
        let mut winners = self
            .payouts
            .iter_mut()
            .filter(|p| layer.eligible_players.contains(&p.position()))
            .filter(|p| p.verdict().map(|v| v.tier()).unwrap_or(0) == best)
            .collect::<Vec<&mut Settlement>>();
        let n = winners.len() as Chips;
        let share = layer.amount / n;
        let bonus = layer.amount % n;
        for winner in winners.iter_mut() {
            winner.add(share);
        }
        for winner in winners.iter_mut().take(bonus as usize) {
            winner.add(1);
        }
        log::trace!("layer {} split {} ways", layer, n);
    }

    fn refund(&mut self, layer: &SidePot, floor: Chips) {
        for payout in self.payouts.iter_mut() {
            let share = layer.share(floor, payout.risked());
            payout.add(share);
        }
        log::trace!("layer {} refunded", layer);
    }

    fn is_complete(&self) -> bool {
        let staked = self.payouts.iter().map(|p| p.risked()).sum::<Chips>();
        let reward = self.payouts.iter().map(|p| p.reward()).sum::<Chips>();
        staked == reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payout(
        position: Position,
        risked: Chips,
        state: State,
        verdict: Option<Verdict>,
    ) -> Settlement {
        Settlement::new(position, risked, state, verdict)
    }

    fn pots(payouts: &[Settlement]) -> Vec<SidePot> {
        let seats = payouts
            .iter()
            .map(|p| {
                let mut seat = Seat::new(p.position(), p.risked() + 1);
                seat.bet(p.risked());
                seat.reset_state(p.state());
                seat
            })
            .collect::<Vec<_>>();
        layers(&seats)
    }

    fn settle(payouts: Vec<Settlement>) -> Vec<Settlement> {
        let layers = pots(&payouts);
        Showdown::from((payouts, layers)).settle()
    }

    #[test]
    fn heads_up_showdown() {
        let settlement = settle(vec![
            payout(Position::Sb, 100, State::Betting, Some(Verdict::Lost)),
            payout(Position::Bb, 100, State::Betting, Some(Verdict::Won)),
        ]);
        assert_eq!(settlement[0].reward(), 0);
        assert_eq!(settlement[1].reward(), 200);
    }

    #[test]
    fn folded_seats_fund_but_never_win() {
        let settlement = settle(vec![
            payout(Position::Sb, 50, State::Folding, None),
            payout(Position::Bb, 100, State::Betting, Some(Verdict::Lost)),
            payout(Position::Utg, 75, State::Folding, None),
            payout(Position::Btn, 100, State::Betting, Some(Verdict::Won)),
        ]);
        assert_eq!(settlement[0].reward(), 0);
        assert_eq!(settlement[1].reward(), 0);
        assert_eq!(settlement[2].reward(), 0);
        assert_eq!(settlement[3].reward(), 325);
    }

    #[test]
    fn short_winner_only_takes_main_pot() {
        let settlement = settle(vec![
            payout(Position::Sb, 30, State::Shoving, Some(Verdict::Won)),
            payout(Position::Bb, 100, State::Betting, Some(Verdict::Lost)),
            payout(Position::Btn, 100, State::Betting, Some(Verdict::Lost)),
        ]);
        assert_eq!(settlement[0].reward(), 90);
        assert_eq!(settlement[1].reward(), 70);
        assert_eq!(settlement[2].reward(), 70);
    }

    #[test]
    fn odd_chip_goes_to_earliest_chopper() {
        let settlement = settle(vec![
            payout(Position::Sb, 1, State::Folding, None),
            payout(Position::Bb, 10, State::Betting, Some(Verdict::Chopped)),
            payout(Position::Btn, 10, State::Betting, Some(Verdict::Chopped)),
        ]);
        assert_eq!(settlement[1].reward(), 11);
        assert_eq!(settlement[2].reward(), 10);
    }

    #[test]
    fn uncalled_chips_are_refunded() {
        let settlement = settle(vec![
            payout(Position::Sb, 20, State::Shoving, Some(Verdict::Won)),
            payout(Position::Bb, 60, State::Folding, None),
        ]);
        assert_eq!(settlement[0].reward(), 40);
        assert_eq!(settlement[1].reward(), 40);
    }

    #[test]
    fn verdict_sets() {
        let live = [Position::Sb, Position::Bb, Position::Btn];
        let ok = [
            (Position::Sb, Verdict::Lost),
            (Position::Bb, Verdict::Won),
            (Position::Btn, Verdict::Lost),
        ];
        assert_eq!(Showdown::verify(&live, &ok), Ok(()));
        let chop = [
            (Position::Sb, Verdict::Chopped),
            (Position::Bb, Verdict::Chopped),
            (Position::Btn, Verdict::Lost),
        ];
        assert_eq!(Showdown::verify(&live, &chop), Ok(()));
        let two_winners = [
            (Position::Sb, Verdict::Won),
            (Position::Bb, Verdict::Won),
            (Position::Btn, Verdict::Lost),
        ];
        let lone_chop = [
            (Position::Sb, Verdict::Chopped),
            (Position::Bb, Verdict::Lost),
            (Position::Btn, Verdict::Lost),
        ];
        let missing = [(Position::Sb, Verdict::Won), (Position::Bb, Verdict::Lost)];
        let stranger = [
            (Position::Sb, Verdict::Won),
            (Position::Bb, Verdict::Lost),
            (Position::Btn, Verdict::Lost),
            (Position::Co, Verdict::Lost),
        ];
        for bad in [&two_winners[..], &lone_chop[..], &missing[..], &stranger[..]] {
            assert!(matches!(
                Showdown::verify(&live, bad),
                Err(EngineError::InvalidOutcome(_))
            ));
        }
    }
}
