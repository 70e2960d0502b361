use super::*;

/// Picks a random legal transition for whatever the hand is waiting on.
///
/// Raises are sized uniformly between the minimum and just below all-in.
/// Streets are dealt from the cards not yet seen, and showdowns get a random
/// valid verdict set. Returns `None` once the hand is complete.
pub fn step(hand: &Hand) -> Option<Hand> {
    match hand.turn() {
        Turn::Terminal => None,
        Turn::Choice(position) => {
            let actions = hand.legal(position);
            let action = match actions[rand::random_range(0..actions.len())] {
                Action::Raise(min) => {
                    let seat = hand.seat(position)?;
                    Action::Raise(rand::random_range(min..seat.reach()))
                }
                action => action,
            };
            Some(hand.apply(position, action))
        }
        Turn::Chance(street) => {
            let cards = match rand::random_bool(0.9) {
                true => deal(hand, street.n_revealed()),
                false => vec![],
            };
            Some(hand.advance(cards).expect("unseen cards deal cleanly"))
        }
        Turn::Showdown => Some(
            hand.showdown(&verdicts(&hand.contenders()))
                .expect("generated verdicts are valid"),
        ),
    }
}

/// Draws `n` cards missing from the board and the hero's hole cards.
pub fn deal(hand: &Hand, n: usize) -> Vec<Card> {
    let mut deck = (0..52u8)
        .filter_map(|i| Card::try_from(i).ok())
        .filter(|c| !hand.board().contains(c))
        .filter(|c| !hand.hole().is_some_and(|h| h.contains(c)))
        .collect::<Vec<_>>();
    (0..n)
        .map(|_| deck.swap_remove(rand::random_range(0..deck.len())))
        .collect()
}

/// One random winner, or a random chop between two or more seats.
pub fn verdicts(contenders: &[Position]) -> Vec<(Position, Verdict)> {
    let n = contenders.len();
    let chop = n >= 2 && rand::random_bool(0.25);
    let winner = rand::random_range(0..n);
    let choppers = if chop { rand::random_range(2..=n) } else { 0 };
    contenders
        .iter()
        .enumerate()
        .map(|(i, p)| match (chop, i) {
            (true, i) if i < choppers => (*p, Verdict::Chopped),
            (false, i) if i == winner => (*p, Verdict::Won),
            _ => (*p, Verdict::Lost),
        })
        .collect()
}

/// Iterator over every snapshot of one randomly played hand.
///
/// Yields the hand after each transition, ending with the completed hand.
pub struct Playout(Option<Hand>);
impl Playout {
    pub fn new(hand: Hand) -> Self {
        Self(Some(hand))
    }
}
impl Iterator for Playout {
    type Item = Hand;
    fn next(&mut self) -> Option<Self::Item> {
        let next = step(self.0.as_ref()?);
        self.0 = next.clone();
        next
    }
}

/// Iterator over completed hands at random tables.
///
/// Numbers hands sequentially from 1. Never terminates; use `.take(n)`.
pub struct Hands(Number);
impl Hands {
    pub fn new() -> Self {
        Self(0)
    }
}
impl Default for Hands {
    fn default() -> Self {
        Self::new()
    }
}
impl Iterator for Hands {
    type Item = Hand;
    fn next(&mut self) -> Option<Self::Item> {
        self.0 += 1;
        let setup = Setup {
            number: self.0,
            ..Setup::random()
        };
        let hand = Hand::start(&setup).expect("random setups are valid");
        Playout::new(hand.clone()).last().or(Some(hand))
    }
}

impl Hand {
    /// Iterator over snapshots of this hand played out at random.
    pub fn playout(self) -> Playout {
        Playout::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_always_complete() {
        for hand in Hands::new().take(200) {
            assert_eq!(hand.phase(), Phase::Complete);
            assert_eq!(hand.turn(), Turn::Terminal);
            assert!(hand.record().is_ok());
        }
    }

    #[test]
    fn chips_are_conserved() {
        for _ in 0..200 {
            let root = Hand::random();
            let total = root.total();
            for hand in root.playout() {
                assert_eq!(hand.total(), total);
                let spent = hand.seats().iter().map(|s| s.spent()).sum::<Chips>();
                assert_eq!(hand.pot(), spent);
                if !hand.side_pots().is_empty() {
                    let layered = hand.side_pots().iter().map(|p| p.amount).sum::<Chips>();
                    assert_eq!(layered, hand.pot());
                }
                if hand.phase() == Phase::Complete {
                    let paid = hand.settlements().iter().map(|s| s.reward()).sum::<Chips>();
                    assert_eq!(paid, hand.pot());
                }
            }
        }
    }

    #[test]
    fn next_to_act_is_always_live() {
        for _ in 0..200 {
            for hand in Hand::random().playout() {
                if let Some(position) = hand.next_to_act() {
                    let seat = hand.seat(position).unwrap();
                    assert_eq!(seat.state(), State::Betting);
                    assert!(!hand.legal(position).is_empty());
                }
            }
        }
    }

    #[test]
    fn bet_level_never_decreases() {
        for _ in 0..100 {
            let mut level = (Street::Pref, 0);
            for hand in Hand::random().playout() {
                let bet = (hand.street(), hand.round().current_bet());
                if bet.0 == level.0 {
                    assert!(bet.1 >= level.1);
                }
                level = bet;
            }
        }
    }

    #[test]
    fn stored_hands_replay() {
        for hand in Hands::new().take(50) {
            let stored = hand.record().unwrap();
            let json = stored.to_json().unwrap();
            let back = StoredHand::from_json(&json).unwrap();
            assert_eq!(back.replay().unwrap(), hand);
        }
    }

    #[test]
    fn generated_verdicts_verify() {
        let live = [Position::Sb, Position::Bb, Position::Co, Position::Btn];
        for _ in 0..100 {
            assert_eq!(Showdown::verify(&live, &verdicts(&live)), Ok(()));
        }
        let lone = [Position::Bb];
        assert_eq!(Showdown::verify(&lone, &verdicts(&lone)), Ok(()));
    }
}
