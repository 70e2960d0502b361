use super::*;

/// One eligibility-capped layer of the pot.
///
/// `max_contribution` is the layer's ceiling measured in whole-hand
/// contributions; the layer holds every chip contributed between the previous
/// ceiling and this one. Folded seats fund layers but are never eligible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible_players: Vec<Position>,
    pub max_contribution: Chips,
}

impl SidePot {
    /// Chips a single seat put into this layer, given the ceiling below it.
    pub fn share(&self, floor: Chips, spent: Chips) -> Chips {
        spent.min(self.max_contribution) - spent.min(floor)
    }
    /// True if nobody can win this layer and it goes back to its funders.
    pub fn is_uncalled(&self) -> bool {
        self.eligible_players.is_empty()
    }
}

impl std::fmt::Display for SidePot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let eligible = self
            .eligible_players
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{:>6} <= {:<6} [{}]", self.amount, self.max_contribution, eligible)
    }
}

/// Partitions every chip contributed this hand into pot layers.
///
/// Ceilings are the distinct contribution levels of seats still holding
/// cards, lowest first, so the first layer is the main pot. Each layer is
/// eligible to every live seat that reached its ceiling. Folded chips land
/// in whichever layer they fall in; chips a folded seat put in above every
/// live ceiling form a final layer nobody is eligible for.
///
/// The layers always sum to the total contributed.
pub fn layers(seats: &[Seat]) -> Vec<SidePot> {
    let mut ceilings = seats
        .iter()
        .filter(|s| s.state().is_active())
        .map(|s| s.spent())
        .filter(|spent| *spent > 0)
        .collect::<Vec<_>>();
    ceilings.sort_unstable();
    ceilings.dedup();
    let mut pots = Vec::with_capacity(ceilings.len() + 1);
    let mut floor = 0;
    for ceiling in ceilings {
        let amount = seats
            .iter()
            .map(|s| s.spent().min(ceiling) - s.spent().min(floor))
            .sum::<Chips>();
        let eligible_players = seats
            .iter()
            .filter(|s| s.state().is_active())
            .filter(|s| s.spent() >= ceiling)
            .map(|s| s.position())
            .collect::<Vec<_>>();
        pots.push(SidePot {
            amount,
            eligible_players,
            max_contribution: ceiling,
        });
        floor = ceiling;
    }
    let excess = seats
        .iter()
        .map(|s| s.spent() - s.spent().min(floor))
        .sum::<Chips>();
    if excess > 0 {
        pots.push(SidePot {
            amount: excess,
            eligible_players: vec![],
            max_contribution: seats.iter().map(|s| s.spent()).max().unwrap_or(floor),
        });
    }
    pots
}

/// Side pots to display while someone is all-in.
///
/// Empty when nobody is all-in or when every chip sits in a single layer,
/// since the main pot alone then describes the hand. Otherwise the full
/// [`layers`] view.
pub fn compute_side_pots(seats: &[Seat]) -> Vec<SidePot> {
    if !seats.iter().any(|s| s.state() == State::Shoving) {
        return vec![];
    }
    let pots = layers(seats);
    if pots.len() > 1 { pots } else { vec![] }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(position: Position, stack: Chips, spent: Chips, state: State) -> Seat {
        let mut seat = Seat::new(position, stack + spent);
        seat.bet(spent);
        match state {
            State::Betting => {}
            State::Shoving => seat.shove(),
            State::Folding => seat.fold(),
        }
        seat
    }

    #[test]
    fn empty_without_all_in() {
        let seats = vec![
            seat(Position::Sb, 90, 10, State::Betting),
            seat(Position::Bb, 90, 10, State::Betting),
            seat(Position::Btn, 98, 2, State::Folding),
        ];
        assert!(compute_side_pots(&seats).is_empty());
        assert_eq!(layers(&seats).len(), 1);
        assert_eq!(layers(&seats)[0].amount, 22);
    }

    /// shove for 50 over a bet of 10, one call, one fold
    #[test]
    fn shove_call_fold() {
        let seats = vec![
            seat(Position::Co, 0, 50, State::Shoving),
            seat(Position::Btn, 150, 50, State::Betting),
            seat(Position::Sb, 90, 10, State::Folding),
        ];
        let pots = layers(&seats);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 50 * 2 + 10);
        assert_eq!(pots[0].max_contribution, 50);
        assert_eq!(pots[0].eligible_players, vec![Position::Co, Position::Btn]);
        assert!(compute_side_pots(&seats).is_empty());
    }

    #[test]
    fn short_all_in_splits_pot() {
        let seats = vec![
            seat(Position::Utg, 0, 30, State::Shoving),
            seat(Position::Co, 0, 50, State::Shoving),
            seat(Position::Btn, 150, 80, State::Betting),
            seat(Position::Sb, 90, 10, State::Folding),
        ];
        let pots = compute_side_pots(&seats);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 30 * 3 + 10);
        assert_eq!(pots[0].eligible_players.len(), 3);
        assert_eq!(pots[1].amount, 20 * 2);
        assert_eq!(pots[1].eligible_players, vec![Position::Co, Position::Btn]);
        assert_eq!(pots[2].amount, 30);
        assert_eq!(pots[2].eligible_players, vec![Position::Btn]);
        let total = seats.iter().map(|s| s.spent()).sum::<Chips>();
        assert_eq!(pots.iter().map(|p| p.amount).sum::<Chips>(), total);
    }

    #[test]
    fn folded_excess_is_uncalled() {
        let seats = vec![
            seat(Position::Sb, 0, 20, State::Shoving),
            seat(Position::Bb, 40, 60, State::Folding),
        ];
        let pots = layers(&seats);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 40);
        assert_eq!(pots[1].amount, 40);
        assert!(pots[1].is_uncalled());
        assert_eq!(pots[1].share(20, 60), 40);
    }

    #[test]
    fn recompute_is_idempotent() {
        let seats = vec![
            seat(Position::Utg, 0, 30, State::Shoving),
            seat(Position::Mp, 20, 80, State::Betting),
            seat(Position::Co, 20, 80, State::Betting),
        ];
        assert_eq!(compute_side_pots(&seats), compute_side_pots(&seats));
        assert_eq!(compute_side_pots(&seats).len(), 2);
    }
}
