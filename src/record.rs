use super::*;

/// How the hand ended for the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandOutcome {
    Won,
    Lost,
    Folded,
    Chopped,
}

impl std::fmt::Display for HandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
            Self::Folded => write!(f, "folded"),
            Self::Chopped => write!(f, "chopped"),
        }
    }
}

/// The hero's view of a finished hand.
///
/// - `winner` — The seat that took the pot, absent when it was chopped
/// - `pot_won` — Chips the hero collected, absent when nothing came back
/// - `stack_after` — The hero's stack after distribution
/// - `hand_outcome` — Won, lost, folded or chopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HandResult {
    pub winner: Option<Position>,
    pub pot_won: Option<Chips>,
    pub stack_after: Chips,
    pub hand_outcome: HandOutcome,
}

/// Serializable record of a completed hand, handed to persistence.
///
/// Carries the setup and every round log, so [`replay`](Self::replay)
/// can rebuild the final [`Hand`] exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StoredHand {
    pub number: Number,
    pub setup: Setup,
    pub hole: Option<Hole>,
    pub board: Vec<Card>,
    pub rounds: Vec<Round>,
    pub settlements: Vec<Settlement>,
    pub result: HandResult,
}

impl StoredHand {
    /// Rebuilds the completed hand from its own logs.
    pub fn replay(&self) -> Result<Hand, EngineError> {
        History::try_from(self).map(|history| history.head().clone())
    }
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&Hand> for StoredHand {
    fn from(hand: &Hand) -> Self {
        debug_assert!(hand.phase() == Phase::Complete);
        Self {
            number: hand.number(),
            setup: hand.setup().clone(),
            hole: hand.hole(),
            board: hand.board().to_vec(),
            rounds: hand.rounds().to_vec(),
            settlements: hand.settlements().to_vec(),
            result: HandResult::from(hand),
        }
    }
}

impl From<&Hand> for HandResult {
    fn from(hand: &Hand) -> Self {
        let hero = hand
            .settlements()
            .iter()
            .find(|s| s.position() == hand.hero());
        let winner = hand
            .settlements()
            .iter()
            .find(|s| s.verdict() == Some(Verdict::Won))
            .map(|s| s.position());
        let hand_outcome = match hero.map(|s| (s.state(), s.verdict())) {
            Some((State::Folding, _)) | None => HandOutcome::Folded,
            Some((_, Some(Verdict::Won))) => HandOutcome::Won,
            Some((_, Some(Verdict::Chopped))) => HandOutcome::Chopped,
            Some((_, _)) => HandOutcome::Lost,
        };
        Self {
            winner,
            pot_won: hero.map(|s| s.reward()).filter(|r| *r > 0),
            stack_after: hand.seat(hand.hero()).map(|s| s.stack()).unwrap_or_default(),
            hand_outcome,
        }
    }
}
