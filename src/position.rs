use super::*;

/// An acting seat role at the table.
///
/// Only seats that can take betting actions live here. The visual dealer
/// seat is [`Chair::Dealer`], a different type, so it can never leak into an
/// action order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Utg,
    Utg1,
    Utg2,
    Mp,
    Hj,
    Co,
    Btn,
    Sb,
    Bb,
}

impl Position {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Utg => "UTG",
            Self::Utg1 => "UTG1",
            Self::Utg2 => "UTG2",
            Self::Mp => "MP",
            Self::Hj => "HJ",
            Self::Co => "CO",
            Self::Btn => "BTN",
            Self::Sb => "SB",
            Self::Bb => "BB",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<&str> for Position {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().replace(['+', '_', ' '], "").as_str() {
            "UTG" => Ok(Self::Utg),
            "UTG1" => Ok(Self::Utg1),
            "UTG2" => Ok(Self::Utg2),
            "MP" => Ok(Self::Mp),
            "HJ" => Ok(Self::Hj),
            "CO" => Ok(Self::Co),
            "BTN" | "BU" => Ok(Self::Btn),
            "SB" => Ok(Self::Sb),
            "BB" => Ok(Self::Bb),
            _ => Err(format!("invalid position: {}", s)),
        }
    }
}

/// A chair in the visual table layout, including the non-acting dealer.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Chair {
    Seat(Position),
    Dealer,
}

impl std::fmt::Display for Chair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Seat(position) => write!(f, "{}", position),
            Self::Dealer => write!(f, "DEALER"),
        }
    }
}

/// Number of effective (acting) seats at the table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TableSize {
    Six,
    #[default]
    Nine,
}

const SIX_PREFLOP: [Position; 6] = [
    Position::Utg,
    Position::Mp,
    Position::Co,
    Position::Btn,
    Position::Sb,
    Position::Bb,
];
const SIX_POSTFLOP: [Position; 6] = [
    Position::Sb,
    Position::Bb,
    Position::Utg,
    Position::Mp,
    Position::Co,
    Position::Btn,
];
const NINE_PREFLOP: [Position; 9] = [
    Position::Utg,
    Position::Utg1,
    Position::Utg2,
    Position::Mp,
    Position::Hj,
    Position::Co,
    Position::Btn,
    Position::Sb,
    Position::Bb,
];
const NINE_POSTFLOP: [Position; 9] = [
    Position::Sb,
    Position::Bb,
    Position::Utg,
    Position::Utg1,
    Position::Utg2,
    Position::Mp,
    Position::Hj,
    Position::Co,
    Position::Btn,
];

impl TableSize {
    pub const fn n(&self) -> usize {
        match self {
            Self::Six => 6,
            Self::Nine => 9,
        }
    }
    /// Seats that exist at this table size.
    pub fn positions(&self) -> &'static [Position] {
        self.sequence(Street::Pref)
    }
    /// True if the position exists at this table size.
    pub fn contains(&self, position: Position) -> bool {
        self.positions().contains(&position)
    }
    /// Canonical action order for a street, never including the dealer.
    ///
    /// Preflop runs from UTG to the big blind so the blinds close the action;
    /// every later street runs from the small blind round to the button.
    pub fn sequence(&self, street: Street) -> &'static [Position] {
        match (self, street) {
            (Self::Six, Street::Pref) => &SIX_PREFLOP,
            (Self::Six, _) => &SIX_POSTFLOP,
            (Self::Nine, Street::Pref) => &NINE_PREFLOP,
            (Self::Nine, _) => &NINE_POSTFLOP,
        }
    }
    /// Clockwise visual layout starting from the dealer chair.
    pub fn chairs(&self) -> Vec<Chair> {
        std::iter::once(Chair::Dealer)
            .chain(self.sequence(Street::Flop).iter().copied().map(Chair::Seat))
            .collect()
    }
}

impl TryFrom<u8> for TableSize {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            6 => Ok(Self::Six),
            9 => Ok(Self::Nine),
            _ => Err(format!("table size must be 6 or 9, got {}", n)),
        }
    }
}
impl From<TableSize> for u8 {
    fn from(size: TableSize) -> u8 {
        size.n() as u8
    }
}

impl std::fmt::Display for TableSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-max", self.n())
    }
}

/// Filters a canonical order down to seats that can still act.
///
/// Relative order is preserved. Folded and all-in seats are dropped, as are
/// positions with nobody sitting in them. This is the only turn order the
/// engine consults when deciding who acts next.
pub fn active(order: &[Position], seats: &[Seat]) -> Vec<Position> {
    order
        .iter()
        .copied()
        .filter(|p| {
            seats
                .iter()
                .any(|s| s.position() == *p && s.state() == State::Betting)
        })
        .collect()
}
