use super::*;

/// Table stakes and size, fixed for a session.
///
/// Deserializes from JSON such as
/// `{"size": 6, "small_blind": 1, "big_blind": 2, "ante": null}`.
/// Missing fields fall back to the crate defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub size: TableSize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Option<Chips>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: TableSize::default(),
            small_blind: S_BLIND,
            big_blind: B_BLIND,
            ante: None,
        }
    }
}

impl Config {
    pub fn new(size: TableSize, small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            size,
            small_blind,
            big_blind,
            ante: None,
        }
    }
    pub fn with_ante(self, ante: Chips) -> Self {
        Self {
            ante: Some(ante),
            ..self
        }
    }
    /// Rejects non-positive blinds or ante and a small blind above the big blind.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.small_blind <= 0 {
            return Err(EngineError::config(format!(
                "small blind must be positive, got {}",
                self.small_blind
            )));
        }
        if self.big_blind <= 0 {
            return Err(EngineError::config(format!(
                "big blind must be positive, got {}",
                self.big_blind
            )));
        }
        if self.small_blind > self.big_blind {
            return Err(EngineError::config(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            )));
        }
        match self.ante {
            Some(ante) if ante <= 0 => Err(EngineError::config(format!(
                "ante must be positive when present, got {}",
                ante
            ))),
            _ => Ok(()),
        }
    }
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        let config = serde_json::from_str::<Self>(&text)?;
        config.validate()?;
        log::debug!("loaded config from {}: {}", path.display(), config);
        Ok(config)
    }
    /// Loads the file named by [`CONFIG_VAR`], or the defaults when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(CONFIG_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}/{}", self.size, self.small_blind, self.big_blind)?;
        if let Some(ante) = self.ante {
            write!(f, " ante {}", ante)?;
        }
        Ok(())
    }
}

/// Everything needed to start one hand.
///
/// `players` lists every dealt-in seat with its starting stack. `hero` is the
/// seat the tracker's user is sitting in; results are reported from that
/// seat's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Setup {
    pub number: Number,
    pub config: Config,
    pub players: Vec<(Position, Chips)>,
    pub hero: Position,
    #[serde(default)]
    pub hole: Option<Hole>,
}

impl Setup {
    pub fn new(
        number: Number,
        config: Config,
        players: Vec<(Position, Chips)>,
        hero: Position,
    ) -> Self {
        Self {
            number,
            config,
            players,
            hero,
            hole: None,
        }
    }
    pub fn with_hole(self, hole: Hole) -> Self {
        Self {
            hole: Some(hole),
            ..self
        }
    }
    /// Checks stakes and seating before any chips move.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.config.validate()?;
        if self.players.len() < 2 {
            return Err(EngineError::config("a hand needs at least two players"));
        }
        for (i, (position, stack)) in self.players.iter().enumerate() {
            if !self.config.size.contains(*position) {
                return Err(EngineError::config(format!(
                    "{} does not exist at a {} table",
                    position, self.config.size
                )));
            }
            if *stack <= 0 {
                return Err(EngineError::config(format!(
                    "{} must start with a positive stack, got {}",
                    position, stack
                )));
            }
            if self.players[..i].iter().any(|(p, _)| p == position) {
                return Err(EngineError::config(format!("{} is seated twice", position)));
            }
        }
        for blind in [Position::Sb, Position::Bb] {
            if !self.players.iter().any(|(p, _)| *p == blind) {
                return Err(EngineError::config(format!("{} must be seated", blind)));
            }
        }
        if !self.players.iter().any(|(p, _)| *p == self.hero) {
            return Err(EngineError::config(format!(
                "hero seat {} is not dealt in",
                self.hero
            )));
        }
        Ok(())
    }
}

impl Arbitrary for Setup {
    /// A full ring of random size with random stacks, hero in a random seat.
    fn random() -> Self {
        let size = match rand::random_bool(0.5) {
            true => TableSize::Six,
            false => TableSize::Nine,
        };
        let players = size
            .positions()
            .iter()
            .map(|p| (*p, rand::random_range(B_BLIND..=STACK)))
            .collect::<Vec<_>>();
        let hero = players[rand::random_range(0..players.len())].0;
        Self::new(1, Config::new(size, S_BLIND, B_BLIND), players, hero)
    }
}
