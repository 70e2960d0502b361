use super::*;

/// A player decision or forced post.
///
/// Chip amounts follow the round's bookkeeping:
///
/// - `Call(x)` — chips added to match the bet (capped by the stack)
/// - `Raise(x)` — the new **total** stake for the street, not the increment
/// - `Shove(x)` — the seat's total stake once its whole stack is in
/// - `Blind(x)` / `Ante(x)` — forced posts logged at hand start
///
/// Serializes adjacently tagged, e.g. `{"kind":"raise","amount":12}`.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "kebab-case")]
pub enum Action {
    Fold,
    Check,
    Call(Chips),
    Raise(Chips),
    #[serde(rename = "all-in")]
    Shove(Chips),
    Blind(Chips),
    Ante(Chips),
}

impl Action {
    /// True if this is a voluntary decision rather than a forced post.
    pub fn is_choice(&self) -> bool {
        !self.is_forced()
    }
    /// True for blinds and antes.
    pub fn is_forced(&self) -> bool {
        matches!(self, Action::Blind(_) | Action::Ante(_))
    }
    /// True if this is a raise or shove (aggressive action).
    pub fn is_aggro(&self) -> bool {
        matches!(self, Action::Raise(_) | Action::Shove(_))
    }
    pub fn label(&self) -> &'static str {
        match self {
            Action::Fold => "Fold",
            Action::Check => "Check",
            Action::Call(_) => "Call",
            Action::Raise(_) => "Raise",
            Action::Shove(_) => "All-in",
            Action::Blind(_) => "Blind",
            Action::Ante(_) => "Ante",
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let amount = || {
            parts
                .get(1)
                .and_then(|n| n.parse::<Chips>().ok())
                .ok_or_else(|| format!("missing or invalid amount in {:?}", s))
        };
        match parts.first().map(|p| p.to_uppercase()).as_deref() {
            Some("CHECK") => Ok(Action::Check),
            Some("FOLD") => Ok(Action::Fold),
            Some("CALL") => amount().map(Action::Call),
            Some("RAISE") => amount().map(Action::Raise),
            Some("SHOVE") | Some("ALLIN") => amount().map(Action::Shove),
            Some("BLIND") => amount().map(Action::Blind),
            Some("ANTE") => amount().map(Action::Ante),
            _ => Err(format!("invalid action type: {:?}", s)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "FOLD"),
            Action::Check => write!(f, "CHECK"),
            Action::Call(amount) => write!(f, "CALL  {}", amount),
            Action::Raise(amount) => write!(f, "RAISE {}", amount),
            Action::Shove(amount) => write!(f, "SHOVE {}", amount),
            Action::Blind(amount) => write!(f, "BLIND {}", amount),
            Action::Ante(amount) => write!(f, "ANTE  {}", amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_agree() {
        for action in [
            Action::Fold,
            Action::Check,
            Action::Call(4),
            Action::Raise(12),
            Action::Shove(250),
            Action::Blind(2),
            Action::Ante(1),
        ] {
            assert_eq!(Action::try_from(action.to_string().as_str()), Ok(action));
        }
    }

    #[test]
    fn parse_requires_amounts() {
        assert!(Action::try_from("raise").is_err());
        assert!(Action::try_from("call x").is_err());
        assert!(Action::try_from("limp 2").is_err());
        assert!(Action::try_from("").is_err());
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&Action::Raise(12)).unwrap();
        assert_eq!(json, r#"{"kind":"raise","amount":12}"#);
        let json = serde_json::to_string(&Action::Shove(40)).unwrap();
        assert_eq!(json, r#"{"kind":"all-in","amount":40}"#);
        let json = serde_json::to_string(&Action::Fold).unwrap();
        assert_eq!(json, r#"{"kind":"fold"}"#);
    }
}
