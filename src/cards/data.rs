//! Printed card data.
//!
//! `CardData` is the immutable, printed face of a card: everything that
//! comes off the physical cardboard. Runtime state lives on
//! [`Card`](crate::cards::Card).

use serde::{Deserialize, Serialize};

/// The printed type of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Character,
    Attachment,
    Event,
    Holding,
    Province,
    Stronghold,
    Role,
}

impl CardType {
    /// Province, stronghold and holding cards live in the province row.
    pub fn is_province_bound(self) -> bool {
        matches!(
            self,
            CardType::Province | CardType::Stronghold | CardType::Holding
        )
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardType::Character => "character",
            CardType::Attachment => "attachment",
            CardType::Event => "event",
            CardType::Holding => "holding",
            CardType::Province => "province",
            CardType::Stronghold => "stronghold",
            CardType::Role => "role",
        };
        write!(f, "{name}")
    }
}

/// Printed card attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    /// Stable identifier for the card design, e.g. `"doji-whisperer"`.
    pub id: String,
    pub name: String,
    pub card_type: CardType,
    pub traits: Vec<String>,
    pub faction: String,
    pub unique: bool,
    pub military_skill: Option<i64>,
    pub political_skill: Option<i64>,
    pub glory: i64,
    /// Province or stronghold strength; zero for other types.
    pub strength: i64,
}

impl CardData {
    pub fn new(id: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            card_type,
            traits: Vec::new(),
            faction: "neutral".to_string(),
            unique: false,
            military_skill: None,
            political_skill: None,
            glory: 0,
            strength: 0,
        }
    }

    #[must_use]
    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = faction.into();
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn with_skills(mut self, military: i64, political: i64) -> Self {
        self.military_skill = Some(military);
        self.political_skill = Some(political);
        self
    }

    #[must_use]
    pub fn with_glory(mut self, glory: i64) -> Self {
        self.glory = glory;
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: i64) -> Self {
        self.strength = strength;
        self
    }

    pub fn has_printed_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let data = CardData::new("doji-whisperer", "Doji Whisperer", CardType::Character)
            .with_traits(["courtier"])
            .with_faction("crane")
            .with_skills(0, 2)
            .with_glory(2);

        assert_eq!(data.id, "doji-whisperer");
        assert!(data.has_printed_trait("courtier"));
        assert!(!data.has_printed_trait("bushi"));
        assert_eq!(data.military_skill, Some(0));
        assert_eq!(data.political_skill, Some(2));
        assert_eq!(data.faction, "crane");
        assert!(!data.unique);
    }

    #[test]
    fn test_province_bound_types() {
        assert!(CardType::Province.is_province_bound());
        assert!(CardType::Stronghold.is_province_bound());
        assert!(CardType::Holding.is_province_bound());
        assert!(!CardType::Character.is_province_bound());
        assert!(!CardType::Event.is_province_bound());
    }
}
