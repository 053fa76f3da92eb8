use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cosmetic skin for the snake, picked on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Starter {
    #[default]
    Caterpie,
    Weedle,
    Wurmple,
}

impl Starter {
    pub const ALL: [Starter; 3] = [Starter::Caterpie, Starter::Weedle, Starter::Wurmple];

    pub fn name(self) -> &'static str {
        match self {
            Starter::Caterpie => "Caterpie",
            Starter::Weedle => "Weedle",
            Starter::Wurmple => "Wurmple",
        }
    }

    /// National Pokédex number
    pub fn dex_number(self) -> u16 {
        match self {
            Starter::Caterpie => 10,
            Starter::Weedle => 13,
            Starter::Wurmple => 265,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Starter> {
        Self::ALL.get(index).copied()
    }

    /// Next entry on the menu, wrapping
    pub fn next(self) -> Starter {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous entry on the menu, wrapping
    pub fn prev(self) -> Starter {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
