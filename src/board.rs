use std::collections::BTreeMap;

use crate::util::Troops;

/// A territory on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    pub name: String,
    pub owner: Option<String>,
    pub armies: Troops,
}

impl Territory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            armies: 0,
        }
    }
}

/// A continent: a named group of territories worth bonus armies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continent {
    pub name: String,
    pub bonus: u32,
    pub territories: Vec<String>,
}

/// A board holds territories and the continents that group them, both
/// addressable by name.
#[derive(Debug, Clone, Default)]
pub struct Board {
    territories: BTreeMap<String, Territory>,
    continents: BTreeMap<String, Continent>,
}

// TODO: wire borders and sea lines between territories.
const CONTINENTS: [(&str, u32, &[&str]); 6] = [
    (
        "North America",
        5,
        &[
            "Alaska",
            "Alberta",
            "Central America",
            "Eastern United States",
            "Greenland",
            "Northwest Territory",
            "Ontario",
            "Quebec",
            "Western United States",
        ],
    ),
    (
        "South America",
        2,
        &["Argentina", "Brazil", "Peru", "Venezuela"],
    ),
    (
        "Europe",
        5,
        &[
            "Great Britain",
            "Iceland",
            "Northern Europe",
            "Scandinavia",
            "Southern Europe",
            "Ukraine",
            "Western Europe",
        ],
    ),
    (
        "Africa",
        3,
        &[
            "Congo",
            "East Africa",
            "Egypt",
            "Madagascar",
            "North Africa",
            "South Africa",
        ],
    ),
    (
        "Asia",
        7,
        &[
            "Afghanistan",
            "China",
            "India",
            "Irkutsk",
            "Japan",
            "Kamchatka",
            "Middle East",
            "Mongolia",
            "Siam",
            "Siberia",
            "Ural",
            "Yakutsk",
        ],
    ),
    (
        "Australia",
        2,
        &[
            "Eastern Australia",
            "Indonesia",
            "New Guinea",
            "Western Australia",
        ],
    ),
];

impl Board {
    /// The standard board: 42 territories in 6 continents.
    pub fn standard() -> Self {
        let mut board = Self::default();
        for (name, bonus, members) in CONTINENTS {
            for &territory in members {
                board.add_territory(Territory::new(territory));
            }
            board.add_continent(Continent {
                name: name.to_string(),
                bonus,
                territories: members.iter().map(|m| m.to_string()).collect(),
            });
        }
        board
    }

    pub fn add_territory(&mut self, territory: Territory) {
        self.territories.insert(territory.name.clone(), territory);
    }

    pub fn add_continent(&mut self, continent: Continent) {
        self.continents.insert(continent.name.clone(), continent);
    }

    pub fn territory(&self, name: &str) -> Option<&Territory> {
        self.territories.get(name)
    }

    pub fn territory_mut(&mut self, name: &str) -> Option<&mut Territory> {
        self.territories.get_mut(name)
    }

    pub fn continent(&self, name: &str) -> Option<&Continent> {
        self.continents.get(name)
    }

    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    pub fn continents(&self) -> impl Iterator<Item = &Continent> {
        self.continents.values()
    }
}
