//! Card and type-group domain models
//!
//! Cards arrive already consolidated (one entry per name, quantities summed)
//! from the decklist collaborator. This module classifies them by primary
//! type and builds the ordered groups the packing list renders.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Card types in packing-list order
const TYPE_PRIORITY: [&str; 8] = [
    "Creature",
    "Planeswalker",
    "Battle",
    "Instant",
    "Sorcery",
    "Enchantment",
    "Artifact",
    "Land",
];

/// Reserved group name for cards without a recognised type
const UNKNOWN_TYPE: &str = "Unknown";

/// A single decklist entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Card {
    pub name: String,
    pub qty: u32,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub mana_cost: String,
}

impl Card {
    pub fn new(name: impl Into<String>, qty: u32, type_line: impl Into<String>, mana_cost: impl Into<String>) -> Self {
        Card {
            name: name.into(),
            qty,
            type_line: type_line.into(),
            mana_cost: mana_cost.into(),
        }
    }

    /// Identity key used for consolidation and lookups
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Cards sharing a primary type, sorted by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TypeGroup {
    pub type_name: String,
    pub cards: Vec<Card>,
}

impl TypeGroup {
    /// Sum of quantities, shown in the group heading
    pub fn total_qty(&self) -> u32 {
        self.cards.iter().map(|c| c.qty).sum()
    }
}

/// Color identity letters, in canonical W U B R G order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum ManaColor {
    W,
    U,
    B,
    R,
    G,
}

impl ManaColor {
    pub const ALL: [ManaColor; 5] = [ManaColor::W, ManaColor::U, ManaColor::B, ManaColor::R, ManaColor::G];

    /// Symbol key used to look up the icon
    pub fn symbol_key(&self) -> &'static str {
        match self {
            ManaColor::W => "W",
            ManaColor::U => "U",
            ManaColor::B => "B",
            ManaColor::R => "R",
            ManaColor::G => "G",
        }
    }

    /// Filter a selection down to canonical order, dropping duplicates
    pub fn ordered(selected: &[ManaColor]) -> Vec<ManaColor> {
        ManaColor::ALL
            .into_iter()
            .filter(|c| selected.contains(c))
            .collect()
    }
}

/// Classify a type line by its primary card type
///
/// Only the first face of a double-faced card counts, and only the words
/// before the em-dash. "Artifact Creature" files under Creature.
fn extract_primary_type(type_line: &str) -> &'static str {
    let face = type_line.split("//").next().unwrap_or("").trim();
    let main_part = face.split('\u{2014}').next().unwrap_or("").trim();
    let words: Vec<String> = main_part
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    let has = |word: &str| words.iter().any(|w| w == word);

    for ty in TYPE_PRIORITY {
        if !has(&ty.to_lowercase()) {
            continue;
        }
        if ty == "Artifact" && has("creature") {
            continue;
        }
        return ty;
    }

    UNKNOWN_TYPE
}

/// Bucket cards by primary type and order the groups for rendering
///
/// Priority types come first in their fixed order, then any other types
/// alphabetically, then `Unknown`.
pub fn group_by_type(cards: Vec<Card>) -> Vec<TypeGroup> {
    let mut buckets: HashMap<&'static str, Vec<Card>> = HashMap::new();
    for card in cards {
        buckets.entry(extract_primary_type(&card.type_line)).or_default().push(card);
    }
    order_groups(
        buckets
            .into_iter()
            .map(|(type_name, cards)| TypeGroup {
                type_name: type_name.to_string(),
                cards,
            })
            .collect(),
    )
}

/// Sort cards inside each group and put the groups in rendering order
fn order_groups(groups: Vec<TypeGroup>) -> Vec<TypeGroup> {
    let mut by_name: HashMap<String, TypeGroup> = HashMap::new();
    for mut group in groups {
        if group.cards.is_empty() {
            continue;
        }
        group
            .cards
            .sort_by(|a, b| a.key().cmp(&b.key()).then_with(|| a.name.cmp(&b.name)));
        match by_name.get_mut(&group.type_name) {
            Some(existing) => {
                existing.cards.extend(group.cards);
                existing
                    .cards
                    .sort_by(|a, b| a.key().cmp(&b.key()).then_with(|| a.name.cmp(&b.name)));
            }
            None => {
                by_name.insert(group.type_name.clone(), group);
            }
        }
    }

    let mut ordered = Vec::with_capacity(by_name.len());
    for ty in TYPE_PRIORITY {
        if let Some(group) = by_name.remove(ty) {
            ordered.push(group);
        }
    }
    let unknown = by_name.remove(UNKNOWN_TYPE);
    let others: BTreeMap<String, TypeGroup> = by_name.into_iter().collect();
    ordered.extend(others.into_values());
    ordered.extend(unknown);
    ordered
}
