//! Secondary lookups derived from the catalog.
//!
//! The name index groups reprints: every card sharing a display name, in load
//! order, so a card page can list its other printings. The id lists feed the
//! published manifests.

use crate::load::Catalog;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteIndex {
    /// Display name → ids of every card with that name, in load order.
    pub cards_by_name: IndexMap<String, Vec<String>>,
    pub card_ids: Vec<String>,
    pub set_ids: Vec<String>,
}

impl SiteIndex {
    /// Names printed on more than one card, with their ids.
    pub fn reprints(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.cards_by_name
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }
}

pub fn build_index(catalog: &Catalog) -> SiteIndex {
    let mut cards_by_name: IndexMap<String, Vec<String>> = IndexMap::new();
    for card in catalog.cards.values() {
        cards_by_name
            .entry(card.name.clone())
            .or_default()
            .push(card.id.clone());
    }

    SiteIndex {
        cards_by_name,
        card_ids: catalog.cards.ids().map(String::from).collect(),
        set_ids: catalog.sets.ids().map(String::from).collect(),
    }
}
