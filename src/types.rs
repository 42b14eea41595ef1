//! Card and set records, and the enumerations the label helpers understand.
//!
//! Records are kept close to their on-disk JSON: the fields the build itself
//! needs (`id`, `name`, `set`) are read out into typed fields, and the whole
//! document stays in `fields`, in file order, to be handed to templates
//! untouched. Enumerated fields such as
//! `type` or `rarity` stay raw strings on the record and are only interpreted
//! when a template asks for a label, so an unknown value surfaces as a
//! [`LookupError`] at render time instead of rejecting the whole catalog.

use serde::{Deserialize, Serialize, de};
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

/// A record kind loaded from its own directory.
///
/// Implemented by [`Card`] and [`Set`] so the loader can key either by id.
pub trait Record: serde::de::DeserializeOwned {
    /// Human-readable kind used in error messages and CLI output.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// A single card, one per physical card.
///
/// `fields` is the whole document as read, in file order, typed keys
/// included. It is what templates receive, so `repr(card)` and
/// `card.items()` see the file unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Card {
    pub id: String,
    /// Display name; shared by reprints of the same card.
    pub name: String,
    /// Id of the owning set. Resolved at render time.
    pub set: Option<String>,
    pub fields: Map<String, Value>,
}

impl Record for Card {
    const KIND: &'static str = "card";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Card {
    /// Raw string value of a document field, if present and a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Map<String, Value>> for Card {
    type Error = serde_json::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Card {
            id: required_str(&fields, "id")?,
            name: required_str(&fields, "name")?,
            set: optional_str(&fields, "set")?,
            fields,
        })
    }
}

impl From<Card> for Map<String, Value> {
    fn from(card: Card) -> Self {
        card.fields
    }
}

/// A named release of cards. `fields` holds the whole document, as on [`Card`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Set {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Record for Set {
    const KIND: &'static str = "set";

    fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<Map<String, Value>> for Set {
    type Error = serde_json::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Set {
            id: required_str(&fields, "id")?,
            fields,
        })
    }
}

impl From<Set> for Map<String, Value> {
    fn from(set: Set) -> Self {
        set.fields
    }
}

fn optional_str(
    fields: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, serde_json::Error> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(de::Error::custom(format!("field `{key}` must be a string"))),
    }
}

fn required_str(fields: &Map<String, Value>, key: &'static str) -> Result<String, serde_json::Error> {
    optional_str(fields, key)?.ok_or_else(|| de::Error::missing_field(key))
}

/// An enumerated card field held a value with no label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown {field} `{value}`")]
    Unknown { field: &'static str, value: String },
    #[error("missing {field}")]
    Missing { field: &'static str },
}

impl LookupError {
    fn unknown(field: &'static str, value: &str) -> Self {
        LookupError::Unknown {
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Action,
    Dragon,
    Terrain,
    Treasure,
}

impl CardType {
    pub const ALL: [CardType; 4] = [
        CardType::Action,
        CardType::Dragon,
        CardType::Terrain,
        CardType::Treasure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Action => "action",
            CardType::Dragon => "dragon",
            CardType::Terrain => "terrain",
            CardType::Treasure => "treasure",
        }
    }
}

impl FromStr for CardType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LookupError::unknown("card type", s))
    }
}

/// Subtype of an `action` card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSubtype {
    Action,
    BattleAction,
    Reaction,
    BattleReaction,
    SlayerAction,
    HiddenAction,
    InterceptAction,
}

impl ActionSubtype {
    pub const ALL: [ActionSubtype; 7] = [
        ActionSubtype::Action,
        ActionSubtype::BattleAction,
        ActionSubtype::Reaction,
        ActionSubtype::BattleReaction,
        ActionSubtype::SlayerAction,
        ActionSubtype::HiddenAction,
        ActionSubtype::InterceptAction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionSubtype::Action => "action",
            ActionSubtype::BattleAction => "battle_action",
            ActionSubtype::Reaction => "reaction",
            ActionSubtype::BattleReaction => "battle_reaction",
            ActionSubtype::SlayerAction => "slayer_action",
            ActionSubtype::HiddenAction => "hidden_action",
            ActionSubtype::InterceptAction => "intercept_action",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionSubtype::Action => "Action",
            ActionSubtype::BattleAction => "Battle Action",
            ActionSubtype::Reaction => "Reaction",
            ActionSubtype::BattleReaction => "Battle Reaction",
            ActionSubtype::SlayerAction => "Dragon Slayer Action",
            ActionSubtype::HiddenAction => "Hidden Action",
            ActionSubtype::InterceptAction => "Intercept Action",
        }
    }
}

impl FromStr for ActionSubtype {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionSubtype::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LookupError::unknown("action subtype", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Promo,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Promo];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Promo => "promo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Promo => "Promotional",
        }
    }
}

impl FromStr for Rarity {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| LookupError::unknown("rarity", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Flying,
    Scout,
    SuperFlying,
    Subterranean,
}

impl Ability {
    pub const ALL: [Ability; 4] = [
        Ability::Flying,
        Ability::Scout,
        Ability::SuperFlying,
        Ability::Subterranean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Flying => "flying",
            Ability::Scout => "scout",
            Ability::SuperFlying => "super_flying",
            Ability::Subterranean => "subterranean",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Ability::Flying => "FLYING",
            Ability::Scout => "SCOUT",
            Ability::SuperFlying => "SUPER FLYER",
            Ability::Subterranean => "SUBTERRANEAN",
        }
    }
}

impl FromStr for Ability {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| LookupError::unknown("ability", s))
    }
}

/// Label for a card's type line.
///
/// Action cards are labelled by their subtype; every other type by the type
/// itself. An action card without a subtype has no label.
pub fn card_type_label(
    kind: CardType,
    subtype: Option<ActionSubtype>,
) -> Result<&'static str, LookupError> {
    match kind {
        CardType::Action => subtype
            .map(ActionSubtype::label)
            .ok_or(LookupError::Missing {
                field: "action subtype",
            }),
        CardType::Dragon => Ok("Dragon"),
        CardType::Terrain => Ok("Terrain"),
        CardType::Treasure => Ok("Treasure"),
    }
}

/// Parse raw `type`/`subtype` strings and label them.
///
/// The subtype is only read for action cards, so stray subtypes on other
/// types are ignored.
pub fn card_type_string(kind: Option<&str>, subtype: Option<&str>) -> Result<&'static str, LookupError> {
    let kind: CardType = kind
        .ok_or(LookupError::Missing { field: "card type" })?
        .parse()?;
    let subtype = match kind {
        CardType::Action => Some(
            subtype
                .ok_or(LookupError::Missing {
                    field: "action subtype",
                })?
                .parse::<ActionSubtype>()?,
        ),
        _ => None,
    };
    card_type_label(kind, subtype)
}

pub fn rarity_string(rarity: Option<&str>) -> Result<&'static str, LookupError> {
    let rarity: Rarity = rarity
        .ok_or(LookupError::Missing { field: "rarity" })?
        .parse()?;
    Ok(rarity.label())
}

pub fn ability_string(ability: &str) -> Result<&'static str, LookupError> {
    Ok(ability.parse::<Ability>()?.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_subtype_has_a_label() {
        for subtype in ActionSubtype::ALL {
            let label = card_type_string(Some("action"), Some(subtype.as_str())).unwrap();
            assert!(!label.is_empty());
            assert_eq!(label, subtype.label());
        }
    }

    #[test]
    fn action_labels_match_table() {
        assert_eq!(
            card_type_string(Some("action"), Some("battle_action")),
            Ok("Battle Action")
        );
        assert_eq!(
            card_type_string(Some("action"), Some("slayer_action")),
            Ok("Dragon Slayer Action")
        );
        assert_eq!(
            card_type_string(Some("action"), Some("intercept_action")),
            Ok("Intercept Action")
        );
    }

    #[test]
    fn non_action_types_label_themselves() {
        assert_eq!(card_type_string(Some("dragon"), None), Ok("Dragon"));
        assert_eq!(card_type_string(Some("terrain"), None), Ok("Terrain"));
        assert_eq!(card_type_string(Some("treasure"), None), Ok("Treasure"));
    }

    #[test]
    fn non_action_type_ignores_subtype() {
        assert_eq!(
            card_type_string(Some("dragon"), Some("not-a-subtype")),
            Ok("Dragon")
        );
    }

    #[test]
    fn action_without_subtype_is_error() {
        assert_eq!(
            card_type_string(Some("action"), None),
            Err(LookupError::Missing {
                field: "action subtype"
            })
        );
    }

    #[test]
    fn unknown_type_is_error() {
        let err = card_type_string(Some("wizard"), None).unwrap_err();
        assert_eq!(err.to_string(), "unknown card type `wizard`");
    }

    #[test]
    fn unknown_subtype_is_error() {
        let err = card_type_string(Some("action"), Some("combo")).unwrap_err();
        assert!(matches!(err, LookupError::Unknown { value, .. } if value == "combo"));
    }

    #[test]
    fn rarity_labels() {
        assert_eq!(rarity_string(Some("common")), Ok("Common"));
        assert_eq!(rarity_string(Some("uncommon")), Ok("Uncommon"));
        assert_eq!(rarity_string(Some("rare")), Ok("Rare"));
        assert_eq!(rarity_string(Some("promo")), Ok("Promotional"));
    }

    #[test]
    fn unknown_rarity_does_not_fall_back() {
        assert!(rarity_string(Some("mythic")).is_err());
        assert!(rarity_string(None).is_err());
    }

    #[test]
    fn ability_labels() {
        assert_eq!(ability_string("flying"), Ok("FLYING"));
        assert_eq!(ability_string("scout"), Ok("SCOUT"));
        assert_eq!(ability_string("super_flying"), Ok("SUPER FLYER"));
        assert_eq!(ability_string("subterranean"), Ok("SUBTERRANEAN"));
        assert!(ability_string("FLYING").is_err());
    }

    #[test]
    fn card_keeps_opaque_fields() {
        let card: Card = serde_json::from_str(
            r#"{"id": "a1", "name": "Dragon Whelp", "set": "core", "rarity": "rare", "cost": 3}"#,
        )
        .unwrap();
        assert_eq!(card.set.as_deref(), Some("core"));
        assert_eq!(card.field_str("rarity"), Some("rare"));
        assert_eq!(card.fields.get("cost"), Some(&Value::from(3)));

        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["cost"], 3);
        assert_eq!(back["set"], "core");
    }

    #[test]
    fn card_serializes_in_file_order() {
        let card: Card = serde_json::from_str(
            r#"{"type": "dragon", "rarity": "common", "name": "Whelp", "set": "core", "id": "k1"}"#,
        )
        .unwrap();
        assert_eq!(card.id, "k1");

        let back = serde_json::to_value(&card).unwrap();
        let keys: Vec<&str> = back.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["type", "rarity", "name", "set", "id"]);
    }

    #[test]
    fn card_with_non_string_name_is_error() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"id": "a1", "name": 7}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("`name`"));
    }

    #[test]
    fn set_keeps_whole_document() {
        let set: Set = serde_json::from_str(r#"{"name": "Core Set", "id": "core"}"#).unwrap();
        assert_eq!(set.id, "core");
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"{"name":"Core Set","id":"core"}"#);
    }

    #[test]
    fn card_without_set_still_parses() {
        let card: Card = serde_json::from_str(r#"{"id": "a1", "name": "Orphan"}"#).unwrap();
        assert_eq!(card.set, None);
    }

    #[test]
    fn card_requires_id() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"name": "Nameless"}"#);
        assert!(result.is_err());
    }
}
