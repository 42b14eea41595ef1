//! Functions callable from templates.
//!
//! The label helpers turn raw enum strings on a card into display text and
//! fail the render on anything they don't recognize. The remaining helpers
//! (`len`, `list`, `repr`) give templates the Python built-ins the page
//! templates were written against.
//!
//! | Function | Example | Result |
//! |----------|---------|--------|
//! | `card_type_string(card)` | action / battle_action | `Battle Action` |
//! | `rarity_string(card)` | promo | `Promotional` |
//! | `ability_string(card, ability)` | super_flying | `SUPER FLYER` |
//! | `len(x)` | `len(cards)` | number of cards |
//! | `list(x)` | `list(sets)` | set ids |
//! | `repr(x)` | `repr(card.id)` | `'a1'` |

use crate::types::{self, LookupError};
use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, Error, ErrorKind};

/// Bind every helper into `env`.
pub fn register(env: &mut Environment<'_>) {
    env.add_function("card_type_string", card_type_string);
    env.add_function("rarity_string", rarity_string);
    env.add_function("ability_string", ability_string);
    env.add_function("len", len);
    env.add_function("list", list);
    env.add_function("repr", repr);
}

fn lookup_error(err: LookupError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

fn card_type_string(card: Value) -> Result<&'static str, Error> {
    let kind = card.get_attr("type")?;
    let subtype = card.get_attr("subtype")?;
    types::card_type_string(kind.as_str(), subtype.as_str()).map_err(lookup_error)
}

fn rarity_string(card: Value) -> Result<&'static str, Error> {
    let rarity = card.get_attr("rarity")?;
    types::rarity_string(rarity.as_str()).map_err(lookup_error)
}

// The card argument is unused; templates pass it for symmetry with the others.
fn ability_string(_card: Value, ability: &str) -> Result<&'static str, Error> {
    types::ability_string(ability).map_err(lookup_error)
}

fn len(value: Value) -> Result<usize, Error> {
    value.len().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("object of type {} has no len()", value.kind()),
        )
    })
}

/// Sequences and strings are listed item by item; maps by key.
fn list(value: Value) -> Result<Value, Error> {
    Ok(Value::from(value.try_iter()?.collect::<Vec<_>>()))
}

fn repr(value: Value) -> Result<String, Error> {
    python_repr(&value)
}

fn python_repr(value: &Value) -> Result<String, Error> {
    Ok(match value.kind() {
        ValueKind::Undefined => {
            return Err(Error::new(
                ErrorKind::UndefinedError,
                "repr() of an undefined value",
            ));
        }
        ValueKind::None => "None".to_string(),
        ValueKind::Bool => String::from(if value.is_true() { "True" } else { "False" }),
        ValueKind::String => quote(value.as_str().unwrap_or_default()),
        ValueKind::Seq => {
            let items = value
                .try_iter()?
                .map(|item| python_repr(&item))
                .collect::<Result<Vec<_>, _>>()?;
            format!("[{}]", items.join(", "))
        }
        ValueKind::Map => {
            let mut items = Vec::new();
            for key in value.try_iter()? {
                let item = value.get_item(&key)?;
                items.push(format!("{}: {}", python_repr(&key)?, python_repr(&item)?));
            }
            format!("{{{}}}", items.join(", "))
        }
        _ => value.to_string(),
    })
}

/// Quote a string the way Python's `repr` does: single quotes unless the
/// text contains a single quote and no double quote.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}
