//! # Display Indexes
//!
//! Collections and cards are stored under UUIDs, which are unpleasant to type.
//! The CLI addresses them by their 1-based position in a listing instead:
//! collections newest first, cards in collection order.
//!
//! A [`Selector`] is what the user typed. It is either such a position or a
//! UUID (full or a unique prefix of at least four characters), so scripts can
//! keep using stable ids while people use the short numbers.
//!
//! Positions are recomputed on every call, so `1` always means "the newest
//! collection right now".
//!
//! A UUID prefix can be all digits. Such input is read as a position first; if
//! no item has that position the digits are tried as an id prefix. Digits with
//! a leading zero (e.g. `0421`) are always an id prefix.

use crate::model::CollectionMeta;
use crate::store::sort_newest_first;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Index(usize),
    Id(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(i) => write!(f, "{}", i),
            Selector::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let zero_led_id = s.len() >= MIN_ID_PREFIX && s.starts_with('0');
        if let (false, Ok(n)) = (zero_led_id, s.parse::<usize>()) {
            if n == 0 {
                return Err("Indexes start at 1".to_string());
            }
            return Ok(Selector::Index(n));
        }
        let is_id_like = s.len() >= MIN_ID_PREFIX
            && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
        if is_id_like {
            return Ok(Selector::Id(s.to_ascii_lowercase()));
        }
        Err(format!("Invalid index or id: {}", s))
    }
}

/// A collection with the position it has in the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedCollection {
    pub index: usize,
    pub metadata: CollectionMeta,
}

/// Orders `metas` newest first and numbers them from 1.
pub fn index_collections(mut metas: Vec<CollectionMeta>) -> Vec<IndexedCollection> {
    sort_newest_first(&mut metas);
    metas
        .into_iter()
        .enumerate()
        .map(|(i, metadata)| IndexedCollection {
            index: i + 1,
            metadata,
        })
        .collect()
}

/// Zero-based position of the item `selector` points at.
///
/// `id_of` extracts the id that [`Selector::Id`] prefixes are matched against.
pub fn position<T>(
    items: &[T],
    selector: &Selector,
    id_of: impl Fn(&T) -> Uuid,
) -> Result<usize, String> {
    match selector {
        Selector::Index(n) if *n >= 1 && *n <= items.len() => Ok(n - 1),
        Selector::Index(n) => {
            let digits = n.to_string();
            if digits.len() >= MIN_ID_PREFIX {
                if let Ok(pos) = match_prefix(items, &digits, &id_of) {
                    return Ok(pos);
                }
            }
            Err(format!("Index {} not found", n))
        }
        Selector::Id(prefix) => match_prefix(items, prefix, &id_of),
    }
}

fn match_prefix<T>(
    items: &[T],
    prefix: &str,
    id_of: &impl Fn(&T) -> Uuid,
) -> Result<usize, String> {
    let mut hits = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).to_string().starts_with(prefix));
    match (hits.next(), hits.next()) {
        (Some((pos, _)), None) => Ok(pos),
        (None, _) => Err(format!("No match for id {}", prefix)),
        (Some(_), Some(_)) => Err(format!("Id prefix {} is ambiguous", prefix)),
    }
}
