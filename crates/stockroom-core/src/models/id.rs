//! Branded identifiers.
//!
//! `Id<E, V>` wraps a primitive `V` and tags it with the entity family `E`
//! it belongs to, so a `BookId` can never be compared against a `LoanId`
//! even though both wrap a `u64`. All comparison, hashing and serialization
//! go through the wrapped value only.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecordError;

pub struct Id<E, V> {
    value: V,
    _entity: PhantomData<fn() -> E>,
}

impl<E, V> Id<E, V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            _entity: PhantomData,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_inner(self) -> V {
        self.value
    }
}

impl<E> Id<E, String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<E> Id<E, u64> {
    pub fn get(&self) -> u64 {
        self.value
    }
}

impl<E, V> From<V> for Id<E, V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<E> From<&str> for Id<E, String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

// Manual impls: derives would demand bounds on `E`, which is only a tag.

impl<E, V: Clone> Clone for Id<E, V> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<E, V: Copy> Copy for Id<E, V> {}

impl<E, V: PartialEq> PartialEq for Id<E, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<E, V: Eq> Eq for Id<E, V> {}

impl<E, V: PartialOrd> PartialOrd for Id<E, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<E, V: Ord> Ord for Id<E, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<E, V: Hash> Hash for Id<E, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<E, V: fmt::Debug> fmt::Debug for Id<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<E, V: fmt::Display> fmt::Display for Id<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<E, V: Serialize> Serialize for Id<E, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, E, V: Deserialize<'de>> Deserialize<'de> for Id<E, V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        V::deserialize(deserializer).map(Self::new)
    }
}

// ============================================================================
// Id sequences
// ============================================================================

/// Ids that can be derived from the last stored one.
pub trait NextId: Sized {
    /// Id used when the collection is empty.
    fn first() -> Self;

    fn successor(&self) -> Result<Self, RecordError>;
}

impl<E> NextId for Id<E, u64> {
    fn first() -> Self {
        Self::new(1)
    }

    fn successor(&self) -> Result<Self, RecordError> {
        self.value
            .checked_add(1)
            .map(Self::new)
            .ok_or_else(|| RecordError::InvalidValue(format!("id {} cannot be incremented", self.value)))
    }
}

/// Entity families whose string ids are a fixed prefix plus a zero-padded counter.
pub trait IdPrefix {
    const PREFIX: &'static str;
    const WIDTH: usize = 3;
}

impl<E: IdPrefix> Id<E, String> {
    fn numbered(n: u64) -> Self {
        Self::new(format!("{}{:0width$}", E::PREFIX, n, width = E::WIDTH))
    }
}

impl<E: IdPrefix> NextId for Id<E, String> {
    fn first() -> Self {
        Self::numbered(1)
    }

    fn successor(&self) -> Result<Self, RecordError> {
        let digits = self.value.strip_prefix(E::PREFIX).ok_or_else(|| {
            RecordError::InvalidValue(format!(
                "id {:?} does not start with {:?}",
                self.value,
                E::PREFIX
            ))
        })?;
        let n: u64 = digits.parse().map_err(|_| {
            RecordError::InvalidValue(format!("id {:?} has no numeric counter", self.value))
        })?;
        Ok(Self::numbered(n + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Widget;
    struct Gadget;

    impl IdPrefix for Gadget {
        const PREFIX: &'static str = "GDG";
    }

    type WidgetId = Id<Widget, u64>;
    type GadgetId = Id<Gadget, String>;

    #[test]
    fn test_equality_follows_value() {
        assert_eq!(WidgetId::new(4), WidgetId::new(4));
        assert_ne!(WidgetId::new(4), WidgetId::new(5));

        let mut set = HashSet::new();
        set.insert(GadgetId::from("GDG001"));
        assert!(set.contains(&GadgetId::from("GDG001")));
    }

    #[test]
    fn test_serializes_as_bare_primitive() {
        assert_eq!(serde_json::to_string(&WidgetId::new(12)).unwrap(), "12");
        let id: GadgetId = serde_json::from_str("\"GDG042\"").unwrap();
        assert_eq!(id.as_str(), "GDG042");
    }

    #[test]
    fn test_numeric_sequence() {
        assert_eq!(WidgetId::first().get(), 1);
        assert_eq!(WidgetId::new(41).successor().unwrap().get(), 42);
        assert!(WidgetId::new(u64::MAX).successor().is_err());
    }

    #[test]
    fn test_prefixed_sequence() {
        assert_eq!(GadgetId::first().as_str(), "GDG001");
        assert_eq!(GadgetId::from("GDG000").successor().unwrap().as_str(), "GDG001");
        assert_eq!(GadgetId::from("GDG009").successor().unwrap().as_str(), "GDG010");
        // Wider counters are not truncated
        assert_eq!(GadgetId::from("GDG999").successor().unwrap().as_str(), "GDG1000");
    }

    #[test]
    fn test_prefixed_sequence_rejects_foreign_ids() {
        assert!(matches!(
            GadgetId::from("XYZ001").successor(),
            Err(RecordError::InvalidValue(_))
        ));
        assert!(matches!(
            GadgetId::from("GDGabc").successor(),
            Err(RecordError::InvalidValue(_))
        ));
    }
}
