use crate::common::*;
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifies one term of an evaluation: the term's canonical text plus how
/// many earlier terms shared that text. Displays as `text(occurrence)`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TermKey {
    pub base: String,
    pub occurrence: usize,
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.base, self.occurrence)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("invalid metadata key: {0:?}")]
pub struct InvalidKey(pub String);

impl FromStr for TermKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidKey(s.to_string());
        let (base, rest) = s.rsplit_once('(').ok_or_else(invalid)?;
        let occurrence = rest
            .strip_suffix(')')
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?;
        Ok(Self {
            base: base.to_string(),
            occurrence,
        })
    }
}

/// How one literal resolved. Integer literals have no rolls.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub literal: String,
    pub tags: Vec<String>,
    pub raw_rolls: Vec<UInt>,
    pub final_rolls: Vec<UInt>,
    pub value: Int,
    /// Indices into `raw_rolls` of the dice a keep operator dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<usize>,
}

impl Resolution {
    pub(crate) fn integer(literal: &str, tags: &[&str], value: Int) -> Self {
        Self {
            literal: literal.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            raw_rolls: Vec::new(),
            final_rolls: Vec::new(),
            value,
            dropped: Vec::new(),
        }
    }

    pub(crate) fn dice(
        literal: String,
        tags: &[&str],
        raw_rolls: NonEmpty<UInt>,
        final_rolls: NonEmpty<UInt>,
        value: Int,
        dropped: Vec<usize>,
    ) -> Self {
        Self {
            literal,
            tags: tags.iter().map(ToString::to_string).collect(),
            raw_rolls: raw_rolls.into_vec(),
            final_rolls: final_rolls.into_vec(),
            value,
            dropped,
        }
    }

    pub fn is_dice(&self) -> bool {
        !self.raw_rolls.is_empty()
    }

    /// Whether the final rolls are exactly the raw rolls that were not
    /// dropped, i.e. no clamp changed a kept die.
    pub fn only_dropped(&self) -> bool {
        let kept = self
            .raw_rolls
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.dropped.contains(i))
            .map(|(_, x)| x);
        kept.eq(self.final_rolls.iter())
    }
}

/// The terms of one evaluation, in the order they were resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(TermKey, Resolution)>,
}

impl Metadata {
    /// Records a term under the first free occurrence of `base`.
    pub(crate) fn record(&mut self, base: String, resolution: Resolution) -> TermKey {
        let occurrence = self.entries.iter().filter(|(key, _)| key.base == base).count();
        let key = TermKey { base, occurrence };
        self.entries.push((key.clone(), resolution));
        key
    }

    /// Looks a term up by its display key, e.g. `"2d6(0)"`.
    pub fn get(&self, key: &str) -> Option<&Resolution> {
        let key = key.parse::<TermKey>().ok()?;
        self.get_key(&key)
    }

    pub fn get_key(&self, key: &TermKey) -> Option<&Resolution> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TermKey, &Resolution)> + '_ {
        self.entries.iter().map(|(k, r)| (k, r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &TermKey> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, resolution) in &self.entries {
            map.serialize_entry(&key.to_string(), resolution)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MetadataVisitor)
    }
}

struct MetadataVisitor;

impl<'de> de::Visitor<'de> for MetadataVisitor {
    type Value = Metadata;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from term keys to resolutions")
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(TermKey, Resolution)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, resolution)) = access.next_entry::<String, Resolution>()? {
            let key: TermKey = key.parse().map_err(de::Error::custom)?;
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(de::Error::custom(format!("duplicate metadata key {}", key)));
            }
            entries.push((key, resolution));
        }
        Ok(Metadata { entries })
    }
}
