use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::HashMap;

use crate::info::MapKeyKind;
use crate::ops::Value;

// -----------------------------------------------------------------------------
// MapKey

/// A map key: an integer or a string.
///
/// # Generic key order
///
/// [`Ord`] implements the *generic key order*: a total order that is
/// reproducible across runs and independent of any storage's iteration
/// order. Integer keys compare numerically (across widths and signedness),
/// string keys compare bytewise, and integers sort before strings.
///
/// # Examples
///
/// ```
/// use ld_reflect::ops::MapKey;
///
/// assert!(MapKey::from(-1_i64) < MapKey::from(2_u32));
/// assert!(MapKey::from(99_u64) < MapKey::from("0"));
/// assert!(MapKey::from("alpha") < MapKey::from("beta"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKey {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

impl MapKey {
    /// Reports whether this key matches the given declared key kind.
    pub fn matches(&self, kind: MapKeyKind) -> bool {
        matches!(
            (self, kind),
            (Self::I32(_), MapKeyKind::Int32)
                | (Self::I64(_), MapKeyKind::Int64)
                | (Self::U32(_), MapKeyKind::Uint32)
                | (Self::U64(_), MapKeyKind::Uint64)
                | (Self::String(_), MapKeyKind::String)
        )
    }

    fn numeric(&self) -> Option<i128> {
        match self {
            Self::I32(value) => Some(i128::from(*value)),
            Self::I64(value) => Some(i128::from(*value)),
            Self::U32(value) => Some(i128::from(*value)),
            Self::U64(value) => Some(i128::from(*value)),
            Self::String(_) => None,
        }
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self, other) {
                (Self::String(a), Self::String(b)) => a.as_bytes().cmp(b.as_bytes()),
                _ => Ordering::Equal,
            },
        }
    }
}

impl PartialOrd for MapKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Renders the bare string form of the key, without quoting.
impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(value) => write!(f, "{value}"),
            Self::I64(value) => write!(f, "{value}"),
            Self::U32(value) => write!(f, "{value}"),
            Self::U64(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<i32> for MapKey {
    #[inline]
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for MapKey {
    #[inline]
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u32> for MapKey {
    #[inline]
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u64> for MapKey {
    #[inline]
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<&str> for MapKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for MapKey {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

// -----------------------------------------------------------------------------
// MapValue

/// An unordered key/value collection.
///
/// Storage is a hash map whose iteration order is meaningless; consumers that
/// need a stable walk use [`iter_sorted`](Self::iter_sorted), which yields
/// entries in generic key order.
///
/// # Examples
///
/// ```
/// use ld_reflect::ops::MapValue;
///
/// let mut map = MapValue::new();
/// map.insert("beta", 2_i32);
/// map.insert("alpha", 1_i32);
///
/// let keys: Vec<_> = map.iter_sorted().map(|(k, _)| k.to_string()).collect();
/// assert_eq!(keys, ["alpha", "beta"]);
/// ```
#[derive(Debug, Default)]
pub struct MapValue {
    entries: HashMap<MapKey, Value>,
}

impl MapValue {
    /// Creates an empty `MapValue`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts a key/value pair, replacing any previous value for the key.
    #[inline]
    pub fn insert(&mut self, key: impl Into<MapKey>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for the given key, if present.
    #[inline]
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries in storage order.
    ///
    /// Storage order is unstable; use [`iter_sorted`](Self::iter_sorted)
    /// wherever the order can be observed.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Value)> {
        self.entries.iter()
    }

    /// Returns the entries in generic key order (see [`MapKey`]).
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&MapKey, &Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Tests
