use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide table of element id strings. Every `ElementId` indexes into it.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifies one element of the layout, both in the store and in the
/// persisted record. Copies are cheap, so ids are passed by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// The id for `s`. Equal strings always yield equal ids.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// The id text, e.g. `element-1718000000000-42`.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Trailing `-`-separated segment, used for class names and compact display.
    ///
    /// `element-1718000000000-42` → `42`. An id without a `-` is its own short id.
    pub fn short_id(&self) -> &str {
        let s = self.as_str();
        s.rsplit('-').next().unwrap_or(s)
    }

    /// Generate a fresh id of the form `element-{millis}-{n}`.
    ///
    /// `n` comes from a process-wide counter, so two calls never return the
    /// same id. Short-id uniqueness against a loaded collection is the
    /// store's concern.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::intern(&format!("element-{millis}-{n}"))
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("element-1-7");
        let b = ElementId::intern("element-1-7");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "element-1-7");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ElementId::generate();
        let b = ElementId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("element-"));
    }

    #[test]
    fn short_id_is_trailing_segment() {
        assert_eq!(ElementId::intern("element-1718000000000-42").short_id(), "42");
        assert_eq!(ElementId::intern("hero").short_id(), "hero");
    }
}
