//! Element ids.
//!
//! Saved templates carry ids as strings (`"title"`, `"imageSlot_7"`). They
//! are interned once on load so the store, selection and image cache key
//! on a `Copy` handle. Ids made by the editor are `<type>_<n>`; loading
//! re-assigns duplicates with [`ElementId::fresh`].

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Handle to an element id string. Equal handles mean equal strings.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// Look up an id without interning it. Ids that no element, template
    /// or history entry ever used return `None`.
    ///
    /// Use this for strings from outside (bridge calls, user input) so a
    /// mistyped id does not grow the interner.
    pub fn get(s: &str) -> Option<Self> {
        INTERNER.get(s).map(ElementId)
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Next `<prefix>_<n>` id. `n` counts up per process, so ids from a
    /// saved template may already use it; see [`ElementId::fresh`].
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }

    /// A `<prefix>_<n>` id for which `in_use` is false.
    pub fn fresh(prefix: &str, in_use: impl Fn(ElementId) -> bool) -> Self {
        loop {
            let id = Self::with_prefix(prefix);
            if !in_use(id) {
                return id;
            }
        }
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
