//! Store key namespacing.

use uuid::Uuid;

/// A caller key scoped to one limiter instance.
///
/// Several independently configured limiters can share a physical store;
/// prefixing the caller key with the owning instance's id keeps their
/// records from colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedKey {
    /// Id of the limiter instance that owns the record
    pub instance: Uuid,
    /// The caller-supplied key
    pub key: String,
}

impl NamespacedKey {
    /// Scope a caller key to a limiter instance.
    pub fn new(instance: Uuid, key: &str) -> Self {
        Self {
            instance,
            key: key.to_string(),
        }
    }

    /// The string form used as the store key.
    pub fn to_string_key(&self) -> String {
        format!("{}-{}", self.instance, self.key)
    }
}

impl std::fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_key())
    }
}
