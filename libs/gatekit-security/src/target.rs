/// Static description of a resource type as seen by object-level checkers.
pub trait ResourceKind: Send + Sync + 'static {
    /// Human-readable resource name used in logs and error messages.
    const NAME: &'static str;

    /// A stored instance.
    type Entity: Send + Sync + 'static;
    /// The payload of a create request.
    type Create: Send + Sync + 'static;
    /// The descriptor of a list request.
    type Filter: Send + Sync + 'static;
}

/// What an object-level checker is asked about.
///
/// Create and list requests have no stored instance yet, so the checker sees
/// the request payload instead.
pub enum Target<'a, K: ResourceKind> {
    Create(&'a K::Create),
    Entity(&'a K::Entity),
    Filter(&'a K::Filter),
}

impl<K: ResourceKind> Target<'_, K> {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Create(_) => "create",
            Target::Entity(_) => "entity",
            Target::Filter(_) => "filter",
        }
    }
}

impl<K: ResourceKind> Clone for Target<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ResourceKind> Copy for Target<'_, K> {}

impl<K: ResourceKind> std::fmt::Debug for Target<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("resource", &K::NAME)
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
