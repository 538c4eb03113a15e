use std::fmt::Debug;
use std::hash::Hash;

/// A coarse capability tag, e.g. `company_create`.
///
/// Implemented by a small fieldless enum per resource type. The full set is
/// known at compile time so that policy tables can be checked for gaps at
/// startup.
pub trait OperationId: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every operation the resource exposes.
    fn all() -> &'static [Self];

    /// Stable identifier used in configuration and logs.
    fn as_str(&self) -> &'static str;

    /// Looks an operation up by its [`as_str`](Self::as_str) name.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.as_str() == name)
    }
}
