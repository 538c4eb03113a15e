use std::fmt;

use serde::{Deserialize, Serialize};

use crate::subject::Subject;
use crate::target::{ResourceKind, Target};

/// Operation-level predicate. Must be pure.
pub trait Checker: Send + Sync {
    fn allows(&self, subject: Option<&Subject>) -> bool;

    /// Label used in debug logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Object-level predicate. Sees the concrete request object.
pub trait ObjectChecker<K: ResourceKind>: Send + Sync {
    fn allows(&self, subject: Option<&Subject>, target: Target<'_, K>) -> bool;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Checker for F
where
    F: Fn(Option<&Subject>) -> bool + Send + Sync,
{
    fn allows(&self, subject: Option<&Subject>) -> bool {
        self(subject)
    }
}

impl<K, F> ObjectChecker<K> for F
where
    K: ResourceKind,
    F: Fn(Option<&Subject>, Target<'_, K>) -> bool + Send + Sync,
{
    fn allows(&self, subject: Option<&Subject>, target: Target<'_, K>) -> bool {
        self(subject, target)
    }
}

/// The stock checkers. Usable at both levels; at object level they ignore the
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    /// Always allows.
    Anybody,
    /// Allows any authenticated caller.
    User,
    /// Always denies.
    Nobody,
    /// Allows callers whose `admin` claim is boolean `true`.
    Admin,
}

impl Builtin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Builtin::Anybody => "anybody",
            Builtin::User => "user",
            Builtin::Nobody => "nobody",
            Builtin::Admin => "admin",
        }
    }

    #[must_use]
    pub fn check(self, subject: Option<&Subject>) -> bool {
        match self {
            Builtin::Anybody => true,
            Builtin::User => subject.is_some(),
            Builtin::Nobody => false,
            Builtin::Admin => subject.is_some_and(Subject::is_admin),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Checker for Builtin {
    fn allows(&self, subject: Option<&Subject>) -> bool {
        self.check(subject)
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

impl<K: ResourceKind> ObjectChecker<K> for Builtin {
    fn allows(&self, subject: Option<&Subject>, _target: Target<'_, K>) -> bool {
        self.check(subject)
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}
