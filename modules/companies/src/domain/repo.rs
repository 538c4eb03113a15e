use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Company, CompanyType};

/// Sortable company columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    UpdatedAt,
    CreatedAt,
    Name,
    Description,
    AmountOfEmployees,
    Registered,
    Type,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Id,
        SortField::UpdatedAt,
        SortField::CreatedAt,
        SortField::Name,
        SortField::Description,
        SortField::AmountOfEmployees,
        SortField::Registered,
        SortField::Type,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::UpdatedAt => "updated_at",
            SortField::CreatedAt => "created_at",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::AmountOfEmployees => "amount_of_employees",
            SortField::Registered => "registered",
            SortField::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {dir}", self.field.as_str())
    }
}

/// Validated selection part of a list request. Paging is not part of it, so
/// the same criteria drive both `list` and `count`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyCriteria {
    pub ids: Vec<Uuid>,
    /// Lowercased needle matched against name and description
    pub search: Option<String>,
    pub types: Vec<CompanyType>,
    pub registered: Option<bool>,
}

impl CompanyCriteria {
    #[must_use]
    pub fn matches(&self, company: &Company) -> bool {
        if !self.ids.is_empty() && !self.ids.contains(&company.id) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&company.company_type) {
            return false;
        }
        if let Some(registered) = self.registered
            && company.registered != registered
        {
            return false;
        }
        match &self.search {
            Some(needle) => {
                company.name.to_lowercase().contains(needle.as_str())
                    || company.description.to_lowercase().contains(needle.as_str())
            }
            None => true,
        }
    }
}

/// A fully resolved page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyQuery {
    pub criteria: CompanyCriteria,
    pub order: Vec<SortKey>,
    pub offset: u64,
    pub limit: u64,
}

/// Persistence port for companies.
///
/// Implementations store what they are given; ids, timestamps and validation
/// are the service's job.
#[async_trait]
pub trait CompanyRepository: Send + Sync + 'static {
    async fn find(&self, id: Uuid) -> Result<Option<Company>, DomainError>;

    async fn insert(&self, company: Company) -> Result<Company, DomainError>;

    /// Overwrite an existing company.
    ///
    /// Fails with `CompanyNotFound` if the id is unknown.
    async fn replace(&self, company: Company) -> Result<Company, DomainError>;

    /// Returns `false` if nothing was removed.
    async fn remove(&self, id: Uuid) -> Result<bool, DomainError>;

    async fn list(&self, query: &CompanyQuery) -> Result<Vec<Company>, DomainError>;

    async fn count(&self, criteria: &CompanyCriteria) -> Result<u64, DomainError>;
}
