use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Company;
use crate::domain::repo::{CompanyCriteria, CompanyQuery, CompanyRepository, SortField, SortKey};

/// Process-local company store.
///
/// Rows are kept in a concurrent map; list requests filter, sort and slice a
/// snapshot. Ties after the requested order are broken by id, and v7 ids sort
/// by creation time, so paging is stable.
#[derive(Debug, Default)]
pub struct InMemoryCompanyRepository {
    rows: DashMap<Uuid, Company>,
}

impl InMemoryCompanyRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matching(&self, criteria: &CompanyCriteria) -> Vec<Company> {
        self.rows
            .iter()
            .filter(|row| criteria.matches(row.value()))
            .map(|row| row.value().clone())
            .collect()
    }
}

fn compare_by(field: SortField, a: &Company, b: &Company) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Description => a.description.cmp(&b.description),
        SortField::AmountOfEmployees => a.amount_of_employees.cmp(&b.amount_of_employees),
        SortField::Registered => a.registered.cmp(&b.registered),
        SortField::Type => a.company_type.cmp(&b.company_type),
    }
}

fn compare(order: &[SortKey], a: &Company, b: &Company) -> Ordering {
    order
        .iter()
        .map(|key| {
            let ord = compare_by(key.field, a, b);
            if key.descending { ord.reverse() } else { ord }
        })
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.id.cmp(&b.id))
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Company>, DomainError> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn insert(&self, company: Company) -> Result<Company, DomainError> {
        match self.rows.entry(company.id) {
            Entry::Occupied(_) => Err(DomainError::validation(
                "id",
                "company with this id already exists",
            )),
            Entry::Vacant(slot) => {
                slot.insert(company.clone());
                Ok(company)
            }
        }
    }

    async fn replace(&self, company: Company) -> Result<Company, DomainError> {
        match self.rows.get_mut(&company.id) {
            Some(mut row) => {
                *row = company.clone();
                Ok(company)
            }
            None => Err(DomainError::company_not_found(company.id)),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.rows.remove(&id).is_some())
    }

    async fn list(&self, query: &CompanyQuery) -> Result<Vec<Company>, DomainError> {
        let mut rows = self.matching(&query.criteria);
        rows.sort_by(|a, b| compare(&query.order, a, b));

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, criteria: &CompanyCriteria) -> Result<u64, DomainError> {
        let matched = self
            .rows
            .iter()
            .filter(|row| criteria.matches(row.value()))
            .count();
        u64::try_from(matched).map_err(|e| DomainError::storage(e.to_string()))
    }
}
