use std::sync::Arc;

use async_trait::async_trait;
use gatekit::{GateError, ResourceStore};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::CompaniesConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{Company, CompanyCreate, CompanyFilter, CompanyKind, CompanyUpdate};
use crate::domain::repo::{CompanyCriteria, CompanyQuery, CompanyRepository};
use crate::domain::validation::{parse_order_by, validate_create, validate_update};

/// Business logic for companies on top of a [`CompanyRepository`].
///
/// Validates payloads, assigns ids and timestamps, and resolves list filters
/// into pages. Authorization is not its concern; the gate calls it only after
/// both policy levels allowed the request.
pub struct CompanyService<R> {
    repo: Arc<R>,
    config: CompaniesConfig,
}

impl<R: CompanyRepository> CompanyService<R> {
    #[must_use]
    pub fn new(repo: Arc<R>, config: CompaniesConfig) -> Self {
        Self { repo, config }
    }

    /// Turn a raw filter into a validated page request.
    ///
    /// # Errors
    /// Returns a validation error for a zero page size or an unknown
    /// `order_by` entry.
    pub fn resolve_query(&self, filter: &CompanyFilter) -> Result<CompanyQuery, DomainError> {
        let limit = match filter.page_size {
            Some(0) => {
                return Err(DomainError::validation(
                    "page_size",
                    "must be greater than zero",
                ));
            }
            Some(size) => size.min(self.config.max_page_size),
            None => self.config.default_page_size,
        };
        let offset = match filter.page_number {
            Some(page) if page > 1 => (page - 1).saturating_mul(limit),
            _ => 0,
        };

        Ok(CompanyQuery {
            criteria: criteria_of(filter),
            order: parse_order_by(&filter.order_by)?,
            offset,
            limit,
        })
    }
}

fn criteria_of(filter: &CompanyFilter) -> CompanyCriteria {
    CompanyCriteria {
        ids: filter.ids.clone(),
        search: filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase),
        types: filter.types.clone(),
        registered: filter.registered,
    }
}

#[async_trait]
impl<R: CompanyRepository> ResourceStore for CompanyService<R> {
    type Kind = CompanyKind;
    type Id = Uuid;
    type Update = CompanyUpdate;

    fn entity_id(entity: &Company) -> Uuid {
        entity.id
    }

    fn update_target(patch: &CompanyUpdate) -> Uuid {
        patch.id
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &Uuid) -> Result<Company, GateError> {
        debug!("Getting company by id");
        let company = self
            .repo
            .find(*id)
            .await?
            .ok_or_else(|| DomainError::company_not_found(*id))?;
        Ok(company)
    }

    #[instrument(skip_all, fields(name = %payload.name))]
    async fn create(&self, payload: CompanyCreate) -> Result<Company, GateError> {
        validate_create(&payload)?;

        let now = OffsetDateTime::now_utc();
        let company = Company {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            name: payload.name,
            description: payload.description,
            amount_of_employees: payload.amount_of_employees,
            registered: payload.registered,
            company_type: payload.company_type,
        };

        let company = self.repo.insert(company).await?;
        info!(company_id = %company.id, "Company created");
        Ok(company)
    }

    #[instrument(skip_all, fields(company_id = %patch.id))]
    async fn update(&self, patch: CompanyUpdate) -> Result<Company, GateError> {
        validate_update(&patch)?;

        let mut company = self
            .repo
            .find(patch.id)
            .await?
            .ok_or_else(|| DomainError::company_not_found(patch.id))?;
        patch.apply_to(&mut company);
        company.updated_at = OffsetDateTime::now_utc();

        let company = self.repo.replace(company).await?;
        info!("Company updated");
        Ok(company)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &Uuid) -> Result<(), GateError> {
        if !self.repo.remove(*id).await? {
            return Err(DomainError::company_not_found(*id).into());
        }
        info!("Company deleted");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, GateError> {
        let query = self.resolve_query(filter)?;
        let companies = self.repo.list(&query).await?;
        debug!(
            offset = query.offset,
            limit = query.limit,
            returned = companies.len(),
            "Listed companies"
        );
        Ok(companies)
    }

    #[instrument(skip_all)]
    async fn count(&self, filter: &CompanyFilter) -> Result<u64, GateError> {
        Ok(self.repo.count(&criteria_of(filter)).await?)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::infra::storage::InMemoryCompanyRepository;

    fn service() -> CompanyService<InMemoryCompanyRepository> {
        CompanyService::new(
            Arc::new(InMemoryCompanyRepository::new()),
            CompaniesConfig {
                default_page_size: 10,
                max_page_size: 50,
            },
        )
    }

    #[test]
    fn paging_defaults_caps_and_offsets() {
        let svc = service();

        let q = svc.resolve_query(&CompanyFilter::default()).unwrap();
        assert_eq!((q.offset, q.limit), (0, 10));

        let q = svc
            .resolve_query(&CompanyFilter {
                page_size: Some(500),
                page_number: Some(3),
                ..CompanyFilter::default()
            })
            .unwrap();
        assert_eq!((q.offset, q.limit), (100, 50));

        let q = svc
            .resolve_query(&CompanyFilter {
                page_size: Some(5),
                page_number: Some(1),
                ..CompanyFilter::default()
            })
            .unwrap();
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn zero_page_size_is_invalid() {
        let err = service()
            .resolve_query(&CompanyFilter {
                page_size: Some(0),
                ..CompanyFilter::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "page_size"));
    }

    #[test]
    fn blank_search_is_ignored_and_needle_is_lowercased() {
        let blank = criteria_of(&CompanyFilter {
            search: Some("   ".to_owned()),
            ..CompanyFilter::default()
        });
        assert_eq!(blank.search, None);

        let needle = criteria_of(&CompanyFilter {
            search: Some(" ACME ".to_owned()),
            ..CompanyFilter::default()
        });
        assert_eq!(needle.search.as_deref(), Some("acme"));
    }
}
