use gatekit::{EventOperation, ResourceEvent};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Company, CompanyCreate, CompanyFilter, CompanyType, CompanyUpdate};

/// REST DTO for company representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDto {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub name: String,
    pub description: String,
    pub amount_of_employees: i32,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

/// REST DTO for creating a company.
///
/// Omitted scalars default to their zero value so that validation, not the
/// JSON decoder, reports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount_of_employees: i32,
    #[serde(default)]
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

/// REST DTO for updating a company (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompanyReq {
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount_of_employees: Option<i32>,
    pub registered: Option<bool>,
    #[serde(rename = "type")]
    pub company_type: Option<CompanyType>,
}

/// Query string of `GET /companies`.
///
/// List-valued parameters are comma-separated, e.g.
/// `?types=1,3&order_by=name ASC,created_at DESC`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCompaniesQuery {
    pub ids: Option<String>,
    pub page_size: Option<u64>,
    pub page_number: Option<u64>,
    pub order_by: Option<String>,
    pub search: Option<String>,
    pub types: Option<String>,
    pub registered: Option<bool>,
}

/// Payload of one SSE message on `GET /companies/events`.
pub type CompanyEventDto = ResourceEvent<CompanyDto>;

impl From<Company> for CompanyDto {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            updated_at: company.updated_at,
            created_at: company.created_at,
            name: company.name,
            description: company.description,
            amount_of_employees: company.amount_of_employees,
            registered: company.registered,
            company_type: company.company_type,
        }
    }
}

impl From<CreateCompanyReq> for CompanyCreate {
    fn from(req: CreateCompanyReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            amount_of_employees: req.amount_of_employees,
            registered: req.registered,
            company_type: req.company_type,
        }
    }
}

impl UpdateCompanyReq {
    #[must_use]
    pub fn into_update(self, id: Uuid) -> CompanyUpdate {
        CompanyUpdate {
            id,
            name: self.name,
            description: self.description,
            amount_of_employees: self.amount_of_employees,
            registered: self.registered,
            company_type: self.company_type,
        }
    }
}

#[must_use]
pub fn event_dto(operation: EventOperation, company: Company) -> CompanyEventDto {
    ResourceEvent::new(operation, CompanyDto::from(company))
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

impl TryFrom<ListCompaniesQuery> for CompanyFilter {
    type Error = DomainError;

    fn try_from(query: ListCompaniesQuery) -> Result<Self, Self::Error> {
        let ids = split_list(query.ids.as_deref())
            .map(|raw| {
                Uuid::parse_str(raw).map_err(|_| {
                    DomainError::validation("ids", format!("'{raw}' is not a valid UUID"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let types = split_list(query.types.as_deref())
            .map(|raw| {
                raw.parse::<u8>()
                    .ok()
                    .and_then(|code| CompanyType::try_from(code).ok())
                    .ok_or_else(|| {
                        DomainError::validation("types", format!("'{raw}' is not a company type"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ids,
            page_size: query.page_size,
            page_number: query.page_number,
            order_by: split_list(query.order_by.as_deref())
                .map(str::to_owned)
                .collect(),
            search: query.search,
            types,
            registered: query.registered,
        })
    }
}
