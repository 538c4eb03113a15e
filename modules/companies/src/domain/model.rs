use std::fmt;

use gatekit_security::ResourceKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Legal form of a company. Travels as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum CompanyType {
    Corporations = 1,
    NonProfit = 2,
    Cooperative = 3,
    SoleProprietorship = 4,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown company type {0}; expected 1..=4")]
pub struct UnknownCompanyType(pub u8);

impl TryFrom<u8> for CompanyType {
    type Error = UnknownCompanyType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Corporations),
            2 => Ok(Self::NonProfit),
            3 => Ok(Self::Cooperative),
            4 => Ok(Self::SoleProprietorship),
            other => Err(UnknownCompanyType(other)),
        }
    }
}

impl From<CompanyType> for u8 {
    fn from(kind: CompanyType) -> Self {
        kind as u8
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A stored company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub name: String,
    pub description: String,
    pub amount_of_employees: i32,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

/// Payload of a create request. The service assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub description: String,
    pub amount_of_employees: i32,
    pub registered: bool,
    pub company_type: CompanyType,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount_of_employees: Option<i32>,
    pub registered: Option<bool>,
    pub company_type: Option<CompanyType>,
}

impl CompanyUpdate {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Applies the provided fields onto `company`.
    pub fn apply_to(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(description) = self.description {
            company.description = description;
        }
        if let Some(amount) = self.amount_of_employees {
            company.amount_of_employees = amount;
        }
        if let Some(registered) = self.registered {
            company.registered = registered;
        }
        if let Some(company_type) = self.company_type {
            company.company_type = company_type;
        }
    }
}

/// List request descriptor.
///
/// `order_by` entries read `"<field> ASC|DESC"`; they are checked by the
/// service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyFilter {
    pub ids: Vec<Uuid>,
    pub page_size: Option<u64>,
    pub page_number: Option<u64>,
    pub order_by: Vec<String>,
    pub search: Option<String>,
    pub types: Vec<CompanyType>,
    pub registered: Option<bool>,
}

/// Binds the company payload types for object-level policy checks.
#[derive(Debug, Clone, Copy)]
pub struct CompanyKind;

impl ResourceKind for CompanyKind {
    const NAME: &'static str = "company";

    type Entity = Company;
    type Create = CompanyCreate;
    type Filter = CompanyFilter;
}
