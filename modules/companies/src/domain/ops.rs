use gatekit::CrudOperation;
use gatekit_security::OperationId;
use serde::{Deserialize, Serialize};

/// Capability tags for the company resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyOperation {
    CompanyList,
    CompanyDetail,
    CompanyCreate,
    CompanyUpdate,
    CompanyDelete,
}

impl OperationId for CompanyOperation {
    fn all() -> &'static [Self] {
        &[
            Self::CompanyList,
            Self::CompanyDetail,
            Self::CompanyCreate,
            Self::CompanyUpdate,
            Self::CompanyDelete,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyList => "company_list",
            Self::CompanyDetail => "company_detail",
            Self::CompanyCreate => "company_create",
            Self::CompanyUpdate => "company_update",
            Self::CompanyDelete => "company_delete",
        }
    }
}

impl CrudOperation for CompanyOperation {
    const LIST: Self = Self::CompanyList;
    const DETAIL: Self = Self::CompanyDetail;
    const CREATE: Self = Self::CompanyCreate;
    const UPDATE: Self = Self::CompanyUpdate;
    const DELETE: Self = Self::CompanyDelete;
}
