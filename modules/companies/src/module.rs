use std::sync::Arc;

use gatekit::auth::TokenVerifier;
use gatekit::security::PolicyError;
use gatekit::{AuthorizationGate, NotificationSink};

use crate::config::CompaniesConfig;
use crate::domain::model::Company;
use crate::domain::ops::CompanyOperation;
use crate::domain::policy::PolicyConfig;
use crate::domain::repo::CompanyRepository;
use crate::domain::service::CompanyService;

/// The gate specialised for companies.
pub type CompanyGate<R> = AuthorizationGate<CompanyService<R>, CompanyOperation>;

/// Assemble the company gate from its collaborators.
///
/// # Errors
/// Returns [`PolicyError::MissingChain`] if `policy` leaves any operation
/// without a checker.
pub fn build_gate<R: CompanyRepository>(
    verifier: Arc<dyn TokenVerifier>,
    policy: &PolicyConfig,
    repo: Arc<R>,
    config: CompaniesConfig,
    sink: Arc<dyn NotificationSink<Company>>,
) -> Result<CompanyGate<R>, PolicyError> {
    let evaluator = Arc::new(policy.evaluator()?);
    let service = Arc::new(CompanyService::new(repo, config));
    AuthorizationGate::new(verifier, evaluator, service, sink)
}
