pub mod error;
pub mod model;
pub mod ops;
pub mod policy;
pub mod repo;
pub mod service;
pub mod validation;
