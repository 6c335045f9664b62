pub mod aggregate;
pub mod cache;
pub mod case_service;
pub mod dashboard;
pub mod fetcher;

pub use aggregate::CaseAccumulator;
pub use case_service::CaseService;
pub use fetcher::CaseFetcher;
