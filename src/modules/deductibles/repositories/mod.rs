pub mod deductible_repository;

pub use deductible_repository::DeductibleRepository;
