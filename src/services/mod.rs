// src/services/mod.rs

//! Business rules. Handlers stay thin and pass the store in explicitly.

pub mod error;
pub mod export;
pub mod forms;
pub mod generation;
pub mod grading;
pub mod policy;
pub mod stats;
pub mod submissions;

pub use error::{ServiceError, ServiceResult};
