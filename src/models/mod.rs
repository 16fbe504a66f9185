// src/models/mod.rs

pub mod form;
pub mod principal;
pub mod stats;
pub mod submission;
