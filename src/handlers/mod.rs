// src/handlers/mod.rs

pub mod admin;
pub mod forms;
pub mod generate;
pub mod health;
pub mod submissions;
pub mod upload;
