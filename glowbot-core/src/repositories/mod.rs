// src/repositories/mod.rs

pub mod json;

pub use json::commands::JsonCommandRepository;
pub use json::plaques::JsonPlaqueRepository;
pub use json::secrets::JsonSecretsRepository;
