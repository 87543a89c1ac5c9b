pub mod basic_models;
pub mod generation;
pub mod provider;
