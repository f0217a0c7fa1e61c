pub mod encoding;
pub mod models;
pub mod validation;
