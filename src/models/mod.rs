pub mod profile;
pub mod prompt;
