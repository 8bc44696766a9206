pub mod creation;
pub mod install;
pub mod query;
pub mod sample;
