pub mod bootstrap;
pub mod gameplay;
pub mod loop_runner;
pub mod script;
pub mod tuning;
