pub mod bracket;
pub mod cli;
pub mod commands;
pub mod mapping;
pub mod merge;
pub mod ownership;
pub mod rounds;
pub mod schedule;
pub mod store;
