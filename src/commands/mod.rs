pub mod churn;
pub mod migrate;
pub mod update;
