pub mod aggregate;
pub mod allowance;
pub mod budget_client;
pub mod calendar;
pub mod overlay;
