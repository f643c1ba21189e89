pub mod allowance;
pub mod auth;
pub mod calendar;
pub mod category;
pub mod expenditure;
pub mod plan;

pub use allowance::AllowanceRow;
pub use auth::TokenPair;
pub use calendar::{CalendarDay, Weekday, WEEKDAY_SYMBOLS};
pub use category::{Category, NewCategory};
pub use expenditure::{ExpenditureId, ExpenditureRecord, ExpenditureUpdate, NewExpenditure};
pub use plan::{MonthlyPlan, PlanInput};
