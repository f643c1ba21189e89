use crate::date_utils::YearMonth;
use crate::models::CalendarDay;

/// Every day of `ym`, from the 1st to the last, in ascending order.
pub fn month_days(ym: YearMonth) -> Vec<CalendarDay> {
    ym.first_day()
        .iter_days()
        .take(ym.days_in_month() as usize)
        .map(CalendarDay::new)
        .collect()
}
