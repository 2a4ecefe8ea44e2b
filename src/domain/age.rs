//! Age calculation from a date of birth.

use chrono::{Datelike, NaiveDate};

/// Whole years elapsed between `date_of_birth` and `as_of`.
///
/// The birthday counts as reached once `(month, day)` of `as_of` is not
/// before `(month, day)` of the birth date. A Feb 29 birthday therefore
/// recurs on Mar 1 in non-leap years, never on Feb 28.
///
/// Reference dates earlier than the birth date yield 0.
pub fn calculate_age(date_of_birth: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of < date_of_birth {
        return 0;
    }

    let mut years = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }

    u32::try_from(years).unwrap_or(0)
}
