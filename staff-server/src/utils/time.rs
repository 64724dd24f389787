//! Clock-time helpers for attendance

use super::validation;

/// Hours between two `HH:MM` times, rounded to 2 decimals
///
/// Returns 0 when either side is missing. A check-out earlier than the
/// check-in is an error.
pub fn working_hours(check_in: Option<&str>, check_out: Option<&str>) -> Result<f64, String> {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Ok(0.0);
    };
    let start = validation::clock_time(check_in, "check_in")?;
    let end = validation::clock_time(check_out, "check_out")?;
    if end < start {
        return Err(format!("check_out {check_out} is before check_in {check_in}"));
    }
    let minutes = (end - start).num_minutes() as f64;
    Ok((minutes / 60.0 * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_hours() {
        assert_eq!(working_hours(Some("09:00"), Some("17:30")), Ok(8.5));
        assert_eq!(working_hours(Some("09:00"), Some("09:00")), Ok(0.0));
        assert_eq!(working_hours(Some("09:10"), Some("10:00")), Ok(0.83));
        assert_eq!(working_hours(None, Some("17:30")), Ok(0.0));
        assert_eq!(working_hours(Some("09:00"), None), Ok(0.0));
    }

    #[test]
    fn test_checkout_before_checkin() {
        assert!(working_hours(Some("17:00"), Some("09:00")).is_err());
        assert!(working_hours(Some("nine"), Some("17:00")).is_err());
    }
}
