//! Gap-based grouping of sorted pixel coordinates

/// Average each run of an ascending sequence whose neighbours differ by at most `max_gap`
///
/// The input must already be sorted ascending; it is not re-sorted here.
/// A negative `max_gap` leaves every value in its own group.
///
/// ```
/// use row_locate::row_locator::group_averages;
///
/// assert_eq!(group_averages(&[1, 2, 3, 20, 21, 22, 40], 3), vec![2.0, 21.0, 40.0]);
/// ```
pub fn group_averages(sorted: &[i32], max_gap: i32) -> Vec<f64> {
    let Some((&first, rest)) = sorted.split_first() else {
        return Vec::new();
    };

    let mut averages = Vec::new();
    let mut previous = first as i64;
    let mut sum = previous;
    let mut count = 1u32;

    for &value in rest {
        let value = value as i64;
        if value - previous <= max_gap as i64 {
            sum += value;
            count += 1;
        } else {
            averages.push(sum as f64 / count as f64);
            sum = value;
            count = 1;
        }
        previous = value;
    }
    averages.push(sum as f64 / count as f64);

    averages
}
