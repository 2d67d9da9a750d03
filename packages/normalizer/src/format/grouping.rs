//! NIST digit grouping for reconstructed uncertainties.

/// Group digits in threes, merging a trailing single digit into the previous group.
///
/// # Examples
/// ```
/// use codata_normalizer::format::group_digits;
///
/// assert_eq!(group_digits("00000090"), "000 000 90");
/// assert_eq!(group_digits("0000000079"), "000 000 0079");
/// assert_eq!(group_digits("7"), "7");
/// ```
#[must_use]
pub fn group_digits(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = chars.chunks(3).map(|c| c.iter().collect()).collect();

    if groups.len() > 1 && groups.last().is_some_and(|g| g.chars().count() == 1) {
        if let Some(last) = groups.pop() {
            if let Some(previous) = groups.last_mut() {
                previous.push_str(&last);
            }
        }
    }

    groups.join(" ")
}

/// Rebuild an embedded uncertainty at the decimal scale of its value.
///
/// `decimals` is the number of digits after the value's decimal point and
/// `digits` the parenthesized uncertainty digits, which apply to the last
/// digits of the value.
///
/// # Examples
/// ```
/// use codata_normalizer::format::reconstruct_uncertainty;
///
/// assert_eq!(reconstruct_uncertainty(6, "23"), "0.000 023");
/// assert_eq!(reconstruct_uncertainty(8, "90"), "0.000 000 90");
/// ```
#[must_use]
pub fn reconstruct_uncertainty(decimals: usize, digits: &str) -> String {
    let len = digits.chars().count();
    if decimals == 0 {
        return digits.to_string();
    }
    if len <= decimals {
        let fraction = format!("{}{digits}", "0".repeat(decimals - len));
        return format!("0.{}", group_digits(&fraction));
    }
    // More uncertainty digits than decimals: the point falls inside them.
    let split = digits
        .char_indices()
        .nth(len - decimals)
        .map_or(digits.len(), |(offset, _)| offset);
    let (integer, fraction) = digits.split_at(split);
    format!("{integer}.{}", group_digits(fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits_even_groups() {
        assert_eq!(group_digits("000023"), "000 023");
        assert_eq!(group_digits("000000000"), "000 000 000");
    }

    #[test]
    fn test_group_digits_trailing_pair_stays() {
        assert_eq!(group_digits("00000090"), "000 000 90");
    }

    #[test]
    fn test_group_digits_merges_lone_digit() {
        assert_eq!(group_digits("0000000079"), "000 000 0079");
        assert_eq!(group_digits("0001"), "0001");
    }

    #[test]
    fn test_group_digits_short() {
        assert_eq!(group_digits(""), "");
        assert_eq!(group_digits("5"), "5");
        assert_eq!(group_digits("15"), "15");
    }

    #[test]
    fn test_reconstruct_pads_to_value_scale() {
        assert_eq!(reconstruct_uncertainty(6, "23"), "0.000 023");
        assert_eq!(reconstruct_uncertainty(10, "15"), "0.000 000 0015");
        assert_eq!(reconstruct_uncertainty(2, "15"), "0.15");
    }

    #[test]
    fn test_reconstruct_integer_value() {
        assert_eq!(reconstruct_uncertainty(0, "12"), "12");
    }

    #[test]
    fn test_reconstruct_more_digits_than_decimals() {
        assert_eq!(reconstruct_uncertainty(1, "34"), "3.4");
        assert_eq!(reconstruct_uncertainty(2, "1500"), "15.00");
    }
}
