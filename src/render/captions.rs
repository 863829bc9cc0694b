//! Caption text printed on charts.

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Calendar date shown under the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// e.g. "15th JUNE 2024"
pub fn date_caption(date: DateFields) -> String {
    format!(
        "{}{} {} {}",
        date.day,
        ordinal_suffix(date.day),
        month_name(date.month),
        date.year
    )
}

/// e.g. "40.7128° N 74.0060° W"
pub fn coordinate_caption(latitude: f64, longitude: f64) -> String {
    let lat_hemisphere = if latitude >= 0.0 { 'N' } else { 'S' };
    let lon_hemisphere = if longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.4}° {} {:.4}° {}",
        latitude.abs(),
        lat_hemisphere,
        longitude.abs(),
        lon_hemisphere
    )
}

/// Upper-cased title, or the default when none (or only whitespace) is given
pub fn chart_title(title: Option<&str>, default_title: &str) -> String {
    title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(default_title)
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "st")]
    #[case(2, "nd")]
    #[case(3, "rd")]
    #[case(4, "th")]
    #[case(11, "th")]
    #[case(12, "th")]
    #[case(13, "th")]
    #[case(21, "st")]
    #[case(22, "nd")]
    #[case(23, "rd")]
    #[case(30, "th")]
    #[case(31, "st")]
    fn test_ordinal_suffix(#[case] day: u32, #[case] expected: &str) {
        assert_eq!(ordinal_suffix(day), expected);
    }

    #[test]
    fn test_date_caption() {
        let date = DateFields {
            year: 2024,
            month: 6,
            day: 15,
        };
        assert_eq!(date_caption(date), "15th JUNE 2024");
        assert_eq!(
            date_caption(DateFields {
                year: 1999,
                month: 12,
                day: 31
            }),
            "31st DECEMBER 1999"
        );
    }

    #[rstest]
    #[case(40.7128, -74.006, "40.7128° N 74.0060° W")]
    #[case(-33.8688, 151.2093, "33.8688° S 151.2093° E")]
    #[case(0.0, 0.0, "0.0000° N 0.0000° E")]
    fn test_coordinate_caption(#[case] lat: f64, #[case] lon: f64, #[case] expected: &str) {
        assert_eq!(coordinate_caption(lat, lon), expected);
    }

    #[test]
    fn test_chart_title_defaults_and_uppercases() {
        assert_eq!(chart_title(None, "The Night Sky"), "THE NIGHT SKY");
        assert_eq!(chart_title(Some("  "), "The Night Sky"), "THE NIGHT SKY");
        assert_eq!(chart_title(Some("Our first date"), "x"), "OUR FIRST DATE");
    }
}
