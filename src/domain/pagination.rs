pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Page coordinates forwarded to both upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Parse raw query values. Absent, non-numeric and non-positive values
    /// fall back to the defaults.
    pub fn from_query(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self {
            page: parse_positive("page", page, DEFAULT_PAGE),
            per_page: parse_positive("per_page", per_page, DEFAULT_PER_PAGE),
        }
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => value,
        Ok(value) => {
            log::warn!("{name}={value} is not positive, using default {default}");
            default
        }
        Err(_) => {
            log::debug!("{name}={raw:?} is not a number, using default {default}");
            default
        }
    }
}

/// `ceil(total / per_page)`. A non-positive `per_page` reports zero pages.
pub fn total_pages(total: usize, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    let total = total as i64;
    (total + per_page - 1) / per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(PageRequest::from_query(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::from_query(Some(""), Some("  ")),
            PageRequest { page: 1, per_page: 20 }
        );
    }

    #[test]
    fn numeric_values_are_parsed() {
        assert_eq!(
            PageRequest::from_query(Some("3"), Some("50")),
            PageRequest { page: 3, per_page: 50 }
        );
    }

    #[test]
    fn non_numeric_values_use_defaults() {
        assert_eq!(
            PageRequest::from_query(Some("abc"), Some("ten")),
            PageRequest::default()
        );
    }

    #[test]
    fn non_positive_values_use_defaults() {
        assert_eq!(
            PageRequest::from_query(Some("0"), Some("-5")),
            PageRequest::default()
        );
        assert_eq!(PageRequest::from_query(None, Some("0")).per_page, 20);
    }

    #[test]
    fn no_upper_bound_on_per_page() {
        assert_eq!(PageRequest::from_query(None, Some("1000")).per_page, 1000);
    }

    #[test]
    fn total_pages_rounds_up() {
        let cases = [(0, 20, 0), (1, 20, 1), (20, 20, 1), (21, 20, 2), (45, 10, 5), (7, 1, 7)];
        for (total, per_page, expected) in cases {
            assert_eq!(total_pages(total, per_page), expected, "total={total} per_page={per_page}");
        }
    }

    #[test]
    fn total_pages_with_non_positive_per_page_is_zero() {
        assert_eq!(total_pages(10, 0), 0);
        assert_eq!(total_pages(10, -3), 0);
    }
}
