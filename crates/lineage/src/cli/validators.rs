//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Longest accepted object id.
pub const MAX_OBJECT_ID_LENGTH: usize = 512;

/// Longest accepted search query.
pub const MAX_QUERY_LENGTH: usize = 200;

/// Validate an object id.
///
/// Ids are matched exactly against the cache, so only obvious mistakes are
/// rejected here: empty input, embedded whitespace or control characters, and
/// runaway length. Case is preserved.
///
/// Examples: `DWH.FACT_SALES`, `my-project.sales.orders`
pub fn validate_object_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Object ID cannot be empty".to_string());
    }

    if s.len() > MAX_OBJECT_ID_LENGTH {
        return Err(format!(
            "Object ID cannot exceed {MAX_OBJECT_ID_LENGTH} characters (got {})",
            s.len()
        ));
    }

    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!(
            "Invalid object ID: '{s}'. IDs cannot contain whitespace (expected e.g. SCHEMA.NAME)"
        ));
    }

    Ok(s.to_string())
}

/// Validate a column name for column lineage lookups.
pub fn validate_column(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Column name cannot be empty".to_string());
    }
    if s.chars().any(char::is_control) {
        return Err("Column name cannot contain control characters".to_string());
    }
    Ok(s.to_string())
}

/// Validate a search query.
pub fn validate_query(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Search query cannot be empty".to_string());
    }

    if s.chars().count() > MAX_QUERY_LENGTH {
        return Err(format!(
            "Search query cannot exceed {MAX_QUERY_LENGTH} characters"
        ));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DWH.FACT_SALES")]
    #[case("  STAGE.ORDERS  ")]
    #[case("my-project.sales.orders")]
    #[case("dags.daily_load")]
    fn valid_object_ids(#[case] input: &str) {
        assert_eq!(validate_object_id(input).unwrap(), input.trim());
    }

    #[rstest]
    #[case("", "empty")]
    #[case("   ", "empty")]
    #[case("DWH.FACT SALES", "whitespace")]
    #[case("DWH.\tFACT", "whitespace")]
    fn invalid_object_ids(#[case] input: &str, #[case] reason: &str) {
        let err = validate_object_id(input).unwrap_err();
        assert!(err.contains(reason), "{err}");
    }

    #[test]
    fn object_id_length_limit() {
        let long = "S.".to_string() + &"X".repeat(MAX_OBJECT_ID_LENGTH);
        assert!(validate_object_id(&long).unwrap_err().contains("exceed"));
    }

    #[test]
    fn column_is_trimmed() {
        assert_eq!(validate_column(" AMOUNT ").unwrap(), "AMOUNT");
        assert!(validate_column("").is_err());
    }

    #[test]
    fn query_rules() {
        assert_eq!(validate_query("  sales ").unwrap(), "sales");
        assert!(validate_query("").is_err());
        assert!(validate_query(&"q".repeat(MAX_QUERY_LENGTH + 1)).is_err());
        assert!(validate_query(&"q".repeat(MAX_QUERY_LENGTH)).is_ok());
    }
}
