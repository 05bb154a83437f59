//! Line splitting for the visit table.
//!
//! Quote characters are dropped wherever they appear and fields are split on
//! every comma. Quoted fields containing commas are not supported.

/// Split one input line into fields.
pub fn split_record(line: &str) -> Vec<String> {
    line.trim()
        .replace('"', "")
        .split(',')
        .map(str::to_string)
        .collect()
}

/// True for lines that carry no data and are skipped silently.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_are_noise() {
        assert_eq!(split_record("\"v1\",\"Male\",1\r\n"), vec!["v1", "Male", "1"]);
    }

    #[test]
    fn test_quoted_comma_is_split() {
        assert_eq!(split_record("\"a,b\",c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_fields_are_kept() {
        assert_eq!(split_record("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_blank() {
        assert!(is_blank("  \r\n"));
        assert!(!is_blank(","));
    }
}
