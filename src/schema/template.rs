//! Placeholder interpolation for name patterns
//!
//! Name patterns in query descriptors may contain `{{key}}` placeholders
//! resolved once per resolution call, before any matching occurs.
//! Unknown placeholders are left intact so they surface as a regex
//! non-match instead of a panic.

use std::collections::HashMap;

/// Replace `{{key}}` occurrences with values from `vars`
pub fn interpolate(pattern: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        // Leave the placeholder as written
                        out.push_str(&rest[start..start + 2 + end + 2]);
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated placeholder, keep the remainder verbatim
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &[(&'a str, &'a str)]) -> HashMap<&'a str, &'a str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_placeholder() {
        let result = interpolate("^{{name}}-auth$", &vars(&[("name", "box-a")]));
        assert_eq!(result, "^box-a-auth$");
    }

    #[test]
    fn test_multiple_and_repeated() {
        let result = interpolate(
            "{{ns}}/{{name}}/{{name}}",
            &vars(&[("ns", "dev"), ("name", "db")]),
        );
        assert_eq!(result, "dev/db/db");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let result = interpolate("^{{other}}-x$", &vars(&[("name", "a")]));
        assert_eq!(result, "^{{other}}-x$");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let result = interpolate("^{{name-x$", &vars(&[("name", "a")]));
        assert_eq!(result, "^{{name-x$");
    }

    #[test]
    fn test_whitespace_in_placeholder() {
        let result = interpolate("{{ name }}", &vars(&[("name", "a")]));
        assert_eq!(result, "a");
    }
}
