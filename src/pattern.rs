//! Template substitution for generated file names.
//!
//! A template is a plain string containing zero or more placeholders of the
//! form `$i$`, where `i` is a non-negative column index. Each placeholder is
//! replaced by the fragment stored in that column of a row:
//!
//! ```
//! use clerk_lib::generate_name;
//!
//! let name = generate_name("file_$0$_$1$.jpg", &["image", "01"]);
//! assert_eq!(name, "file_image_01.jpg");
//! ```
//!
//! There is no escape syntax and the output is not checked against
//! file-system naming rules.

/// Build the placeholder token for a column index (`3` -> `$3$`).
pub fn placeholder(index: usize) -> String {
    format!("${index}$")
}

/// Fill the template with the given fragments.
///
/// Indices are substituted in increasing order, each with a single
/// left-to-right replacement pass over the current text. Placeholders whose
/// index has no fragment are left in the output verbatim.
pub fn generate_name<S: AsRef<str>>(template: &str, fragments: &[S]) -> String {
    let mut name = template.to_string();
    for (index, fragment) in fragments.iter().enumerate() {
        let token = placeholder(index);
        if name.contains(&token) {
            name = name.replace(&token, fragment.as_ref());
        }
    }
    name
}

/// Distinct placeholder indices in the order they first appear.
///
/// Tokens whose index does not fit in `usize` are not placeholders and are
/// skipped.
pub fn placeholders(template: &str) -> Vec<usize> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'$' {
            pos += 1;
            continue;
        }
        let digits_start = pos + 1;
        let mut end = digits_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start && end < bytes.len() && bytes[end] == b'$' {
            if let Ok(index) = template[digits_start..end].parse::<usize>() {
                if !found.contains(&index) {
                    found.push(index);
                }
            }
            pos = end + 1;
        } else {
            pos = digits_start;
        }
    }

    found
}

/// Placeholder indices that `generate_name` would leave unreplaced when
/// given `fragment_count` fragments.
pub fn unresolved(template: &str, fragment_count: usize) -> Vec<usize> {
    placeholders(template)
        .into_iter()
        .filter(|&index| index >= fragment_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_placeholders_in_column_order() {
        assert_eq!(
            generate_name("file_$0$_$1$.jpg", &["image", "01"]),
            "file_image_01.jpg"
        );
    }

    #[test]
    fn leaves_placeholder_without_fragment() {
        let empty: [&str; 0] = [];
        assert_eq!(generate_name("$0$", &empty), "$0$");
        assert_eq!(generate_name("$0$-$2$", &["a", "b"]), "a-$2$");
    }

    #[test]
    fn empty_template_yields_empty_name() {
        assert_eq!(generate_name("", &["x"]), "");
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(generate_name("$0$/$0$/$0$", &["x"]), "x/x/x");
    }

    #[test]
    fn repeated_calls_are_stable() {
        let fragments = vec!["invoice".to_string(), "2024".to_string()];
        let first = generate_name("$1$_$0$.pdf", &fragments);
        let second = generate_name("$1$_$0$.pdf", &fragments);
        assert_eq!(first, "2024_invoice.pdf");
        assert_eq!(first, second);
    }

    #[test]
    fn later_indices_see_earlier_replacements() {
        // Column 0 inserts a literal `$1$` which column 1 then fills.
        assert_eq!(generate_name("$0$", &["$1$", "b"]), "b");
    }

    #[test]
    fn earlier_indices_do_not_rescan_their_output() {
        assert_eq!(generate_name("$0$", &["$0$"]), "$0$");
    }

    #[test]
    fn multi_digit_indices_do_not_collide() {
        let fragments: Vec<String> = (0..12).map(|i| format!("f{i}")).collect();
        assert_eq!(generate_name("$1$-$11$", &fragments), "f1-f11");
    }

    #[test]
    fn invalid_path_characters_pass_through() {
        assert_eq!(generate_name("$0$.txt", &["a/b:c"]), "a/b:c.txt");
    }

    #[test]
    fn placeholders_are_listed_once_in_order() {
        assert_eq!(placeholders("$2$_$0$_$2$.jpg"), vec![2, 0]);
        assert!(placeholders("no tokens $ here $x$").is_empty());
        assert_eq!(placeholders("$$1$"), vec![1]);
    }

    #[test]
    fn unresolved_reports_indices_past_fragment_count() {
        assert_eq!(unresolved("$0$_$3$_$1$", 2), vec![3]);
        assert!(unresolved("$0$", 1).is_empty());
    }
}
