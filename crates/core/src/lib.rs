#![forbid(unsafe_code)]

pub mod delta;
pub mod graph;
pub mod ids;
pub mod index;

pub use ids::{NodeId, NodeIdError, alias_id, new_node_id};

pub mod heading {
    /// Headings are path-addressable slugs: `[a-z0-9_]+`.
    pub fn is_valid_heading(heading: &str) -> bool {
        !heading.is_empty() && heading.chars().all(is_valid_heading_char)
    }

    pub fn is_valid_heading_char(ch: char) -> bool {
        ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_'
    }

    /// `"some_heading"` -> `"Some Heading"`.
    pub fn format_title(heading: &str) -> String {
        heading
            .to_lowercase()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercases and replaces every non-heading character with `_`.
    pub fn format_heading(title: &str) -> String {
        title
            .to_lowercase()
            .chars()
            .map(|ch| if is_valid_heading_char(ch) { ch } else { '_' })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn heading_validation() {
            for ok in ["1", "11", "_", "1_", "_1", "x", "xyz", "genesis"] {
                assert!(is_valid_heading(ok), "{ok}");
            }
            for bad in ["", "%", "X", "a b", "$", "a.b"] {
                assert!(!is_valid_heading(bad), "{bad}");
            }
        }

        #[test]
        fn title_and_heading_formatting() {
            assert_eq!(format_title("root"), "Root");
            assert_eq!(format_title("some_long_heading"), "Some Long Heading");
            assert_eq!(format_heading("Some Title!"), "some_title_");
            assert!(is_valid_heading(&format_heading("Hello, World")));
        }
    }
}
