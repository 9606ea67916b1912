//! Identifier case conversion.

/// Convert an identifier to lower_snake_case.
///
/// Word boundaries fall on non-alphanumeric characters, on a lowercase to
/// uppercase step, before the last capital of an uppercase run that is
/// followed by a lowercase letter, and around digit runs. The function is
/// idempotent: snake_case input comes back unchanged.
pub fn snake_case(input: &str) -> String {
    words(input).join("_")
}

/// Convert a component name to kebab-case (`ProductCard` → `product-card`).
pub fn hyphenate(input: &str) -> String {
    words(input).join("-")
}

fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary = if c.is_ascii_digit() {
                !prev.is_ascii_digit()
            } else if prev.is_ascii_digit() {
                true
            } else if c.is_uppercase() {
                prev.is_lowercase()
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase))
            } else {
                false
            };
            if boundary {
                flush(&mut current, &mut words);
            }
        }
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("fooBarBaz"), "foo_bar_baz");
        assert_eq!(snake_case("FooBar"), "foo_bar");
        assert_eq!(snake_case("XMLHttpRequest"), "xml_http_request");
        assert_eq!(snake_case("address1"), "address_1");
        assert_eq!(snake_case("isHTML"), "is_html");
        assert_eq!(snake_case("product-card"), "product_card");
    }

    #[test]
    fn test_snake_case_is_idempotent() {
        for input in ["foo_bar_baz", "address_1", "x", "is_visible"] {
            assert_eq!(snake_case(input), input);
        }
        for input in ["fooBarBaz", "XMLHttpRequest", "line2Items", "ABC"] {
            let once = snake_case(input);
            assert_eq!(snake_case(&once), once);
        }
    }

    #[test]
    fn test_hyphenate() {
        assert_eq!(hyphenate("ProductCard"), "product-card");
        assert_eq!(hyphenate("product-card"), "product-card");
        assert_eq!(hyphenate("TransitionGroup"), "transition-group");
        assert_eq!(hyphenate("Icon2"), "icon-2");
    }
}
