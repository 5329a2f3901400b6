//! Hierarchical name helpers.
//!
//! Cell and net names are full paths from the design top, joined by the
//! hierarchy separator.

/// The last path segment of `name`.
#[must_use]
pub fn leaf(name: &str, separator: char) -> &str {
    name.rsplit_once(separator).map_or(name, |(_, leaf)| leaf)
}

/// Returns true if `name` lies strictly inside `container`.
#[must_use]
pub fn is_descendant(name: &str, container: &str, separator: char) -> bool {
    name.len() > container.len() + separator.len_utf8()
        && name.starts_with(container)
        && name[container.len()..].starts_with(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_is_last_segment() {
        assert_eq!(leaf("top/u1/ff", '/'), "ff");
        assert_eq!(leaf("ff", '/'), "ff");
    }

    #[test]
    fn descendants_need_the_separator() {
        assert!(is_descendant("top/u1", "top", '/'));
        assert!(is_descendant("top/u1/ff", "top", '/'));
        assert!(!is_descendant("top2/u1", "top", '/'));
        assert!(!is_descendant("top", "top", '/'));
        assert!(!is_descendant("top/", "top", '/'));
        assert!(is_descendant("top.u1", "top", '.'));
    }
}
