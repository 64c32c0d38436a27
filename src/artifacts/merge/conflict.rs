//! Conflict marker rendering
//!
//! Builds the file content written for a conflicted path. Both sides go in
//! verbatim between the usual markers; an absent side contributes nothing.
//! Side content is not reformatted, so a side without a trailing newline
//! runs straight into the next marker.

const CURRENT_MARKER: &str = "<<<<<<< HEAD\n";
const SEPARATOR: &str = "=======\n";
const GIVEN_MARKER: &str = ">>>>>>>\n";

/// Render the working-tree content for a conflicted path
pub fn conflict_content(current: Option<&str>, given: Option<&str>) -> String {
    let current = current.unwrap_or_default();
    let given = given.unwrap_or_default();

    format!("{CURRENT_MARKER}{current}{SEPARATOR}{given}{GIVEN_MARKER}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn both_sides_are_fenced_between_markers() {
        let content = conflict_content(Some("ours\n"), Some("theirs\n"));

        assert_eq!(
            content,
            "<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>>\n"
        );
    }

    #[test]
    fn an_absent_side_contributes_nothing() {
        let content = conflict_content(Some("ours\n"), None);

        assert_eq!(content, "<<<<<<< HEAD\nours\n=======\n>>>>>>>\n");
    }

    #[test]
    fn content_without_a_trailing_newline_runs_into_the_marker() {
        let content = conflict_content(Some("ours"), Some("theirs"));

        assert_eq!(content, "<<<<<<< HEAD\nours=======\ntheirs>>>>>>>\n");
    }
}
