//! Slug generation for repository and branch names.

/// Maximum length, in characters, of a generated branch name.
pub const MAX_BRANCH_NAME_LEN: usize = 100;

/// Map an arbitrary display name to a slug.
///
/// Alphanumerics, `-` and `_` are kept; every other character becomes `-`.
/// Runs of `-` collapse into one and leading/trailing `-` are stripped.
pub fn sanitize(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.chars() {
        let c = if c.is_alphanumeric() || c == '_' { c } else { '-' };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug.trim_matches('-').to_string()
}

/// Repository name for a project. Case is preserved.
pub fn repository_name(project_name: &str) -> String {
    sanitize(project_name)
}

/// Branch name for a task: the lower-cased slug, truncated.
pub fn branch_name(task_name: &str) -> String {
    sanitize(task_name)
        .to_lowercase()
        .chars()
        .take(MAX_BRANCH_NAME_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_project_name() {
        assert_eq!(sanitize("My Cool Project!!"), "My-Cool-Project");
    }

    #[test]
    fn test_sanitize_keeps_underscores_and_hyphens() {
        assert_eq!(sanitize("snake_case-name"), "snake_case-name");
        assert_eq!(sanitize("__init__"), "__init__");
    }

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize("a -- b"), "a-b");
        assert_eq!(sanitize("a/.,b"), "a-b");
        assert_eq!(sanitize("---lead and trail---"), "lead-and-trail");
    }

    #[test]
    fn test_sanitize_degenerate_inputs() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("!!!"), "");
        assert_eq!(sanitize("-"), "");
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize("Café Münster"), "Café-Münster");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "My Cool Project!!",
            "  spaces  everywhere ",
            "a--b--c",
            "-_-_-",
            "émoji 🚀 launch",
            "tabs\tand\nnewlines",
            "",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input: {input:?}");
            assert!(!once.contains("--"), "input: {input:?}");
            assert!(!once.starts_with('-') && !once.ends_with('-'), "input: {input:?}");
        }
    }

    #[test]
    fn test_repository_name_preserves_case() {
        assert_eq!(repository_name("Test Project"), "Test-Project");
    }

    #[test]
    fn test_branch_name_is_lowercase_without_task_id() {
        assert_eq!(branch_name("Fix Login Bug"), "fix-login-bug");
        assert_eq!(branch_name("Test Task 1"), "test-task-1");
    }

    #[test]
    fn test_branch_name_truncated() {
        let long = "word ".repeat(60);
        let branch = branch_name(&long);
        assert_eq!(branch.chars().count(), MAX_BRANCH_NAME_LEN);
        assert!(branch.starts_with("word-word"));
    }
}
