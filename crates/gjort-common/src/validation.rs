//! Input validation for the API payloads.
//!
//! Every function accumulates human-readable messages for each rule the
//! payload breaks, so the API can return them all at once instead of
//! failing on the first.

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 128;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// Validate a registration payload. Empty result means the payload is ok.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate_username(username));
    if !is_valid_email(email) {
        errors.push("email must be a valid email address".to_string());
    }
    errors.extend(validate_password(password));
    errors
}

/// Validate a new-todo payload.
pub fn validate_new_todo(title: &str, description: Option<&str>) -> Vec<String> {
    let mut errors = validate_title(title);
    if let Some(desc) = description {
        errors.extend(validate_description(desc));
    }
    errors
}

/// Validate a partial todo update. Absent fields are not checked.
pub fn validate_todo_update(title: Option<&str>, description: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(title) = title {
        errors.extend(validate_title(title));
    }
    if let Some(desc) = description {
        errors.extend(validate_description(desc));
    }
    errors
}

fn validate_username(username: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        errors.push(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        errors.push("username may only contain letters, digits and underscores".to_string());
    }
    errors
}

fn validate_password(password: &str) -> Vec<String> {
    if password.len() < PASSWORD_MIN {
        vec![format!("password must be at least {PASSWORD_MIN} characters")]
    } else if password.len() > PASSWORD_MAX {
        vec![format!("password must be at most {PASSWORD_MAX} characters")]
    } else {
        Vec::new()
    }
}

fn validate_title(title: &str) -> Vec<String> {
    if title.trim().is_empty() {
        vec!["title must not be empty".to_string()]
    } else if title.chars().count() > TITLE_MAX {
        vec![format!("title must be at most {TITLE_MAX} characters")]
    } else {
        Vec::new()
    }
}

fn validate_description(description: &str) -> Vec<String> {
    if description.chars().count() > DESCRIPTION_MAX {
        vec![format!(
            "description must be at most {DESCRIPTION_MAX} characters"
        )]
    } else {
        Vec::new()
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if domain.contains('@') || email.contains(char::is_whitespace) {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration() {
        let errors = validate_registration("alice", "a@x.com", "secret1");
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_username_too_short() {
        let errors = validate_registration("ab", "a@x.com", "secret1");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("between 3 and 20"));
    }

    #[test]
    fn test_username_too_long() {
        let errors = validate_registration(&"a".repeat(21), "a@x.com", "secret1");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_username_bad_characters() {
        let errors = validate_registration("al ice", "a@x.com", "secret1");
        assert!(errors.iter().any(|e| e.contains("letters, digits")));
        let errors = validate_registration("al-ice", "a@x.com", "secret1");
        assert!(errors.iter().any(|e| e.contains("letters, digits")));
    }

    #[test]
    fn test_username_underscore_ok() {
        assert!(validate_registration("al_ice_9", "a@x.com", "secret1").is_empty());
    }

    #[test]
    fn test_password_too_short() {
        let errors = validate_registration("alice", "a@x.com", "short");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 6"));
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let errors = validate_registration("a!", "not-an-email", "x");
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@x.com."));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn test_new_todo_ok() {
        assert!(validate_new_todo("Buy milk", None).is_empty());
        assert!(validate_new_todo("Buy milk", Some("2 litres, semi-skimmed")).is_empty());
    }

    #[test]
    fn test_new_todo_empty_title() {
        let errors = validate_new_todo("", None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("must not be empty"));
        // Whitespace-only counts as empty
        assert_eq!(validate_new_todo("   ", None).len(), 1);
    }

    #[test]
    fn test_new_todo_title_at_limit() {
        assert!(validate_new_todo(&"x".repeat(TITLE_MAX), None).is_empty());
        assert_eq!(validate_new_todo(&"x".repeat(TITLE_MAX + 1), None).len(), 1);
    }

    #[test]
    fn test_new_todo_description_at_limit() {
        assert!(validate_new_todo("t", Some(&"d".repeat(DESCRIPTION_MAX))).is_empty());
        assert_eq!(
            validate_new_todo("t", Some(&"d".repeat(DESCRIPTION_MAX + 1))).len(),
            1
        );
    }

    #[test]
    fn test_update_absent_fields_skip_checks() {
        assert!(validate_todo_update(None, None).is_empty());
        assert!(validate_todo_update(Some("new title"), None).is_empty());
    }

    #[test]
    fn test_update_present_fields_checked() {
        assert_eq!(validate_todo_update(Some(""), None).len(), 1);
        assert_eq!(
            validate_todo_update(None, Some(&"d".repeat(DESCRIPTION_MAX + 1))).len(),
            1
        );
    }
}
