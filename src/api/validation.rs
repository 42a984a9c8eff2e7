use super::ApiError;

const MAX_TEMPLATE_NAME_LEN: usize = 255;

/// Template names are shown as the mail subject, so they must say something.
pub fn validate_template_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Template name cannot be empty"));
    }

    if trimmed.chars().count() > MAX_TEMPLATE_NAME_LEN {
        return Err(ApiError::validation(format!(
            "Template name must be {MAX_TEMPLATE_NAME_LEN} characters or less"
        )));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_template_name() {
        assert_eq!(validate_template_name("  Welcome  ").unwrap(), "Welcome");
        assert!(validate_template_name("").is_err());
        assert!(validate_template_name("   ").is_err());
        assert!(validate_template_name(&"a".repeat(255)).is_ok());
        assert!(validate_template_name(&"a".repeat(256)).is_err());
    }
}
