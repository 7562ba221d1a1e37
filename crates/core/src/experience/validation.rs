use super::ExperienceError;

/// Checks that a title is present.
///
/// Whitespace-only titles count as missing. The title is stored as given;
/// no trimming happens here.
pub fn validate_title(title: &str) -> Result<(), ExperienceError> {
    if title.trim().is_empty() {
        return Err(ExperienceError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_title() {
        assert!(validate_title("Learned axum").is_ok());
    }

    #[test]
    fn accepts_non_ascii_title() {
        assert!(validate_title("テスト体験").is_ok());
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!(validate_title(""), Err(ExperienceError::EmptyTitle));
        assert_eq!(validate_title("  \t\n"), Err(ExperienceError::EmptyTitle));
    }
}
