/// Rejected user input for the account, comment and report forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please select a reason for reporting.")]
    MissingReportReason,

    #[error("Please provide some details for your report.")]
    BlankReportDetails,

    #[error("Comment text cannot be empty.")]
    BlankComment,

    #[error("Username and password are required.")]
    MissingCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Trimmed comment text, or `BlankComment`.
pub fn validate_comment_text(text: &str) -> Result<String, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::BlankComment);
    }
    Ok(trimmed.to_string())
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), InputError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(InputError::MissingCredentials);
    }
    Ok(())
}

/// Registration form check: credentials present and the confirmation matches.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), InputError> {
    validate_credentials(username, password)?;
    if password != confirmation {
        return Err(InputError::PasswordMismatch);
    }
    Ok(())
}
