//! The `explain` command: describe a diagnostic code.

use lumen_diagnostic::ErrorCode;

/// Print the description of `code_str`. Returns whether the code exists.
pub fn explain_error(code_str: &str) -> bool {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX (errors) or WXXXX (warnings) where X is a digit.");
        eprintln!("Examples: E0001, E1001, E2003, W2001");
        return false;
    };
    println!("{}", explanation(code));
    true
}

fn explanation(code: ErrorCode) -> String {
    let kind = if code.is_warning() { "warning" } else { "error" };
    format!("{code} ({kind}): {}", code.description())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explanation_names_code_and_kind() {
        let text = explanation(ErrorCode::W2002);
        assert!(text.starts_with("W2002 (warning): "), "{text}");
        assert!(explain_error("e2003"));
        assert!(!explain_error("X1"));
    }
}
