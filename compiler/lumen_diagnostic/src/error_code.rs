//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the compiler phase. Used for `--explain` lookups.

use std::fmt;

/// Declares the `ErrorCode` enum together with its string form and the
/// one-line explanation shown by `lumen --explain`.
macro_rules! error_codes {
    ($($code:ident => $description:literal,)*) => {
        /// Error codes for all compiler diagnostics.
        ///
        /// Format: E#### where the first digit indicates the phase:
        /// - E0xxx: Lexer errors
        /// - E1xxx: Parser errors
        /// - E2xxx: Semantic errors (types, names, imports)
        /// - E3xxx: Configuration errors
        /// - E4xxx: I/O errors
        /// - E9xxx: Internal compiler errors
        /// - W2xxx: Semantic warnings
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $(
                #[doc = $description]
                $code,
            )*
        }

        impl ErrorCode {
            /// All error code variants, in declaration order.
            pub const ALL: &[ErrorCode] = &[$(ErrorCode::$code,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ErrorCode::$code => stringify!($code),)*
                }
            }

            /// One-line explanation of the error.
            pub fn description(&self) -> &'static str {
                match self {
                    $(ErrorCode::$code => $description,)*
                }
            }
        }
    };
}

error_codes! {
    // Lexer
    E0001 => "Unterminated string literal",
    E0002 => "Invalid character in source",
    E0003 => "Invalid number literal or unit",
    E0004 => "Invalid color literal",
    E0005 => "Unterminated block comment",
    E0006 => "Invalid escape sequence in string literal",
    // Parser
    E1001 => "Unexpected token",
    E1002 => "Expected expression",
    E1003 => "Unclosed delimiter",
    E1004 => "Expected identifier",
    E1005 => "Expected type",
    E1006 => "Invalid assignment target",
    E1007 => "Nesting too deep",
    // Semantic
    E2001 => "Type mismatch",
    E2002 => "Unknown element type",
    E2003 => "Unknown identifier or property",
    E2004 => "Duplicate property or callback declaration",
    E2005 => "Duplicate element id",
    E2006 => "Unknown callback",
    E2007 => "No component found in document",
    E2008 => "Imported file not found",
    E2009 => "Imported name is not exported by the file",
    E2010 => "Import cycle",
    E2011 => "Property is not writable from this location",
    E2012 => "Argument count mismatch",
    E2013 => "Recursive component instantiation",
    E2014 => "Unknown property type",
    E2015 => "Duplicate binding for the same property",
    E2016 => "Operator not supported for operand types",
    E2017 => "Duplicate component name",
    // Configuration
    E3001 => "Unknown style",
    // I/O
    E4001 => "Cannot read source file",
    // Internal
    E9001 => "Internal compiler error",
    // Warnings
    W2001 => "Main component is not exported",
    W2002 => "Imported name is never used",
}

impl ErrorCode {
    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a semantic error (E2xxx range).
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a configuration error (E3xxx range).
    pub fn is_config_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Check if this is an I/O error (E4xxx range).
    pub fn is_io_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Check if this is a warning code (Wxxx range).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an error code string like `"E2001"` or `"w2001"` (case-insensitive).
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
