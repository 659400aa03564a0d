use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2001.as_str(), "E2001");
    assert_eq!(ErrorCode::W2001.as_str(), "W2001");
}

#[test]
fn test_predicate_exclusivity() {
    for code in ErrorCode::ALL {
        let flags = [
            code.is_lexer_error(),
            code.is_parser_error(),
            code.is_semantic_error(),
            code.is_config_error(),
            code.is_io_error(),
            code.is_internal_error(),
            code.is_warning(),
        ];
        let true_count = flags.iter().filter(|&&f| f).count();
        assert_eq!(
            true_count, 1,
            "expected exactly 1 predicate true for {code}, got {true_count}"
        );
    }
}

#[test]
fn test_from_str_round_trips_all_codes() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e3001".parse::<ErrorCode>(), Ok(ErrorCode::E3001));
    assert!("E7777".parse::<ErrorCode>().is_err());
}

#[test]
fn test_every_code_has_description() {
    for code in ErrorCode::ALL {
        assert!(!code.description().is_empty(), "{code} has no description");
    }
    assert_eq!(ErrorCode::E3001.description(), "Unknown style");
}
