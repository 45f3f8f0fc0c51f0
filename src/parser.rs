//! JSONP response interpretation
//!
//! The portal answers the login GET with a JSONP envelope such as
//! `dr1003({"result":1,...})`. Extraction is deliberately tolerant: the
//! payload is whatever sits between the first `(` and the last `)`, and the
//! callback name is never validated.

use regex::Regex;

use crate::models::{LoginFailure, LoginOutcome, LoginPayload};

/// Pull the JSON payload out of a JSONP envelope
///
/// Greedy match, so nested parentheses inside the JSON survive. Payloads
/// whose string values contain unbalanced parentheses will mis-extract;
/// the portal's own client behaves the same way.
pub fn extract_jsonp(body: &str) -> Option<String> {
    let re = Regex::new(r"\((.*)\)").ok()?;
    re.captures(body)?.get(1).map(|m| m.as_str().to_string())
}

/// Classify a login response into an outcome
///
/// The status check comes first and ignores the body entirely; a 2xx body
/// then goes through envelope extraction, JSON parsing, and the `result`
/// check. Pure function, no hidden state.
pub fn interpret(body: &str, status: u16) -> LoginOutcome {
    if !(200..300).contains(&status) {
        return Err(LoginFailure::Status(status));
    }

    let json = extract_jsonp(body).ok_or(LoginFailure::Envelope)?;

    let payload: LoginPayload =
        serde_json::from_str(&json).map_err(|e| LoginFailure::Json(e.to_string()))?;

    if payload.result == 1 {
        Ok(payload)
    } else {
        Err(LoginFailure::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_success() {
        let outcome = interpret(r#"dr1003({"result":1,"uid":"2021001"})"#, 200);
        let payload = outcome.unwrap();
        assert_eq!(payload.result, 1);
        assert_eq!(payload.uid.as_deref(), Some("2021001"));
    }

    #[test]
    fn test_interpret_rejected() {
        let outcome = interpret(r#"dr1003({"result":0})"#, 200);
        assert_eq!(outcome.unwrap_err(), LoginFailure::Rejected);
    }

    #[test]
    fn test_interpret_missing_result_is_rejected() {
        let outcome = interpret(r#"dr1003({"aolno":3})"#, 200);
        assert_eq!(outcome.unwrap_err(), LoginFailure::Rejected);
    }

    #[test]
    fn test_interpret_not_jsonp() {
        let outcome = interpret("not jsonp", 200);
        assert_eq!(outcome.unwrap_err(), LoginFailure::Envelope);
    }

    #[test]
    fn test_interpret_empty_body() {
        let outcome = interpret("", 200);
        assert_eq!(outcome.unwrap_err(), LoginFailure::Envelope);
    }

    #[test]
    fn test_interpret_malformed_json() {
        let outcome = interpret("dr1003({invalid json})", 200);
        assert!(matches!(outcome.unwrap_err(), LoginFailure::Json(_)));
    }

    #[test]
    fn test_interpret_bad_status_ignores_body() {
        let outcome = interpret(r#"dr1003({"result":1})"#, 403);
        let err = outcome.unwrap_err();
        assert_eq!(err, LoginFailure::Status(403));
        assert_eq!(err.to_string(), "network request failed: status 403");
    }

    #[test]
    fn test_extract_tolerates_nested_parens() {
        let body = r#"cb({"v46ip":"10.2.3.4 (wlan)","result":1})"#;
        assert_eq!(
            extract_jsonp(body).as_deref(),
            Some(r#"{"v46ip":"10.2.3.4 (wlan)","result":1}"#)
        );
        assert!(interpret(body, 200).is_ok());
    }

    #[test]
    fn test_interpret_is_idempotent() {
        let body = r#"dr1003({"result":0})"#;
        assert_eq!(interpret(body, 200), interpret(body, 200));
        assert_eq!(interpret(body, 500), interpret(body, 500));
    }
}
