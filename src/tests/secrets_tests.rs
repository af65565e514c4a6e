use super::*;
use std::io::Cursor;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

#[test]
fn test_line_source_reads_access_then_secret() {
    let mut source = LineSecretSource::new(Cursor::new("AKIA-123\nsuper/secret==\n"));
    let creds = Credentials::read_from(&mut source).unwrap();
    assert_eq!(creds.access_key, "AKIA-123");
    assert_eq!(creds.secret_key, "super/secret==");
}

#[test]
fn test_line_source_strips_crlf_and_keeps_inner_spaces() {
    let mut source = LineSecretSource::new(Cursor::new("key with space\r\nlast-line-no-newline"));
    assert_eq!(
        source.read_secret(ACCESS_KEY_PROMPT, "access key").unwrap(),
        "key with space"
    );
    assert_eq!(
        source.read_secret(SECRET_KEY_PROMPT, "secret key").unwrap(),
        "last-line-no-newline"
    );
}

#[test]
fn test_line_source_only_consumes_two_lines() {
    let mut reader = Cursor::new("a\nb\nleftover\n");
    {
        let mut source = LineSecretSource::new(&mut reader);
        Credentials::read_from(&mut source).unwrap();
    }
    let mut rest = String::new();
    reader.read_line(&mut rest).unwrap();
    assert_eq!(rest, "leftover\n");
}

#[test]
fn test_line_source_exhausted_input() {
    let mut source = LineSecretSource::new(Cursor::new("only-access-key\n"));
    let err = Credentials::read_from(&mut source).unwrap_err();
    assert!(matches!(err, SecretError::Exhausted { what: "secret key" }));
    assert_eq!(err.to_string(), "no more input while reading secret key");
}

#[test]
fn test_line_source_rejects_empty_secret() {
    let mut source = LineSecretSource::new(Cursor::new("\nsecret\n"));
    let err = Credentials::read_from(&mut source).unwrap_err();
    assert!(matches!(err, SecretError::Empty { what: "access key" }));
}

#[test]
fn test_credentials_debug_is_redacted() {
    let creds = Credentials {
        access_key: "visible-access".to_string(),
        secret_key: "visible-secret".to_string(),
    };
    let debug = format!("{:?}", creds);
    assert!(!debug.contains("visible-access"));
    assert!(!debug.contains("visible-secret"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_apply_key_builds_and_edits_secret() {
    let mut secret = String::new();
    for c in "abcd".chars() {
        assert_eq!(apply_key(&mut secret, key(KeyCode::Char(c))), KeyOutcome::Continue);
    }
    apply_key(&mut secret, key(KeyCode::Backspace));
    assert_eq!(secret, "abc");
    assert_eq!(apply_key(&mut secret, key(KeyCode::Enter)), KeyOutcome::Submit);
    assert_eq!(secret, "abc");
}

#[test]
fn test_apply_key_control_sequences() {
    let mut secret = "typed".to_string();
    assert_eq!(apply_key(&mut secret, ctrl('u')), KeyOutcome::Continue);
    assert!(secret.is_empty());
    assert_eq!(apply_key(&mut secret, ctrl('c')), KeyOutcome::Cancel);
    assert_eq!(apply_key(&mut secret, ctrl('d')), KeyOutcome::Cancel);
    assert_eq!(apply_key(&mut secret, key(KeyCode::Esc)), KeyOutcome::Cancel);
    // Modified characters are not part of the secret.
    apply_key(&mut secret, ctrl('x'));
    assert!(secret.is_empty());
}

#[test]
fn test_apply_key_ignores_navigation() {
    let mut secret = "ab".to_string();
    apply_key(&mut secret, key(KeyCode::Left));
    apply_key(&mut secret, key(KeyCode::Tab));
    assert_eq!(secret, "ab");
}
