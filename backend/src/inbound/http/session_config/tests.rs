//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file_of(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create key file");
    file.write_all(&vec![b'k'; len]).expect("write key file");
    file
}

#[fixture]
fn key_file() -> NamedTempFile {
    key_file_of(MIN_KEY_BYTES)
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_str().expect("UTF-8 temp path").to_owned()
}

/// A complete release configuration with `overrides` applied; `None`
/// removes a variable.
fn env_with(key_path: &str, overrides: &[(&str, Option<&str>)]) -> MockEnv {
    let mut vars: HashMap<String, String> = [
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value.to_owned()))
    .collect();
    for (name, value) in overrides {
        match value {
            Some(value) => vars.insert((*name).to_owned(), (*value).to_owned()),
            None => vars.remove(*name),
        };
    }

    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn variant(error: &SessionConfigError) -> String {
    match error {
        SessionConfigError::MissingEnv { name } => format!("missing {name}"),
        SessionConfigError::InvalidEnv { name, .. } => format!("invalid {name}"),
        SessionConfigError::KeyRead { .. } => "key read".to_owned(),
        SessionConfigError::KeyTooShort { .. } => "key too short".to_owned(),
        SessionConfigError::InsecureSameSiteNone => "insecure none".to_owned(),
        SessionConfigError::EphemeralNotAllowed => "ephemeral".to_owned(),
    }
}

#[rstest]
#[case(&[(COOKIE_SECURE_ENV, None)], "missing SESSION_COOKIE_SECURE")]
#[case(&[(COOKIE_SECURE_ENV, Some("maybe"))], "invalid SESSION_COOKIE_SECURE")]
#[case(&[(COOKIE_SECURE_ENV, Some(""))], "invalid SESSION_COOKIE_SECURE")]
#[case(&[(SAMESITE_ENV, None)], "missing SESSION_SAMESITE")]
#[case(&[(SAMESITE_ENV, Some("sideways"))], "invalid SESSION_SAMESITE")]
#[case(&[(ALLOW_EPHEMERAL_ENV, None)], "missing SESSION_ALLOW_EPHEMERAL")]
#[case(&[(ALLOW_EPHEMERAL_ENV, Some("yes"))], "ephemeral")]
#[case(&[(COOKIE_SECURE_ENV, Some("0")), (SAMESITE_ENV, Some("None"))], "insecure none")]
#[case(&[(KEY_FILE_ENV, Some("/nonexistent/quill/session_key"))], "key read")]
fn release_rejects_incomplete_configuration(
    key_file: NamedTempFile,
    #[case] overrides: &[(&str, Option<&str>)],
    #[case] expected: &str,
) {
    let env = env_with(&path_of(&key_file), overrides);
    match session_settings_from_env(&env, BuildMode::Release) {
        Ok(_) => panic!("expected {expected}"),
        Err(error) => assert_eq!(variant(&error), expected),
    }
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file_of(MIN_KEY_BYTES - 1);
    let env = env_with(&path_of(&short), &[]);
    match session_settings_from_env(&env, BuildMode::Release) {
        Ok(_) => panic!("short key accepted"),
        Err(SessionConfigError::KeyTooShort { length, min_len, .. }) => {
            assert_eq!((length, min_len), (MIN_KEY_BYTES - 1, MIN_KEY_BYTES));
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn release_accepts_complete_configuration(key_file: NamedTempFile) {
    let env = env_with(&path_of(&key_file), &[(SAMESITE_ENV, Some("lax"))]);
    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn key_file_contents_determine_the_key(key_file: NamedTempFile) {
    let env = env_with(&path_of(&key_file), &[]);
    let first = session_settings_from_env(&env, BuildMode::Release).expect("settings");
    let second = session_settings_from_env(&env, BuildMode::Release).expect("settings");
    assert_eq!(key_fingerprint(&first.key), key_fingerprint(&second.key));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let env = env_with(
        "/nonexistent/quill/session_key",
        &[
            (COOKIE_SECURE_ENV, None),
            (SAMESITE_ENV, Some("sideways")),
            (ALLOW_EPHEMERAL_ENV, Some("perhaps")),
        ],
    );
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_accepts_short_keys_and_insecure_none() {
    let short = key_file_of(8);
    let env = env_with(
        &path_of(&short),
        &[(COOKIE_SECURE_ENV, Some("no")), (SAMESITE_ENV, Some("None"))],
    );
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
#[case("1", Some(true))]
#[case(" Yes ", Some(true))]
#[case("n", Some(false))]
#[case("FALSE", Some(false))]
#[case("2", None)]
fn booleans_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parsing::parse_bool(raw), expected);
}
