//! Unit tests for session configuration validation.

use super::*;
use rstest::{fixture, rstest};
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_toggles(key: &NamedTempFile) -> SessionToggles {
    SessionToggles {
        key_file: key.path().to_path_buf(),
        cookie_secure: Some(true),
        same_site: Some("Strict".to_owned()),
        allow_ephemeral: Some(false),
    }
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_explicit_settings(release_key: NamedTempFile) {
    let settings = session_settings(&release_toggles(&release_key), BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn same_key_file_derives_the_same_key(release_key: NamedTempFile) {
    let toggles = release_toggles(&release_key);
    let first = session_settings(&toggles, BuildMode::Release).expect("first");
    let second = session_settings(&toggles, BuildMode::Release).expect("second");
    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
#[case("session_cookie_secure")]
#[case("session_allow_ephemeral")]
fn release_requires_explicit_toggles(release_key: NamedTempFile, #[case] name: &str) {
    let mut toggles = release_toggles(&release_key);
    match name {
        "session_cookie_secure" => toggles.cookie_secure = None,
        _ => toggles.allow_ephemeral = None,
    }
    let err = expect_error(
        session_settings(&toggles, BuildMode::Release),
        "missing toggle should fail",
    );
    assert!(
        matches!(err, SessionConfigError::MissingSetting { name: actual } if actual == name),
        "{err}"
    );
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let err = expect_error(
        session_settings(&release_toggles(&short), BuildMode::Release),
        "short key should fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_key_file(release_key: NamedTempFile) {
    let toggles = SessionToggles {
        key_file: release_key.path().with_extension("missing"),
        ..release_toggles(&release_key)
    };
    let err = expect_error(
        session_settings(&toggles, BuildMode::Release),
        "missing key file should fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_key: NamedTempFile) {
    let toggles = SessionToggles {
        allow_ephemeral: Some(true),
        ..release_toggles(&release_key)
    };
    let err = expect_error(
        session_settings(&toggles, BuildMode::Release),
        "ephemeral keys should fail",
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case(BuildMode::Release, true)]
#[case(BuildMode::Debug, false)]
fn same_site_none_without_secure(
    release_key: NamedTempFile,
    #[case] mode: BuildMode,
    #[case] rejected: bool,
) {
    let toggles = SessionToggles {
        cookie_secure: Some(false),
        same_site: Some("none".to_owned()),
        ..release_toggles(&release_key)
    };
    match session_settings(&toggles, mode) {
        Ok(settings) => {
            assert!(!rejected, "expected rejection");
            assert_eq!(settings.same_site, SameSite::None);
        }
        Err(err) => {
            assert!(rejected, "unexpected error: {err}");
            assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
        }
    }
}

#[rstest]
#[case(BuildMode::Release, Err(()))]
#[case(BuildMode::Debug, Ok(SameSite::Lax))]
fn unknown_same_site(
    release_key: NamedTempFile,
    #[case] mode: BuildMode,
    #[case] expected: Result<SameSite, ()>,
) {
    let toggles = SessionToggles {
        same_site: Some("sideways".to_owned()),
        ..release_toggles(&release_key)
    };
    let outcome = session_settings(&toggles, mode)
        .map(|settings| settings.same_site)
        .map_err(|_| ());
    assert_eq!(outcome, expected);
}

#[rstest]
fn debug_falls_back_to_development_defaults() {
    let toggles = SessionToggles {
        key_file: PathBuf::from("/nonexistent/session_key"),
        ..SessionToggles::default()
    };
    let settings = session_settings(&toggles, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_replaces_keys_too_short_to_derive() {
    let short = key_file(8);
    let toggles = SessionToggles {
        key_file: short.path().to_path_buf(),
        ..SessionToggles::default()
    };
    assert!(session_settings(&toggles, BuildMode::Debug).is_ok());
}
