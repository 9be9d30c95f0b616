//! Integration tests for the `validate` command.
use fireplain::cli::handle_validate_command;
use fireplain::log::is_logger_initialised;
use fireplain::settings::Settings;
use std::path::PathBuf;

/// Get the path to the example dataset.
fn get_dataset_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("FIREPLAIN_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_dataset_dir(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
