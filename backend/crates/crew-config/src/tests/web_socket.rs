use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

#[test]
#[serial]
fn given_send_buffer_zero_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buf = EnvGuard::set("CREW_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_send_buffer_over_limit_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buf = EnvGuard::set("CREW_WS_SEND_BUFFER_SIZE", "20000");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_default_send_buffer_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
    assert_eq!(config.websocket.send_buffer_size, 100);
}
