//! Unit tests for bus error propagation and recovery

use crate::common::mock_interface::{REG_CTRL2, REG_STATUS, REG_TOUT};
use crate::common::{MockError, create_mock_driver};
use mmc56x3::{DataRate, Error, OUT_X_L, OperationMode};

#[test]
fn test_trigger_write_failure() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.fail_next_write();

    let result = driver.magnetic();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(
        interface.status_read_count(),
        0,
        "Nothing is polled when the trigger never reached the chip"
    );
}

#[test]
fn test_status_read_failure() {
    let (mut driver, interface, delay) = create_mock_driver();
    interface.fail_reads_of(Some(REG_STATUS));

    assert!(matches!(
        driver.magnetic(),
        Err(Error::Bus(MockError::Communication))
    ));
    assert!(matches!(
        driver.temperature(),
        Err(Error::Bus(MockError::Communication))
    ));
    // The poll loop stops at the first bus error
    assert_eq!(delay.elapsed_ns(), 0);
}

#[test]
fn test_output_block_read_failure() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.fail_reads_of(Some(OUT_X_L));

    let result = driver.read_magnetic_raw();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(interface.status_read_count(), 1);
}

#[test]
fn test_temperature_output_read_failure() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.fail_reads_of(Some(REG_TOUT));

    let result = driver.read_temperature_raw();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
}

#[test]
fn test_product_id_read_failure() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.fail_next_read();

    assert!(matches!(
        driver.product_id(),
        Err(Error::Bus(MockError::Communication))
    ));
    assert_eq!(driver.product_id().unwrap(), 0x10);
}

#[test]
fn test_recovery_after_bus_error() {
    let (mut driver, interface, _delay) = create_mock_driver();

    interface.fail_reads_of(Some(REG_STATUS));
    assert!(driver.magnetic().is_err());

    interface.fail_reads_of(None);
    interface.set_mag_counts((1 << 19) + 160, 1 << 19, 1 << 19);
    let field = driver.magnetic().unwrap();
    assert!((field.x - 1.0).abs() < 1e-4);

    interface.fail_next_write();
    assert!(driver.temperature().is_err());
    interface.set_temperature_raw(125);
    assert!((driver.temperature().unwrap() - 25.0).abs() < 1e-4);
}

#[test]
fn test_failed_data_rate_leaves_cache_untouched() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.fail_next_write();

    let result = driver.set_data_rate(DataRate::Hz(100));

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(driver.data_rate(), DataRate::Hz(0));
}

#[test]
fn test_cached_rate_follows_odr_when_later_write_fails() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.fail_writes_of(Some(REG_CTRL2));

    let result = driver.set_data_rate(DataRate::Hz(100));

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    // ODR already holds 100 Hz on the chip
    assert_eq!(driver.data_rate(), DataRate::Hz(100));

    interface.fail_writes_of(None);
    driver.set_operation_mode(OperationMode::Continuous).unwrap();
    assert_eq!(driver.operation_mode(), OperationMode::Continuous);
}

#[test]
fn test_failed_mode_switch_leaves_mode_untouched() {
    let (mut driver, interface, _delay) = create_mock_driver();
    driver.set_data_rate(DataRate::Hz(10)).unwrap();
    interface.fail_next_write();

    let result = driver.set_operation_mode(OperationMode::Continuous);

    assert!(result.is_err());
    assert_eq!(driver.operation_mode(), OperationMode::SingleShot);
}

#[test]
fn test_error_debug_output() {
    let error: Error<MockError> = Error::Bus(MockError::Communication);
    assert!(format!("{error:?}").contains("Communication"));

    let error: Error<MockError> = Error::DeviceNotFound(0x42);
    assert!(format!("{error:?}").contains("66"));
}
