//! Unit tests for software reset

use crate::common::create_mock_driver;
use crate::common::mock_interface::REG_CTRL1;
use mmc56x3::{Bandwidth, DataRate, Error, OperationMode};

#[test]
fn test_reset_writes_sw_reset_bit() {
    let (mut driver, interface, _delay) = create_mock_driver();

    driver.reset().unwrap();

    assert_eq!(interface.writes(), vec![(REG_CTRL1, 0x80)]);
    assert_eq!(interface.status_read_count(), 0);
}

#[test]
fn test_reset_waits_at_least_20ms() {
    let (mut driver, _interface, delay) = create_mock_driver();

    driver.reset().unwrap();

    assert!(
        delay.elapsed_ns() >= 20_000_000,
        "Reset returned after only {} ns",
        delay.elapsed_ns()
    );
}

#[test]
fn test_reset_delay_follows_write() {
    let (mut driver, interface, delay) = create_mock_driver();

    interface.fail_next_write();
    let result = driver.reset();

    assert!(matches!(result, Err(Error::Bus(_))));
    assert_eq!(delay.elapsed_ns(), 0, "No wait when the reset write fails");
}

#[test]
fn test_reset_can_be_repeated() {
    let (mut driver, interface, delay) = create_mock_driver();

    for _ in 0..3 {
        driver.reset().unwrap();
    }

    assert_eq!(interface.writes(), vec![(REG_CTRL1, 0x80); 3]);
    assert!(delay.elapsed_ms() >= 60);
}

#[test]
fn test_reset_restores_default_configuration() {
    let (mut driver, _interface, _delay) = create_mock_driver();

    driver.set_data_rate(DataRate::Hz1000).unwrap();
    driver.set_operation_mode(OperationMode::Continuous).unwrap();
    assert_eq!(driver.bandwidth(), Bandwidth::Ms1_2);

    driver.reset().unwrap();

    assert_eq!(driver.bandwidth(), Bandwidth::Ms6_6);
    assert_eq!(driver.data_rate(), DataRate::Hz(0));
    assert_eq!(driver.operation_mode(), OperationMode::SingleShot);
}
