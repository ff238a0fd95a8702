//! Unit tests for temperature measurement

use crate::common::create_mock_driver;
use crate::common::mock_interface::{REG_CTRL0, REG_TOUT};
use crate::common::test_utils::assert_float_eq;
use crate::common::Operation;
use mmc56x3::{DataRate, Error, OperationMode};

#[test]
fn test_temperature_zero_code() {
    let (mut driver, interface, _delay) = create_mock_driver();

    interface.set_temperature_raw(0);
    let temp = driver.temperature().unwrap();

    assert_float_eq(temp, -75.0, 1e-4);
}

#[test]
fn test_temperature_full_scale() {
    let (mut driver, interface, _delay) = create_mock_driver();

    interface.set_temperature_raw(255);
    let temp = driver.temperature().unwrap();

    assert_float_eq(temp, 129.0, 1e-4);
}

#[test]
fn test_temperature_affine_over_all_codes() {
    let (mut driver, interface, _delay) = create_mock_driver();

    for raw in 0..=u8::MAX {
        interface.set_temperature_raw(raw);
        let temp = driver.temperature().unwrap();
        assert_float_eq(temp, 0.8 * f32::from(raw) - 75.0, 1e-4);
    }
}

#[test]
fn test_temperature_read_raw() {
    let (mut driver, interface, _delay) = create_mock_driver();

    interface.set_temperature_raw(125);

    assert_eq!(driver.read_temperature_raw().unwrap(), 125);
}

#[test]
fn test_temperature_transaction_sequence() {
    let (mut driver, interface, _delay) = create_mock_driver();

    interface.set_temperature_raw(100);
    driver.temperature().unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Write {
                address: REG_CTRL0,
                value: 0x02
            },
            Operation::Read {
                address: 0x18,
                len: 1
            },
            Operation::Read {
                address: REG_TOUT,
                len: 1
            },
        ]
    );
}

#[test]
fn test_temperature_rejected_in_continuous_mode() {
    let (mut driver, interface, _delay) = create_mock_driver();

    driver.set_data_rate(DataRate::Hz(10)).unwrap();
    driver.set_operation_mode(OperationMode::Continuous).unwrap();
    interface.clear_operations();

    let result = driver.temperature();

    assert!(matches!(result, Err(Error::ContinuousModeActive)));
    assert!(interface.operations().is_empty(), "No bus traffic expected");
}

#[test]
fn test_temperature_available_again_after_leaving_continuous_mode() {
    let (mut driver, interface, _delay) = create_mock_driver();

    driver.set_data_rate(DataRate::Hz(10)).unwrap();
    driver.set_operation_mode(OperationMode::Continuous).unwrap();
    driver.set_operation_mode(OperationMode::SingleShot).unwrap();

    interface.set_temperature_raw(125);
    assert_float_eq(driver.temperature().unwrap(), 25.0, 1e-4);
}
