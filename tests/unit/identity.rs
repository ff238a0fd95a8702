//! Unit tests for construction and the product ID check

use crate::common::mock_interface::{REG_CTRL1, REG_PRODUCT_ID};
use crate::common::{MockDelay, MockError, MockInterface, Operation};
use mmc56x3::{Error, Mmc56x3Driver, PRODUCT_ID_VALUE};

#[test]
fn test_new_succeeds_with_expected_product_id() {
    let interface = MockInterface::new();
    let result = Mmc56x3Driver::new(interface.clone(), MockDelay::new());
    assert!(result.is_ok(), "Construction should succeed for 0x10");
}

#[test]
fn test_new_rejects_every_other_product_id() {
    for id in (0..=u8::MAX).filter(|&id| id != PRODUCT_ID_VALUE) {
        let interface = MockInterface::new();
        interface.set_product_id(id);

        match Mmc56x3Driver::new(interface.clone(), MockDelay::new()) {
            Err(Error::DeviceNotFound(read)) => assert_eq!(read, id),
            Err(e) => panic!("Expected DeviceNotFound for 0x{id:02X}, got {e:?}"),
            Ok(_) => panic!("Construction should fail for product ID 0x{id:02X}"),
        }
    }
}

#[test]
fn test_failed_identity_check_does_not_reset() {
    let interface = MockInterface::new();
    interface.set_product_id(0x30);
    let delay = MockDelay::new();

    let result = Mmc56x3Driver::new(interface.clone(), delay.clone());
    assert!(matches!(result, Err(Error::DeviceNotFound(0x30))));

    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            address: REG_PRODUCT_ID,
            len: 1
        }],
        "Only the product ID should be read"
    );
    assert_eq!(delay.elapsed_ns(), 0);
}

#[test]
fn test_new_reads_id_then_resets() {
    let interface = MockInterface::new();
    let delay = MockDelay::new();
    let _driver = Mmc56x3Driver::new(interface.clone(), delay.clone()).unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: REG_PRODUCT_ID,
                len: 1
            },
            Operation::Write {
                address: REG_CTRL1,
                value: 0x80
            },
        ]
    );
    assert!(delay.elapsed_ms() >= 20);
}

#[test]
fn test_new_propagates_bus_error() {
    let interface = MockInterface::new();
    interface.fail_next_read();

    let result = Mmc56x3Driver::new(interface, MockDelay::new());
    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
}

#[test]
fn test_product_id_can_be_reread() {
    let interface = MockInterface::new();
    let mut driver = Mmc56x3Driver::new(interface.clone(), MockDelay::new()).unwrap();

    assert_eq!(driver.product_id().unwrap(), PRODUCT_ID_VALUE);
}
