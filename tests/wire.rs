//! Exact bytes on the bus.

use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use ncv7718_dd::{Ncv7718, Ncv7718Error};

fn write(bytes: [u8; 2]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(bytes.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

fn transfer(out: [u8; 2], reply: [u8; 2]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::transfer(out.to_vec(), reply.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

#[test]
fn init_apply_close_sequence() {
    let expectations: Vec<SpiTransaction<u8>> = [
        write([0x80, 0x00]),
        write([0x01, 0x82]),
        transfer([0x01, 0x82], [0x01, 0x82]),
        write([0x80, 0x00]),
    ]
    .concat();
    let spi: SpiMock<u8> = SpiMock::new(&expectations);

    let mut hb = Ncv7718::new(spi);
    hb.init().unwrap();
    hb.set_output(0, 1).unwrap();
    let status = hb.apply().unwrap();
    assert_eq!(status.raw(), 0x0182);

    let mut spi = hb.close();
    spi.done();
}

#[test]
fn overcurrent_reply() {
    // HB1/HB2 enabled, HB1 high, OCS set
    let expectations: Vec<SpiTransaction<u8>> = [
        write([0x80, 0x00]),
        write([0x01, 0x82]),
        transfer([0x01, 0x82], [0x81, 0x82]),
        write([0x80, 0x00]),
    ]
    .concat();
    let spi: SpiMock<u8> = SpiMock::new(&expectations);

    let mut hb = Ncv7718::new(spi);
    hb.init().unwrap();
    hb.set_output(0, 1).unwrap();
    let err = hb.apply().unwrap_err();
    assert!(matches!(err, Ncv7718Error::OvercurrentShutoff(s) if s.raw() == 0x8182));

    let mut spi = hb.close();
    spi.done();
}
