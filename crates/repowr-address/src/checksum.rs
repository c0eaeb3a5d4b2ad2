//! CRC-16/XMODEM, the checksum trailing every friendly address.

/// CRC-16/XMODEM: poly 0x1021, init 0, no reflection, no final xor.
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Split `bytes` into payload and big-endian checksum and compare.
///
/// Returns `(expected, found)` on mismatch. Callers guarantee at least two
/// bytes.
pub(crate) fn verify_trailing(bytes: &[u8]) -> Result<(), (u16, u16)> {
    let (payload, tail) = bytes.split_at(bytes.len() - 2);
    let expected = crc16_xmodem(payload);
    let found = u16::from_be_bytes([tail[0], tail[1]]);
    if expected == found {
        Ok(())
    } else {
        Err((expected, found))
    }
}
