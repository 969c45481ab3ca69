use super::{BinaryRead, BinaryWrite};
use std::io::Cursor;

#[test]
fn test_binary_roundtrip() {
    let mut buf: Vec<u8> = Vec::new();
    buf.write_u64_le(0xdead_beef_0102_0304).unwrap();
    buf.write_u32_le(42).unwrap();
    buf.write_i32_le(-7).unwrap();
    buf.write_u8_le(0xab).unwrap();
    buf.write_u64_array_le(&[1, 2, 3]).unwrap();

    let mut r = Cursor::new(buf);
    assert_eq!(r.read_u64_le().unwrap(), 0xdead_beef_0102_0304);
    assert_eq!(r.read_u32_le().unwrap(), 42);
    assert_eq!(r.read_i32_le().unwrap(), -7);
    assert_eq!(r.read_u8_le().unwrap(), 0xab);
    assert_eq!(r.read_u64_vec_le(3).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_short_read_is_error() {
    let mut r = Cursor::new(vec![1u8, 2, 3]);
    assert!(r.read_u64_le().is_err());
}
