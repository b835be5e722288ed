use ledger_xdr::{
    ByteCursor, Error, Int128Parts, Int256Parts, UInt128Parts, UInt256Parts, XdrDecode, XdrEncode,
    XdrWriter, decode_fixed_width_bigint, encode_fixed_width_bigint,
};
use num_bigint::BigInt;
use proptest::prelude::*;

fn big(v: i128) -> BigInt {
    BigInt::from(v)
}

#[test]
fn test_twos_complement_hyper() {
    assert_eq!(encode_fixed_width_bigint(&big(-1), 8, true).unwrap(), [0xFF; 8]);
    assert_eq!(encode_fixed_width_bigint(&big(0), 8, true).unwrap(), [0x00; 8]);
    assert_eq!(decode_fixed_width_bigint(&[0xFF; 8], true), big(-1));
    assert_eq!(decode_fixed_width_bigint(&[0xFF; 8], false), big(u64::MAX as i128));
}

#[test]
fn test_signed_hyper_bounds() {
    assert_eq!(
        encode_fixed_width_bigint(&big(i64::MIN as i128), 8, true).unwrap(),
        [0x80, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        encode_fixed_width_bigint(&big(i64::MAX as i128), 8, true).unwrap(),
        [0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
    );
    assert_eq!(
        encode_fixed_width_bigint(&big(i64::MAX as i128 + 1), 8, true).unwrap_err(),
        Error::IntegerOutOfRange { width: 8 }
    );
    assert_eq!(
        encode_fixed_width_bigint(&big(i64::MIN as i128 - 1), 8, true).unwrap_err(),
        Error::IntegerOutOfRange { width: 8 }
    );
}

#[test]
fn test_zero_width() {
    // Only zero fits in no bytes; the sign byte of -1 is never dropped.
    assert_eq!(
        encode_fixed_width_bigint(&big(-1), 0, true).unwrap_err(),
        Error::IntegerOutOfRange { width: 0 }
    );
    assert_eq!(
        encode_fixed_width_bigint(&big(1), 0, true).unwrap_err(),
        Error::IntegerOutOfRange { width: 0 }
    );
    assert!(encode_fixed_width_bigint(&big(0), 0, true).unwrap().is_empty());
    assert!(encode_fixed_width_bigint(&big(0), 0, false).unwrap().is_empty());
    assert_eq!(encode_fixed_width_bigint(&big(-1), 1, true).unwrap(), [0xFF]);
    assert_eq!(decode_fixed_width_bigint(&[0xFF], true), big(-1));
}

#[test]
fn test_unsigned_full_width() {
    // Top bit set: no extra sign byte is needed for an unsigned slot.
    assert_eq!(encode_fixed_width_bigint(&big(u64::MAX as i128), 8, false).unwrap(), [0xFF; 8]);
    assert_eq!(encode_fixed_width_bigint(&big(0x80), 1, false).unwrap(), [0x80]);
    assert_eq!(
        encode_fixed_width_bigint(&big(0x80), 1, true).unwrap_err(),
        Error::IntegerOutOfRange { width: 1 }
    );
    assert_eq!(
        encode_fixed_width_bigint(&big(u64::MAX as i128 + 1), 8, false).unwrap_err(),
        Error::IntegerOutOfRange { width: 8 }
    );
}

#[test]
fn test_unsigned_rejects_negative() {
    assert_eq!(
        encode_fixed_width_bigint(&big(-1), 8, false).unwrap_err(),
        Error::IntegerOutOfRange { width: 8 }
    );
}

#[test]
fn test_left_padding() {
    assert_eq!(encode_fixed_width_bigint(&big(0x0102), 4, false).unwrap(), [0, 0, 1, 2]);
    assert_eq!(encode_fixed_width_bigint(&big(-0x0102), 4, true).unwrap(), [0xFF, 0xFF, 0xFE, 0xFE]);
}

#[test]
fn test_cursor_and_writer_bigint() {
    let mut w = XdrWriter::new(Vec::new());
    w.write_fixed_width_bigint(&big(-5), 16, true).unwrap();
    let bytes = w.into_inner();
    assert_eq!(bytes.len(), 16);
    let mut cur = ByteCursor::new(&bytes);
    assert_eq!(cur.read_fixed_width_bigint(16, true).unwrap(), big(-5));
    assert!(cur.is_empty());
}

#[test]
fn test_int128_parts_layout() {
    let parts = Int128Parts::from(-1i128);
    assert_eq!(parts, Int128Parts { hi: -1, lo: u64::MAX });
    assert_eq!(parts.to_xdr().unwrap(), [0xFF; 16]);
    assert_eq!(parts.to_bigint(), big(-1));

    let parts = Int128Parts::from(1i128 << 64);
    assert_eq!(parts, Int128Parts { hi: 1, lo: 0 });
    assert_eq!(i128::from(parts), 1i128 << 64);
}

#[test]
fn test_uint128_parts() {
    let parts = UInt128Parts::from(u128::MAX);
    assert_eq!(parts, UInt128Parts { hi: u64::MAX, lo: u64::MAX });
    assert_eq!(BigInt::from(parts), BigInt::from(u128::MAX));
    assert_eq!(UInt128Parts::from_xdr(&parts.to_xdr().unwrap()).unwrap(), parts);
}

#[test]
fn test_int256_minus_one() {
    let parts = Int256Parts::try_from(&big(-1)).unwrap();
    assert_eq!(
        parts,
        Int256Parts { hi_hi: -1, hi_lo: u64::MAX, lo_hi: u64::MAX, lo_lo: u64::MAX }
    );
    assert_eq!(parts.to_bigint(), big(-1));
}

#[test]
fn test_int256_bounds() {
    let min = -(BigInt::from(1i32) << 255usize);
    let parts = Int256Parts::try_from(&min).unwrap();
    assert_eq!(parts, Int256Parts { hi_hi: i64::MIN, hi_lo: 0, lo_hi: 0, lo_lo: 0 });
    assert_eq!(parts.to_bigint(), min);

    let too_small = min - 1;
    assert_eq!(
        Int256Parts::try_from(&too_small).unwrap_err(),
        Error::IntegerOutOfRange { width: 32 }
    );
}

#[test]
fn test_uint256_max() {
    let max = (BigInt::from(1) << 256) - 1;
    let parts = UInt256Parts::try_from(&max).unwrap();
    assert_eq!(parts.to_xdr().unwrap(), [0xFF; 32]);
    assert!(UInt256Parts::try_from(&(max + 1)).is_err());
}

#[test]
fn test_parts_truncated_input() {
    assert!(matches!(
        Int256Parts::from_xdr(&[0; 31]),
        Err(Error::UnexpectedEndOfData { position: 0, needed: 32 })
    ));
}

proptest! {
    #[test]
    fn prop_i128_matches_native(v in any::<i128>()) {
        let parts = Int128Parts::from(v);
        prop_assert_eq!(parts.to_bigint(), BigInt::from(v));
        prop_assert_eq!(Int128Parts::try_from(&BigInt::from(v)).unwrap(), parts);
        prop_assert_eq!(parts.to_xdr().unwrap(), v.to_be_bytes().to_vec());
    }

    #[test]
    fn prop_int256_sign_extends_i128(v in any::<i128>()) {
        let parts = Int256Parts::try_from(&BigInt::from(v)).unwrap();
        let fill = if v < 0 { u64::MAX } else { 0 };
        prop_assert_eq!(parts.hi_hi, fill as i64);
        prop_assert_eq!(parts.hi_lo, fill);
        prop_assert_eq!(parts.to_bigint(), BigInt::from(v));
    }

    #[test]
    fn prop_int256_roundtrip_all_bit_patterns(bytes in prop::array::uniform32(any::<u8>())) {
        let value = BigInt::from_signed_bytes_be(&bytes);
        let encoded = encode_fixed_width_bigint(&value, 32, true).unwrap();
        prop_assert_eq!(&encoded[..], &bytes[..]);
        let parts = Int256Parts::from_xdr(&bytes).unwrap();
        prop_assert_eq!(parts.to_bigint(), value.clone());
        prop_assert_eq!(Int256Parts::try_from(&value).unwrap(), parts);
    }

    #[test]
    fn prop_uint256_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let value = decode_fixed_width_bigint(&bytes, false);
        prop_assert_eq!(encode_fixed_width_bigint(&value, 32, false).unwrap(), bytes.to_vec());
        prop_assert_eq!(UInt256Parts::from_xdr(&bytes).unwrap().to_bigint(), value);
    }

    #[test]
    fn prop_hyper_roundtrip(v in any::<i64>(), u in any::<u64>()) {
        let signed = encode_fixed_width_bigint(&BigInt::from(v), 8, true).unwrap();
        prop_assert_eq!(signed, v.to_be_bytes().to_vec());
        prop_assert_eq!(decode_fixed_width_bigint(&v.to_be_bytes(), true), BigInt::from(v));
        let unsigned = encode_fixed_width_bigint(&BigInt::from(u), 8, false).unwrap();
        prop_assert_eq!(unsigned, u.to_be_bytes().to_vec());
    }
}
