use ledger_xdr::{ByteCursor, Error, Limits};

#[test]
fn test_read_fixed_exact_width() {
    let mut cur = ByteCursor::new(&[0, 0, 0, 1]);
    assert_eq!(cur.read_u32().unwrap(), 1);
    assert!(cur.is_empty());
    cur.finish().unwrap();
}

#[test]
fn test_read_past_end_leaves_position() {
    let mut cur = ByteCursor::new(&[1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(cur.read_u32().unwrap(), 0x01020304);
    let err = cur.read_u32().unwrap_err();
    assert_eq!(err, Error::UnexpectedEndOfData { position: 4, needed: 4 });
    assert_eq!(cur.position(), 4);
    assert_eq!(cur.remaining(), [5, 6, 7]);
}

#[test]
fn test_read_fixed_overflowing_length() {
    let mut cur = ByteCursor::new(&[0; 4]);
    cur.read_fixed(2).unwrap();
    assert!(matches!(cur.read_fixed(usize::MAX), Err(Error::UnexpectedEndOfData { .. })));
    assert_eq!(cur.position(), 2);
}

#[test]
fn test_signed_integers() {
    let mut cur = ByteCursor::new(&[0xFF, 0xFF, 0xFF, 0xFE, 0x80, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(cur.read_i32().unwrap(), -2);
    assert_eq!(cur.read_i64().unwrap(), i64::MIN);
}

#[test]
fn test_unsigned_hyper() {
    let mut cur = ByteCursor::new(&[0xFF; 8]);
    assert_eq!(cur.read_u64().unwrap(), u64::MAX);
}

#[test]
fn test_read_bool_strict() {
    let mut cur = ByteCursor::new(&[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2]);
    assert!(cur.read_bool().unwrap());
    assert!(!cur.read_bool().unwrap());
    assert_eq!(cur.read_bool().unwrap_err(), Error::InvalidBooleanValue(2));
    assert_eq!(cur.position(), 8);
}

#[test]
fn test_fixed_opaque_does_not_skip_padding() {
    let mut cur = ByteCursor::new(&[b'a', b'b', b'c', 0, 0, 0, 0, 9]);
    assert_eq!(cur.read_opaque_fixed(3).unwrap(), b"abc");
    assert_eq!(cur.position(), 3);
    cur.skip_padding(3).unwrap();
    assert_eq!(cur.position(), 4);
    assert_eq!(cur.read_u32().unwrap(), 9);
}

#[test]
fn test_fixed_opaque_padded() {
    let mut cur = ByteCursor::new(&[1, 2, 3, 4, 5, 0, 0, 0]);
    assert_eq!(cur.read_opaque_fixed_padded(5).unwrap(), [1, 2, 3, 4, 5]);
    assert!(cur.is_empty());
}

#[test]
fn test_variable_opaque_ignores_padding_contents() {
    let mut cur = ByteCursor::new(&[0, 0, 0, 1, 0x61, 0xFF, 0xFF, 0xFF]);
    assert_eq!(cur.read_variable_opaque(None).unwrap(), b"a");
    assert!(cur.is_empty());
}

#[test]
fn test_variable_opaque_max() {
    let bytes = [0, 0, 0, 5, 1, 2, 3, 4, 5, 0, 0, 0];
    let mut cur = ByteCursor::new(&bytes);
    assert_eq!(
        cur.read_variable_opaque(Some(4)).unwrap_err(),
        Error::LengthExceedsMaximum { max: 4, got: 5 }
    );
    assert_eq!(cur.position(), 0);
    assert_eq!(cur.read_variable_opaque(Some(5)).unwrap(), [1, 2, 3, 4, 5]);
}

#[test]
fn test_variable_opaque_missing_padding() {
    let mut cur = ByteCursor::new(&[0, 0, 0, 2, 1, 2, 0]);
    assert!(matches!(
        cur.read_variable_opaque(None),
        Err(Error::UnexpectedEndOfData { .. })
    ));
    assert_eq!(cur.position(), 0);
}

#[test]
fn test_read_string() {
    let mut cur = ByteCursor::new(&[0, 0, 0, 2, 0x61, 0x62, 0, 0]);
    assert_eq!(cur.read_string(None).unwrap(), "ab");

    let mut cur = ByteCursor::new(&[0, 0, 0, 1, 0xC3, 0, 0, 0]);
    assert_eq!(cur.read_string(None).unwrap_err(), Error::InvalidUtf8);
    assert_eq!(cur.position(), 0);
}

#[test]
fn test_read_count_rejects_negative() {
    let mut cur = ByteCursor::new(&[0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(cur.read_count(None).unwrap_err(), Error::NegativeLength(-1));
    assert_eq!(cur.position(), 0);
}

#[test]
fn test_cursor_limits_cap_lengths() {
    let bytes = [0, 0, 0, 3, 1, 2, 3, 0];
    let mut cur = ByteCursor::with_limits(&bytes, Limits::len(2));
    assert_eq!(
        cur.read_variable_opaque(Some(10)).unwrap_err(),
        Error::LengthExceedsMaximum { max: 2, got: 3 }
    );
}

#[test]
fn test_nested_depth() {
    let mut cur = ByteCursor::with_limits(&[], Limits::depth(1));
    let err = cur.nested(|c| c.nested(|_| Ok(()))).unwrap_err();
    assert_eq!(err, Error::DepthLimitExceeded);
    // depth is released after each level
    cur.nested(|_| Ok(())).unwrap();
    cur.nested(|_| Ok(())).unwrap();
}

#[test]
fn test_finish_reports_trailing() {
    let mut cur = ByteCursor::new(&[0, 0, 0, 1, 0xEE]);
    cur.read_u32().unwrap();
    assert_eq!(cur.finish().unwrap_err(), Error::TrailingBytes(1));
}

#[test]
fn test_limits_from_config() {
    let limits: Limits = serde_json::from_str(r#"{"len": 1024}"#).unwrap();
    assert_eq!(limits, Limits { depth: u32::MAX, len: 1024 });
    assert_eq!(Limits::default(), Limits::none());
}
