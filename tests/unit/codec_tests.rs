use bytes::BytesMut;
use exec_relay::bridge::LineCodec;
use exec_relay::AppError;
use tokio_util::codec::{Decoder, Encoder};

#[test]
fn decodes_complete_lines() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from("first\nsecond\n");

    assert_eq!(codec.decode(&mut buf).expect("decode"), Some("first".into()));
    assert_eq!(codec.decode(&mut buf).expect("decode"), Some("second".into()));
    assert_eq!(codec.decode(&mut buf).expect("decode"), None);
}

#[test]
fn buffers_partial_lines_until_terminator() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from("par");

    assert_eq!(codec.decode(&mut buf).expect("decode"), None);

    buf.extend_from_slice(b"tial\n");
    assert_eq!(codec.decode(&mut buf).expect("decode"), Some("partial".into()));
}

#[test]
fn yields_final_unterminated_line_at_eof() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from("tail");

    assert_eq!(codec.decode(&mut buf).expect("decode"), None);
    assert_eq!(codec.decode_eof(&mut buf).expect("decode"), Some("tail".into()));
    assert_eq!(codec.decode_eof(&mut buf).expect("decode"), None);
}

#[test]
fn enforces_line_length_bound() {
    let mut codec = LineCodec::new(8);
    let mut buf = BytesMut::from("this line is longer than eight bytes\n");

    let err = codec.decode(&mut buf).expect_err("must exceed bound");
    assert!(matches!(err, AppError::Bridge(_)));
}

#[test]
fn short_lines_pass_under_a_small_bound() {
    let mut codec = LineCodec::new(8);
    let mut buf = BytesMut::from("ok\n");

    assert_eq!(codec.decode(&mut buf).expect("decode"), Some("ok".into()));
}

#[test]
fn encoder_appends_terminator() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::new();

    codec.encode("+ OK".to_owned(), &mut buf).expect("encode");
    assert_eq!(&buf[..], b"+ OK\n");
}
