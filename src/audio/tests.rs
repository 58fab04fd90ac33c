use std::path::Path;

use super::sink::open_decoder;
use crate::player::OutputError;

#[test]
fn missing_file_is_an_open_error() {
    let err = open_decoder(Path::new("/definitely/not/here.mp3")).err().expect("expected an error");
    assert!(matches!(err, OutputError::Open { .. }));
    assert!(err.to_string().contains("here.mp3"));
}

#[test]
fn garbage_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    std::fs::write(&path, b"this is not audio at all").unwrap();

    let err = open_decoder(&path).err().expect("expected an error");
    assert!(matches!(err, OutputError::Decode { .. }));
}
