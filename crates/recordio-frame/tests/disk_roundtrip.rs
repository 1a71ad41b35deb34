use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use recordio_frame::{FrameError, FrameReader, FrameWriter, ReaderConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Entry {
    id: usize,
    payload: Vec<u8>,
    checksum: u64,
}

fn checksum(data: &[u8]) -> u64 {
    data.iter()
        .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
        })
}

/// Deterministic sizes spread over `0..max`.
fn sizes(count: usize, max: usize) -> Vec<usize> {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % max as u64) as usize
        })
        .collect()
}

#[test]
fn two_records_then_end_of_stream() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = dir.path().join("trivial.seq");

    let mut writer = FrameWriter::new(File::create(&path).expect("file should be creatable"));
    assert_eq!(writer.write_record(b"first message").unwrap(), 13);
    assert_eq!(writer.write_record(b"second message").unwrap(), 14);
    drop(writer);

    let file = File::open(&path).expect("file should open");
    let mut reader = FrameReader::new(BufReader::with_capacity(1024 * 1024, file));
    let mut buf = [0u8; 512];

    let n = reader.read_record(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"first message");
    let n = reader.read_record(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"second message");
    assert!(matches!(
        reader.read_record(&mut buf),
        Err(FrameError::EndOfStream)
    ));
}

#[test]
fn variable_sizes_round_trip() {
    let max = 1024 * 1024;
    let source: Vec<u8> = (0..max).map(|i| (i % 251) as u8).collect();
    let sizes = sizes(20, max);

    let mut wire = Vec::new();
    let mut writer = FrameWriter::new(&mut wire);
    for &size in &sizes {
        assert_eq!(writer.write_record(&source[..size]).unwrap(), size);
    }

    let mut reader = FrameReader::new(wire.as_slice());
    let mut buf = vec![0u8; max];
    for &size in &sizes {
        let n = reader.read_record(&mut buf).unwrap();
        assert_eq!(n, size);
        assert_eq!(&buf[..n], &source[..size]);
    }
    assert!(reader.read_record(&mut buf).unwrap_err().is_end_of_stream());
}

#[test]
fn json_entries_through_buffered_file() {
    let entries = 1000;
    let payload_size = 678;

    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = dir.path().join("entries.seq");

    {
        let file = File::create(&path).expect("file should be creatable");
        let mut writer = FrameWriter::new(BufWriter::new(file));
        for id in 0..entries {
            let payload: Vec<u8> = (0..payload_size).map(|i| ((i * 31 + id) % 256) as u8).collect();
            let entry = Entry {
                id,
                checksum: checksum(&payload),
                payload,
            };
            let json = serde_json::to_vec(&entry).unwrap();
            assert_eq!(writer.write_record(&json).unwrap(), json.len());
        }
        writer.get_mut().flush().unwrap();
    }

    let file = File::open(&path).expect("file should open");
    let mut reader = FrameReader::with_config(BufReader::new(file), ReaderConfig::exact());
    let mut buf = vec![0u8; 50_000];
    let mut count = 0usize;

    loop {
        let n = match reader.read_record(&mut buf) {
            Ok(n) => n,
            Err(FrameError::EndOfStream) => break,
            Err(err) => panic!("unexpected read error: {err}"),
        };
        let entry: Entry = serde_json::from_slice(&buf[..n]).unwrap();
        assert_eq!(entry.id, count);
        assert_eq!(entry.checksum, checksum(&entry.payload));
        count += 1;
    }

    assert_eq!(count, entries);
}

#[test]
fn oversized_records_skipped_in_file() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = dir.path().join("mixed.seq");

    let mut writer = FrameWriter::new(File::create(&path).unwrap());
    writer.write_record(b"small").unwrap();
    writer.write_record(&[0xAB; 4096]).unwrap();
    writer.write_record(b"tiny").unwrap();
    drop(writer);

    let mut reader = FrameReader::new(BufReader::new(File::open(&path).unwrap()));
    let mut buf = [0u8; 64];
    let mut delivered = Vec::new();
    let mut skipped = 0;

    loop {
        match reader.read_record(&mut buf) {
            Ok(n) => delivered.push(buf[..n].to_vec()),
            Err(err) if err.is_recoverable() => skipped += 1,
            Err(FrameError::EndOfStream) => break,
            Err(err) => panic!("unexpected read error: {err}"),
        }
    }

    assert_eq!(skipped, 1);
    assert_eq!(delivered, vec![b"small".to_vec(), b"tiny".to_vec()]);
}

#[test]
fn frames_iterator_over_file() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = dir.path().join("iter.seq");

    let mut writer = FrameWriter::new(File::create(&path).unwrap());
    for i in 0..5 {
        writer.write_record(format!("record {i}").as_bytes()).unwrap();
    }
    drop(writer);

    let mut reader = FrameReader::new(BufReader::new(File::open(&path).unwrap()));
    let records: Vec<String> = reader
        .frames()
        .map(|r| String::from_utf8(r.unwrap().to_vec()).unwrap())
        .collect();

    assert_eq!(
        records,
        (0..5).map(|i| format!("record {i}")).collect::<Vec<_>>()
    );
}
