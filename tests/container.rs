use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::thread;

use huffpack::{compress, decode, CompressedData, HuffmanCodec, HuffmanError};

const SAMPLE: &str = "Hello, world! This is a sample text for Huffman compression.\n\
                      The quick brown fox jumps over the lazy dog.\n\
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.\n";

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.txt");
    let packed = dir.path().join("sample.huff");
    let output = dir.path().join("decompressed.txt");
    fs::write(&input, SAMPLE).unwrap();

    let container = HuffmanCodec::encode_from_reader(
        BufReader::new(File::open(&input).unwrap()),
        BufWriter::new(File::create(&packed).unwrap()),
    )
    .unwrap();
    assert_eq!(
        fs::metadata(&packed).unwrap().len() as usize,
        container.serialized_len()
    );
    assert!(container.packed.bytes.len() < SAMPLE.len());

    HuffmanCodec::decode_from_reader(
        BufReader::new(File::open(&packed).unwrap()),
        BufWriter::new(File::create(&output).unwrap()),
    )
    .unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), SAMPLE);
}

#[test]
fn empty_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("empty.huff");

    let container =
        HuffmanCodec::encode_from_reader(&b""[..], File::create(&packed).unwrap()).unwrap();
    assert!(container.packed.is_empty());
    assert!(container.tree_data.is_empty());

    let mut output = Vec::new();
    let symbols =
        HuffmanCodec::decode_from_reader(File::open(&packed).unwrap(), &mut output).unwrap();
    assert_eq!(symbols, 0);
    assert!(output.is_empty());
}

#[test]
fn missing_input_propagates_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = File::open(dir.path().join("missing.txt"))
        .map_err(HuffmanError::from)
        .and_then(|file| HuffmanCodec::encode_from_reader(file, Vec::new()));
    assert!(matches!(result, Err(HuffmanError::Io(_))));
}

#[test]
fn container_with_short_data_is_truncated() {
    let mut container = compress(SAMPLE).unwrap().into_container();
    container.packed.bytes.truncate(container.packed.bytes.len() / 2);

    let bytes = container.serialize();
    let read = CompressedData::deserialize(&bytes).unwrap();
    let tree = read.tree().unwrap();
    assert!(matches!(
        decode(&read.packed, tree.as_ref()),
        Err(HuffmanError::TruncatedStream { .. })
    ));
}

#[test]
fn independent_compressions_run_in_parallel() {
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("{SAMPLE}{}", "xyz".repeat(i * 10)))
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                scope.spawn(move || {
                    let compressed = compress(input).unwrap();
                    decode(&compressed.packed, compressed.tree.as_ref()).unwrap()
                })
            })
            .collect();
        for (handle, input) in handles.into_iter().zip(&inputs) {
            assert_eq!(&handle.join().unwrap(), input);
        }
    });
}

#[test]
fn shared_codec_serves_many_threads() {
    let codec = HuffmanCodec::from_content(SAMPLE).unwrap();
    let lines: Vec<&str> = SAMPLE.lines().collect();

    thread::scope(|scope| {
        for line in &lines {
            let codec = &codec;
            scope.spawn(move || {
                let packed = codec.encode(line).unwrap();
                assert_eq!(codec.decode(&packed).unwrap(), *line);
            });
        }
    });
}

#[test]
fn container_with_overflowing_frequencies_is_rejected() {
    // two symbols whose counts sum past u64::MAX
    let mut tree_data = Vec::new();
    tree_data.extend_from_slice(&2u32.to_le_bytes());
    for (symbol, count) in [('a', u64::MAX), ('b', 1)] {
        tree_data.extend_from_slice(&u32::from(symbol).to_le_bytes());
        tree_data.extend_from_slice(&count.to_le_bytes());
    }
    let mut container = compress("ab").unwrap().into_container();
    container.tree_data = tree_data;

    let mut output = Vec::new();
    let result = HuffmanCodec::decode_from_reader(&container.serialize()[..], &mut output);
    assert!(matches!(result, Err(HuffmanError::InvalidData(_))));
    assert!(output.is_empty());
}
