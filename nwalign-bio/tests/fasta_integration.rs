/// Integration tests for FASTA input and the sequence source
use flate2::write::GzEncoder;
use flate2::Compression;
use nwalign_bio::formats::fasta::{read_fasta, FastaSource};
use nwalign_bio::sequence::SequenceSource;
use nwalign_core::NwError;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_read_plain_fasta() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "test_seq3.fa",
        ">seq3 test sequence three\nMAVHQ\nLIRRP\n",
    );

    let seq = read_fasta(&path).unwrap();
    assert_eq!(seq.id, "seq3");
    assert_eq!(seq.description.as_deref(), Some("test sequence three"));
    assert_eq!(seq.sequence, b"MAVHQLIRRP");
}

#[test]
fn test_read_gzipped_fasta() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test_seq4.fa.gz");

    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b">seq4\nmqli\nrhp\n").unwrap();
    encoder.finish().unwrap();

    let seq = read_fasta(&path).unwrap();
    assert_eq!(seq.id, "seq4");
    assert_eq!(seq.sequence, b"MQLIRHP");
}

#[test]
fn test_multi_record_file_uses_first() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "multi.fa", ">one\nMYQR\n>two\nMQR\n>three\nAAAA\n");

    let seq = read_fasta(&path).unwrap();
    assert_eq!(seq.id, "one");
    assert_eq!(seq.sequence, b"MYQR");
}

#[test]
fn test_empty_file_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.fa", "");

    assert!(matches!(read_fasta(&path), Err(NwError::InvalidInput(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        read_fasta(dir.path().join("absent.fa")),
        Err(NwError::Io(_))
    ));
}

#[test]
fn test_source_loads_label_and_sequence() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "Mus_musculus_BRD2.fa", ">Mus_musculus_BRD2\nMLQNVT\n");

    let source = FastaSource::new().with_base_dir(dir.path());
    let (seq, label) = source.load("Mus_musculus_BRD2.fa").unwrap();

    assert_eq!(label, "Mus_musculus_BRD2");
    assert_eq!(seq.sequence, b"MLQNVT");
}

#[test]
fn test_source_rejects_record_without_residues() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "header_only.fa", ">lonely header\n\n");

    let source = FastaSource::new();
    assert!(matches!(
        source.load(path.to_str().unwrap()),
        Err(NwError::InvalidInput(_))
    ));
}
