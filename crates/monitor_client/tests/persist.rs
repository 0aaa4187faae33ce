use std::fs;

use monitor_client::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_result() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("translated_doc.docx", b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "translated_doc.docx");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = writer.write("translated_doc.docx", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[test]
fn file_name_cannot_escape_the_directory() {
    let temp = TempDir::new().unwrap();
    let inner = temp.path().join("inner");
    let writer = AtomicFileWriter::new(inner.clone());

    let saved = writer.write("../../escape.docx", b"data").unwrap();
    assert_eq!(saved, inner.join("escape.docx"));

    let err = writer.write("..", b"data").unwrap_err();
    assert!(matches!(err, PersistError::InvalidFileName(_)));
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("doc.docx", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.docx").exists());
}

#[test]
fn partial_file_appends_chunks_and_commits() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let mut partial = writer.begin("translated_book.docx").unwrap();
    partial.append(b"chapter one, ").unwrap();
    partial.append(b"chapter two").unwrap();
    assert!(!temp.path().join("translated_book.docx").exists());

    let saved = partial.commit().unwrap();
    assert_eq!(fs::read(&saved).unwrap(), b"chapter one, chapter two");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn abandoned_partial_file_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let mut partial = writer.begin("translated_book.docx").unwrap();
    partial.append(b"half a book").unwrap();
    drop(partial);

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
