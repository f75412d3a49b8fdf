//! ZIP archives and multipart forms for import tests.

use axum_test::multipart::{MultipartForm, Part};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::CompressionMethod;

pub fn pdf(label: &str) -> Vec<u8> {
    format!("%PDF-1.4\n% {}\n%%EOF\n", label).into_bytes()
}

/// Deflated archive with the given `(path, content)` entries.
pub fn zip_of(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, content) in entries {
        if path.ends_with('/') {
            writer
                .add_directory(path.trim_end_matches('/'), FileOptions::default())
                .unwrap();
            continue;
        }
        writer
            .start_file(
                *path,
                FileOptions::default().compression_method(CompressionMethod::Deflated),
            )
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn upload_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data)
            .file_name(file_name)
            .mime_type("application/zip"),
    )
}
