#![allow(dead_code)]

use std::path::{Path, PathBuf};

use annexure_pdf::form::{AuxiliaryFields, MainDetails};
use annexure_pdf::{LaidOutDocument, Page};
use serde_json::Value;

pub fn fixture_json() -> String {
    std::fs::read_to_string("tests/fixtures/hospital.json").expect("read hospital fixture")
}

pub fn fixture_form() -> (MainDetails, AuxiliaryFields) {
    annexure_pdf::form::parse_form(&fixture_json()).expect("parse hospital fixture")
}

/// Fixture form with `key` replaced by `value` (or removed when `None`).
pub fn form_with(key: &str, value: Option<Value>) -> (MainDetails, AuxiliaryFields) {
    let (main, mut aux) = fixture_form();
    match value {
        Some(v) => aux.insert(key.to_string(), v),
        None => aux.remove(key),
    };
    (main, aux)
}

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = Path::new("tests/output").join(case);
    std::fs::create_dir_all(&dir).ok();
    dir
}

pub fn page_texts(page: &Page) -> Vec<String> {
    page.texts().map(str::to_string).collect()
}

pub fn all_texts(doc: &LaidOutDocument) -> Vec<String> {
    doc.pages().iter().flat_map(page_texts).collect()
}

/// Number of page objects in a serialized PDF.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    text.match_indices("/Type /Page").filter(|(i, _)| !text[i + 11..].starts_with('s')).count()
}

/// Inflated content of every stream in a serialized PDF.
pub fn content_streams(bytes: &[u8]) -> Vec<String> {
    let mut streams = Vec::new();
    let mut rest = bytes;
    while let Some(start) = find(rest, b"stream\n") {
        let body = &rest[start + 7..];
        let Some(end) = find(body, b"\nendstream") else {
            break;
        };
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
            streams.push(String::from_utf8_lossy(&raw).into_owned());
        }
        rest = &body[end + 10..];
    }
    streams
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
