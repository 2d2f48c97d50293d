//! Shared fixtures for unit tests

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use image::{ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use crate::config::Config;
use crate::generate::{GenerationError, ImageGenerator};
use crate::routes;
use crate::state::AppState;

/// `count` distinct words: `prefix0 prefix1 ...`
pub fn words(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{}{}", prefix, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assemble a minimal PDF with one Helvetica text block per page
///
/// Text is wrapped at eight words per line so long pages stay inside the
/// media box.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    assemble_pdf(pages, false)
}

/// A one-page PDF under the standard security handler whose user password
/// is not empty, so it cannot be opened without one
pub fn password_protected_pdf() -> Vec<u8> {
    assemble_pdf(&["secret contents"], true)
}

fn assemble_pdf(pages: &[&str], encrypted: bool) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let page_count = pages.len();

    // 1: catalog, 2: page tree, 3: font, then (page, content) pairs
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + i * 2))
        .collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + i * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id
        ));

        let words: Vec<&str> = text.split_whitespace().collect();
        let lines: Vec<String> = words
            .chunks(8)
            .map(|line| format!("({}) Tj T*", escape_pdf_string(&line.join(" "))))
            .collect();
        let stream = format!("BT /F1 10 Tf 14 TL 72 720 Td {} ET", lines.join(" "));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    // RC4 40-bit; /U does not match the empty password
    let mut trailer_extra = String::new();
    if encrypted {
        objects.push(format!(
            "<< /Filter /Standard /V 1 /R 2 /Length 40 /P -4 /O <{}> /U <{}> >>",
            "ab".repeat(32),
            "cd".repeat(32)
        ));
        trailer_extra = format!(
            " /Encrypt {} 0 R /ID [<{id}> <{id}>]",
            objects.len(),
            id = "0123456789abcdef0123456789abcdef"
        );
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R{} >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        trailer_extra,
        xref_offset
    ));

    out.into_bytes()
}

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// A solid-color PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([200, 220, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode test png");
    buffer.into_inner()
}

/// Generator double that records prompts and replays a fixed outcome
pub struct MockGenerator {
    pub image: Option<Vec<u8>>,
    pub calls: AtomicUsize,
    pub prompts: parking_lot::Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn returning(image: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            image: Some(image),
            calls: AtomicUsize::new(0),
            prompts: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            image: None,
            calls: AtomicUsize::new(0),
            prompts: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        self.image.clone().ok_or(GenerationError::NoImage)
    }
}

// ============================================================================
// Router helpers
// ============================================================================

/// A router over a fresh temp work dir; keep the `TempDir` alive for the test
pub fn test_app(generator: Arc<dyn ImageGenerator>) -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().expect("create work dir");
    let mut config = Config::default();
    config.storage.work_dir = dir.path().to_path_buf();

    let state = AppState::with_generator(config, generator);
    (routes::router(state.clone()), state, dir)
}

const BOUNDARY: &str = "folio-test-boundary";

/// `POST /` with a single file field
pub fn multipart_upload(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build upload request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build GET request")
}

pub fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .expect("ascii location")
        .to_string()
}

/// Decoded flash message set by a redirect, if any
pub fn flash_message(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == crate::flash::FLASH_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|message| message.into_owned())
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}
