//! HTML pages
//!
//! Two small pages: the upload form and the result preview. Everything
//! interpolated from a request is escaped with `html-escape`.

use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:760px;margin:40px auto;padding:0 16px;color:#222}\
h1{font-weight:600}\
.flash{background:#fdecea;border:1px solid #f5c2c0;padding:10px 14px;border-radius:6px}\
form{margin-top:24px}\
img{max-width:100%;border:1px solid #ddd;border-radius:6px}\
pre{white-space:pre-wrap;background:#f6f8fa;padding:12px;border-radius:6px}\
a.button,button{display:inline-block;padding:8px 16px;border-radius:6px;border:0;\
background:#2563eb;color:#fff;text-decoration:none;cursor:pointer}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        encode_text(title),
        STYLE,
        body
    )
}

/// Upload form, with the pending flash message if there is one
pub fn index_page(flash: Option<&str>) -> String {
    let flash = flash
        .map(|message| format!("<p class=\"flash\">{}</p>\n", encode_text(message)))
        .unwrap_or_default();

    let body = format!(
        "<h1>PDF to cover image</h1>\n{}\
         <p>Upload a PDF. Its first page is turned into a cover image.</p>\n\
         <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"pdf_file\" accept=\".pdf,application/pdf\">\n\
         <button type=\"submit\">Generate</button>\n\
         </form>",
        flash
    );

    layout("Folio", &body)
}

/// Generated image inline as a data URI, with the prompt that produced it
pub fn result_page(session_id: &str, image_base64: &str, prompt: &str) -> String {
    let download = format!("/download/{}", urlencoding::encode(session_id));

    let body = format!(
        "<h1>Your cover image</h1>\n\
         <img alt=\"Generated cover image\" src=\"data:image/png;base64,{}\">\n\
         <p><a class=\"button\" href=\"{}\">Download</a> <a href=\"/\">Start over</a></p>\n\
         <h2>Prompt</h2>\n<pre>{}</pre>",
        encode_double_quoted_attribute(image_base64),
        encode_double_quoted_attribute(&download),
        encode_text(prompt)
    );

    layout("Folio - Result", &body)
}
