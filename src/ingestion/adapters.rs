//! Source adapters: normalize heterogeneous inputs into content records
//!
//! Every adapter tags its output with `source` and `type` metadata; that
//! tagging is what makes later filtering possible and is never skipped.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::types::{ContentRecord, SourceMetadata, SourceType};

/// File extensions accepted by [`SourceAdapter::extract_file`]
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "txt", "csv", "docx", "vtt"];

fn allowed_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extraction front-end, polymorphic over input kind
pub struct SourceAdapter {
    http: reqwest::Client,
}

impl Default for SourceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Share an existing HTTP client for website and transcript fetches
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Wrap a raw text submission verbatim as a single record
    pub fn extract_text(&self, text: &str, label: &str) -> Result<Vec<ContentRecord>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyContent("text input".to_string()));
        }
        Ok(vec![ContentRecord::new(
            text,
            SourceMetadata::new(label, SourceType::Text),
        )])
    }

    /// Dispatch an uploaded file on its extension
    pub fn extract_file(&self, filename: &str, data: &[u8]) -> Result<Vec<ContentRecord>> {
        let extension = filename
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => extract_pdf(filename, data),
            "csv" => extract_csv(filename, data),
            "txt" => extract_txt(filename, data),
            "docx" => extract_docx(filename, data),
            "vtt" => extract_vtt(filename, data),
            _ => Err(Error::UnsupportedType {
                extension,
                allowed: allowed_list(),
            }),
        }
    }

    /// Fetch a web page and extract its visible text
    pub async fn extract_website(&self, url: &str) -> Result<Vec<ContentRecord>> {
        reqwest::Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;

        let response = self.http.get(url).send().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let (title, text) = html_to_text(&body);
        if text.is_empty() {
            return Err(Error::EmptyContent(url.to_string()));
        }

        tracing::info!(url, title = %title, chars = text.len(), "extracted website content");

        Ok(vec![ContentRecord::new(
            text,
            SourceMetadata::new(url, SourceType::Website).with_extra("title", title),
        )])
    }

    /// Fetch a video transcript and concatenate its caption segments
    pub async fn extract_video(&self, url: &str) -> Result<Vec<ContentRecord>> {
        if !video_url_pattern().is_match(url) {
            return Err(Error::InvalidUrl(url.to_string()));
        }
        let id = video_id(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

        let transcript_url = format!("https://www.youtube.com/api/timedtext?v={id}&lang=en");
        let response = self
            .http
            .get(&transcript_url)
            .send()
            .await
            .map_err(|e| Error::Fetch {
                url: transcript_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: transcript_url,
                reason: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| Error::Fetch {
            url: transcript_url,
            reason: e.to_string(),
        })?;

        let segments = parse_transcript_xml(&body);
        if segments.is_empty() {
            return Err(Error::NoTranscript(id));
        }

        let text = collapse_whitespace(&segments.join(" "));
        tracing::info!(video = %id, segments = segments.len(), "extracted video transcript");

        Ok(vec![ContentRecord::new(
            text,
            SourceMetadata::new(url, SourceType::Youtube)
                .with_extra("video_id", id)
                .with_extra("segments", segments.len() as u64),
        )])
    }
}

fn extract_pdf(filename: &str, data: &[u8]) -> Result<Vec<ContentRecord>> {
    let raw = pdf_extract::extract_text_from_mem(data).map_err(|e| Error::FileParse {
        filename: filename.to_string(),
        reason: e.to_string(),
    })?;

    let text = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        return Err(Error::EmptyContent(filename.to_string()));
    }

    let mut metadata = SourceMetadata::new(filename, SourceType::Pdf);
    if let Ok(doc) = lopdf::Document::load_mem(data) {
        metadata = metadata.with_extra("pages", doc.get_pages().len() as u64);
    }

    Ok(vec![ContentRecord::new(text, metadata)])
}

fn extract_csv(filename: &str, data: &[u8]) -> Result<Vec<ContentRecord>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| Error::FileParse {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?
        .clone();

    let mut lines = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| Error::FileParse {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;
        let line = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| format!("{header}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(line);
    }

    if lines.is_empty() {
        return Err(Error::EmptyContent(filename.to_string()));
    }

    let row_count = lines.len() as u64;
    Ok(vec![ContentRecord::new(
        lines.join("\n"),
        SourceMetadata::new(filename, SourceType::Csv).with_extra("rows", row_count),
    )])
}

fn extract_txt(filename: &str, data: &[u8]) -> Result<Vec<ContentRecord>> {
    let text = String::from_utf8_lossy(data).to_string();
    if text.trim().is_empty() {
        return Err(Error::EmptyContent(filename.to_string()));
    }
    Ok(vec![ContentRecord::new(
        text,
        SourceMetadata::new(filename, SourceType::TextFile),
    )])
}

fn extract_docx(filename: &str, data: &[u8]) -> Result<Vec<ContentRecord>> {
    let doc = docx_rs::read_docx(data).map_err(|e| Error::FileParse {
        filename: filename.to_string(),
        reason: e.to_string(),
    })?;

    let mut paragraphs = Vec::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(text) = child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            if !line.trim().is_empty() {
                paragraphs.push(line);
            }
        }
    }

    if paragraphs.is_empty() {
        return Err(Error::EmptyContent(filename.to_string()));
    }

    Ok(vec![ContentRecord::new(
        paragraphs.join("\n"),
        SourceMetadata::new(filename, SourceType::Docx),
    )])
}

fn vtt_timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}")
            .expect("valid timestamp pattern")
    })
}

fn extract_vtt(filename: &str, data: &[u8]) -> Result<Vec<ContentRecord>> {
    let content = String::from_utf8_lossy(data);
    let mut parts: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        // Drop the header, blank lines, numeric cue identifiers, and
        // timestamp ranges; everything left is subtitle text.
        if line.is_empty()
            || line == "WEBVTT"
            || vtt_timestamp_pattern().is_match(line)
            || line.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        parts.push(line);
    }

    let text = collapse_whitespace(&parts.join(" "));
    if text.is_empty() {
        return Err(Error::EmptyContent(filename.to_string()));
    }

    Ok(vec![ContentRecord::new(
        text,
        SourceMetadata::new(filename, SourceType::Vtt),
    )])
}

fn collect_visible_text(element: scraper::ElementRef<'_>, out: &mut String) {
    if matches!(element.value().name(), "script" | "style" | "noscript") {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = scraper::ElementRef::wrap(child) {
            collect_visible_text(child_element, out);
        }
    }
}

fn title_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("title").expect("valid title selector"))
}

fn heading_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| {
        Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector")
    })
}

fn body_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("body").expect("valid body selector"))
}

/// Extract (title, visible body text) from an HTML document
fn html_to_text(html: &str) -> (String, String) {
    let document = Html::parse_document(html);

    let title = document
        .select(title_selector())
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(heading_selector())
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| "Untitled".to_string());

    let mut raw = String::new();
    if let Some(body) = document.select(body_selector()).next() {
        collect_visible_text(body, &mut raw);
    }

    (title, collapse_whitespace(&raw))
}

fn video_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com/(watch\?v=|embed/)|youtu\.be/)[A-Za-z0-9_-]+")
            .expect("valid video URL pattern")
    })
}

/// Pull the video identifier out of a recognized video URL
fn video_id(url: &str) -> Option<String> {
    let rest = url
        .split_once("watch?v=")
        .or_else(|| url.split_once("embed/"))
        .or_else(|| url.split_once("youtu.be/"))
        .map(|(_, rest)| rest)?;

    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    (!id.is_empty()).then_some(id)
}

/// Collect the text of `<text>` cue elements from a timedtext XML document
fn parse_transcript_xml(xml: &str) -> Vec<String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut segments = Vec::new();
    let mut in_cue = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"text" => {
                in_cue = true;
                current.clear();
            }
            Ok(Event::Text(e)) if in_cue => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"text" => {
                if !current.trim().is_empty() {
                    segments.push(current.trim().to_string());
                }
                in_cue = false;
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_is_wrapped_verbatim() {
        let adapter = SourceAdapter::new();
        let records = adapter.extract_text("hello there", "my-note").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "hello there");
        assert_eq!(records[0].metadata.source, "my-note");
        assert_eq!(records[0].metadata.source_type, SourceType::Text);
    }

    #[test]
    fn blank_text_input_is_rejected() {
        let adapter = SourceAdapter::new();
        assert!(matches!(
            adapter.extract_text("   \n\t ", "x"),
            Err(Error::EmptyContent(_))
        ));
    }

    #[test]
    fn unsupported_extension_names_the_allowed_set() {
        let adapter = SourceAdapter::new();
        let err = adapter.extract_file("malware.exe", b"bytes").unwrap_err();

        match err {
            Error::UnsupportedType { extension, allowed } => {
                assert_eq!(extension, "exe");
                for ext in SUPPORTED_EXTENSIONS {
                    assert!(allowed.contains(ext));
                }
            }
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }

    #[test]
    fn txt_files_are_tagged_text_file() {
        let adapter = SourceAdapter::new();
        let records = adapter.extract_file("notes.txt", b"some notes").unwrap();

        assert_eq!(records[0].metadata.source_type, SourceType::TextFile);
        assert_eq!(records[0].metadata.source, "notes.txt");
        assert_eq!(records[0].text, "some notes");
    }

    #[test]
    fn vtt_strips_header_cues_and_timestamps() {
        let adapter = SourceAdapter::new();
        let vtt = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\nHello world\n";
        let records = adapter.extract_file("captions.vtt", vtt.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Hello world");
        assert_eq!(records[0].metadata.source_type, SourceType::Vtt);
    }

    #[test]
    fn vtt_joins_cues_with_single_spaces() {
        let adapter = SourceAdapter::new();
        let vtt = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\nfirst cue\n\n2\n00:00:02.000 --> 00:00:04.000\nsecond cue\n";
        let records = adapter.extract_file("captions.vtt", vtt.as_bytes()).unwrap();

        assert_eq!(records[0].text, "first cue second cue");
    }

    #[test]
    fn vtt_with_no_subtitle_text_is_empty_content() {
        let adapter = SourceAdapter::new();
        let vtt = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\n";
        assert!(matches!(
            adapter.extract_file("captions.vtt", vtt.as_bytes()),
            Err(Error::EmptyContent(_))
        ));
    }

    #[test]
    fn csv_flattens_rows_against_headers() {
        let adapter = SourceAdapter::new();
        let csv = "name,age\nalice,30\nbob,25\n";
        let records = adapter.extract_file("people.csv", csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "name: alice, age: 30\nname: bob, age: 25");
        assert_eq!(
            records[0].metadata.extras.get("rows"),
            Some(&serde_json::json!(2))
        );
    }

    #[test]
    fn csv_with_headers_only_is_empty_content() {
        let adapter = SourceAdapter::new();
        assert!(matches!(
            adapter.extract_file("empty.csv", b"name,age\n"),
            Err(Error::EmptyContent(_))
        ));
    }

    #[test]
    fn html_extraction_skips_scripts_and_captures_title() {
        let html = r#"<html><head><title>My Page</title>
            <script>var hidden = "secret";</script></head>
            <body><style>.x { color: red }</style>
            <h1>Welcome</h1><p>Visible   content
            here.</p></body></html>"#;

        let (title, text) = html_to_text(html);
        assert_eq!(title, "My Page");
        assert_eq!(text, "Welcome Visible content here.");
        assert!(!text.contains("secret"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn html_title_falls_back_to_heading_then_untitled() {
        let (title, _) = html_to_text("<body><h2>Heading Title</h2><p>body</p></body>");
        assert_eq!(title, "Heading Title");

        let (title, _) = html_to_text("<body><p>just text</p></body>");
        assert_eq!(title, "Untitled");
    }

    #[test]
    fn video_url_forms_are_recognized() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/embed/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "www.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert!(video_url_pattern().is_match(url), "should match: {url}");
            assert_eq!(video_id(url).as_deref(), Some("dQw4w9WgXcQ"));
        }

        assert!(!video_url_pattern().is_match("https://example.com/watch?v=abc"));
        assert!(!video_url_pattern().is_match("not a url"));
    }

    #[test]
    fn video_id_stops_at_query_separators() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s";
        assert_eq!(video_id(url).as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn transcript_xml_yields_ordered_segments() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <transcript>
              <text start="0.0" dur="2.0">first segment</text>
              <text start="2.0" dur="2.0">second &amp; third</text>
            </transcript>"#;

        let segments = parse_transcript_xml(xml);
        assert_eq!(segments, vec!["first segment", "second & third"]);
    }

    #[test]
    fn empty_transcript_body_yields_no_segments() {
        assert!(parse_transcript_xml("").is_empty());
        assert!(parse_transcript_xml("<transcript></transcript>").is_empty());
    }
}
