//! Preview classification and Office text extraction.
//!
//! Decides how a file should be previewed (text, extracted Office text,
//! or an opaque binary handled by the media viewers) and pulls plain text
//! out of Word and PowerPoint containers.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Files larger than this are never previewed as text.
pub const TEXT_PREVIEW_LIMIT: u64 = 5 * 1024 * 1024;

/// Extensions treated as text when MIME detection has no opinion.
const TEXT_EXTENSIONS: [&str; 21] = [
    "txt", "md", "csv", "log", "py", "js", "html", "css", "xml", "json", "c", "cpp", "h", "java",
    "sh", "bat", "ps1", "ini", "cfg", "conf", "yaml",
];

/// Is this file previewable as plain text?
pub fn is_text_file(path: &Path) -> bool {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return mime.starts_with("text/")
            || matches!(
                mime,
                "application/json"
                    | "application/xml"
                    | "application/javascript"
                    | "application/x-javascript"
            );
    }

    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()) || ext == "yml")
}

/// Emoji shown next to a file in the listing, keyed off its MIME class.
pub fn icon_for(path: &Path) -> &'static str {
    let Some(mime) = mime_guess::from_path(path).first_raw() else {
        return "📄";
    };

    if mime.starts_with("image/") {
        "🖼️"
    } else if mime.starts_with("video/") {
        "🎬"
    } else if mime.starts_with("audio/") {
        "🎵"
    } else if mime == "application/pdf" {
        "📕"
    } else if mime.starts_with("text/") {
        "📝"
    } else if mime.contains("spreadsheet") || mime.ends_with("excel") {
        "📊"
    } else if mime.contains("presentation") || mime.ends_with("powerpoint") {
        "📊"
    } else if mime.contains("word") {
        "📄"
    } else if mime.contains("zip") || mime.contains("compressed") || mime.contains("archive") {
        "📦"
    } else {
        "📄"
    }
}

/// Extract the readable text of a Word document: paragraph runs, then
/// table cells row by row joined with pipes.
pub fn extract_docx_text(path: &Path) -> Result<String> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let docx = docx_rs::read_docx(&data).map_err(|e| anyhow::anyhow!("parsing docx: {e:?}"))?;

    let mut blocks = Vec::new();
    for child in docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                let text = paragraph_text(&para);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
            docx_rs::DocumentChild::Table(table) => {
                for row in &table.rows {
                    let docx_rs::TableChild::TableRow(row) = row;
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|cell| {
                            let docx_rs::TableRowChild::TableCell(cell) = cell;
                            cell.children
                                .iter()
                                .filter_map(|c| match c {
                                    docx_rs::TableCellContent::Paragraph(p) => {
                                        Some(paragraph_text(p))
                                    }
                                    _ => None,
                                })
                                .collect::<Vec<_>>()
                                .join(" ")
                        })
                        .filter(|t| !t.is_empty())
                        .collect();
                    if !cells.is_empty() {
                        blocks.push(cells.join(" | "));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(blocks.join("\n\n"))
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for child in &run.children {
                if let docx_rs::RunChild::Text(text) = child {
                    out.push_str(&text.text);
                }
            }
        }
    }
    out
}

/// Extract slide text from a PowerPoint container.
///
/// Slides are XML parts named `ppt/slides/slideN.xml`; text lives in
/// `<a:t>` runs. Output mirrors the on-screen structure: an overview
/// header followed by one block per slide.
pub fn extract_pptx_text(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file).context("opening pptx container")?;

    let mut slide_names: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_names.sort_by_key(|(n, _)| *n);

    let mut slides: Vec<(u32, String)> = Vec::new();
    for (number, name) in slide_names {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .context("reading slide entry")?
            .read_to_string(&mut xml)
            .context("decoding slide xml")?;
        slides.push((number, xml));
    }

    let mut out = vec!["=== PRESENTATION OVERVIEW ===\n".to_string()];
    for (number, xml) in slides {
        let mut block = vec![format!("=== SLIDE {number} ===")];
        block.extend(text_runs(&xml));
        out.push(block.join("\n"));
    }

    Ok(out.join("\n\n"))
}

fn slide_number(entry_name: &str) -> Option<u32> {
    entry_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Pull the `<a:t>` text runs out of slide XML.
fn text_runs(xml: &str) -> Vec<String> {
    static RUN: OnceLock<Regex> = OnceLock::new();
    let re = RUN.get_or_init(|| Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>").unwrap());

    re.captures_iter(xml)
        .map(|cap| unescape_xml(&cap[1]))
        .filter(|t| !t.is_empty())
        .collect()
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
