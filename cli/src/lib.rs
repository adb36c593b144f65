use anyhow::{Context, Result};
use search_core::{DocId, Document, DocumentStatus, SearchServer, SearchServerConfig, StopWords};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One document of a bulk-load file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// `.json` / `.jsonl` files under `path` (or `path` itself), sorted by path.
pub fn collect_input_files(path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if path.is_file() {
        files.push(path.to_path_buf());
    }
    files
}

pub fn load_documents(path: &Path) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for file in collect_input_files(path) {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            load_jsonl(&file, &mut docs)?;
        } else {
            load_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn load_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: bad document", file.display(), line_no + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn load_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "ignoring JSON that is neither a document nor a list"),
    }
    Ok(())
}

/// Engine settings from an optional JSON file; missing fields keep their defaults.
pub fn load_config(path: Option<&Path>) -> Result<SearchServerConfig> {
    let Some(path) = path else {
        return Ok(SearchServerConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

/// Build a server and add every document. Documents the server rejects are logged
/// and skipped; their ids are returned alongside the server.
pub fn build_server(stop_words: &str, config: SearchServerConfig, docs: &[InputDoc]) -> Result<(SearchServer, Vec<DocId>)> {
    let mut server = SearchServer::with_stop_words(StopWords::from_text(stop_words)?, config)?;
    let mut rejected = Vec::new();
    for doc in docs {
        if let Err(err) = server.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
            tracing::warn!(id = doc.id, %err, "skipping document");
            rejected.push(doc.id);
        }
    }
    tracing::info!(num_docs = server.document_count(), rejected = rejected.len(), "ingested documents");
    Ok((server, rejected))
}

/// Non-blank lines of a query file.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading queries {}", path.display()))?;
    Ok(text.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect())
}

/// Results split into pages of `page_size` (at least one per page), each rendered on one line.
pub fn render_pages(documents: &[Document], page_size: usize) -> Vec<String> {
    documents
        .chunks(page_size.max(1))
        .map(|page| page.iter().map(ToString::to_string).collect::<String>())
        .collect()
}
