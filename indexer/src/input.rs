use anyhow::{Context, Result};
use searchcore::{DocId, DocumentStatus, SearchIndex};
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// Outcome of loading input files into an index.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub added: usize,
    pub skipped: usize,
}

/// `.json` and `.jsonl` files under `input`, or `input` itself if it is a file.
pub fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

pub fn load_index(input: &Path, index: &mut SearchIndex) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    for file in collect_files(input) {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            load_jsonl(&file, index, &mut report)?;
        } else {
            load_json(&file, index, &mut report)?;
        }
    }
    tracing::info!(added = report.added, skipped = report.skipped, "loaded documents");
    Ok(report)
}

fn load_jsonl(file: &Path, index: &mut SearchIndex, report: &mut LoadReport) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    for (line_no, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed document", file.display(), line_no + 1))?;
        ingest_doc(doc, index, report);
    }
    Ok(())
}

fn load_json(file: &Path, index: &mut SearchIndex, report: &mut LoadReport) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("{}: malformed json", file.display()))?;
    let docs: Vec<InputDoc> = match json {
        serde_json::Value::Array(_) => serde_json::from_value(json)?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    for doc in docs {
        ingest_doc(doc, index, report);
    }
    Ok(())
}

fn ingest_doc(doc: InputDoc, index: &mut SearchIndex, report: &mut LoadReport) {
    match index.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
        Ok(()) => report.added += 1,
        Err(err) => {
            tracing::warn!(id = doc.id, %err, "skipping document");
            report.skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_json_and_jsonl_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"id\": 1, \"text\": \"funny pet and nasty rat\", \"ratings\": [7, 2, 7]}\n\n{\"id\": 2, \"text\": \"curly hair\", \"status\": \"banned\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), "[{\"id\": 3, \"text\": \"nasty rat\"}]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut index = SearchIndex::new("and").unwrap();
        let report = load_index(dir.path(), &mut index).unwrap();
        assert_eq!(report, LoadReport { added: 3, skipped: 0 });
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        let (_, status) = index.match_document("curly", 2).unwrap();
        assert_eq!(status, DocumentStatus::Banned);
    }

    #[test]
    fn rejected_documents_are_skipped() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.json");
        fs::write(&file, "[{\"id\": 1, \"text\": \"cat\"}, {\"id\": 1, \"text\": \"dog\"}, {\"id\": -5, \"text\": \"bird\"}]").unwrap();
        let mut index = SearchIndex::default();
        let report = load_index(&file, &mut index).unwrap();
        assert_eq!(report, LoadReport { added: 1, skipped: 2 });
    }

    #[test]
    fn malformed_line_is_fatal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.jsonl");
        fs::write(&file, "{\"id\": 1, \"text\": \"cat\"}\nnot json\n").unwrap();
        let mut index = SearchIndex::default();
        let err = load_index(&file, &mut index).unwrap_err();
        assert!(err.to_string().contains(":2:"));
    }
}
