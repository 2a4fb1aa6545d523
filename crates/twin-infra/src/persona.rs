//! Persona artifact loading.
//!
//! Reads the artifacts from the persona directory and hands them to
//! [`PersonaBuilder`]. Every artifact is optional: a missing or unreadable
//! one is logged and replaced by a placeholder, never a startup failure.
//!
//! ```text
//! {persona_dir}/
//!   linkedin.pdf   résumé (preferred)
//!   resume.md      résumé fallback (or resume.txt)
//!   summary.txt
//!   style.txt
//!   facts.json     {"full_name": ..., "name": ..., ...}
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use twin_core::persona::{Persona, PersonaBuilder, PersonaSources};
use twin_types::config::PersonaConfig;

const RESUME_PDF: &str = "linkedin.pdf";
const RESUME_TEXT: [&str; 2] = ["resume.md", "resume.txt"];
const SUMMARY: &str = "summary.txt";
const STYLE: &str = "style.txt";
const FACTS: &str = "facts.json";

/// Load the persona prompt.
///
/// A configured prompt file is used verbatim; if it cannot be read the
/// prompt is assembled from the persona directory instead.
pub async fn load_persona(config: &PersonaConfig) -> Persona {
    if let Some(file) = &config.file {
        match tokio::fs::read_to_string(file).await {
            Ok(prompt) if !prompt.trim().is_empty() => {
                info!(file = %file.display(), "Loaded persona prompt file");
                return Persona::from_prompt(prompt.trim());
            }
            Ok(_) => warn!(file = %file.display(), "Persona prompt file is empty, assembling from artifacts"),
            Err(e) => warn!(
                file = %file.display(),
                "Persona prompt file unreadable, assembling from artifacts: {e}"
            ),
        }
    }

    let sources = load_sources(&config.dir).await;
    let persona = PersonaBuilder::build(&sources);
    if persona.missing().is_empty() {
        info!(dir = %config.dir.display(), "Persona assembled from all artifacts");
    } else {
        warn!(
            dir = %config.dir.display(),
            missing = ?persona.missing(),
            "Persona assembled with placeholders"
        );
    }
    persona
}

/// Read every artifact that is present in `dir`.
pub async fn load_sources(dir: &Path) -> PersonaSources {
    PersonaSources {
        resume: load_resume(dir).await,
        summary: read_text(&dir.join(SUMMARY)).await,
        style: read_text(&dir.join(STYLE)).await,
        facts: load_facts(&dir.join(FACTS)).await,
    }
}

async fn load_resume(dir: &Path) -> Option<String> {
    if let Some(text) = read_pdf(dir.join(RESUME_PDF)).await {
        return Some(text);
    }
    for name in RESUME_TEXT {
        if let Some(text) = read_text(&dir.join(name)).await {
            return Some(text);
        }
    }
    None
}

async fn read_pdf(path: PathBuf) -> Option<String> {
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        debug!(path = %path.display(), "No résumé PDF");
        return None;
    }

    let shown = path.display().to_string();
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
        Ok(Ok(_)) => {
            warn!(path = %shown, "Résumé PDF has no extractable text");
            None
        }
        Ok(Err(e)) => {
            warn!(path = %shown, "Failed to extract résumé PDF: {e}");
            None
        }
        Err(e) => {
            warn!(path = %shown, "Résumé PDF extraction aborted: {e}");
            None
        }
    }
}

async fn read_text(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Persona artifact not found");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), "Failed to read persona artifact: {e}");
            None
        }
    }
}

async fn load_facts(path: &Path) -> Option<Value> {
    let text = read_text(path).await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(facts) => Some(facts),
        Err(e) => {
            warn!(path = %path.display(), "Malformed facts file: {e}");
            None
        }
    }
}
