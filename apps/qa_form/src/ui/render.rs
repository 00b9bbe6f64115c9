use crate::controller::{
    events::{UiErrorCategory, UiErrorContext},
    reducer::{AnswerArea, FormState, ListPhase, SubmitPhase, UploadPhase},
};

pub const TITLE: &str = "=== Ask a Question from the RAG Agent ===";
pub const NO_DOCUMENTS: &str = "No PDFs uploaded";

pub fn render_form(state: &FormState) -> String {
    let mut lines = vec![TITLE.to_string()];

    let file = state
        .file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    lines.push(format!("File:     {file}"));
    if let Some(message) = state.upload_message() {
        lines.push(format!("Upload:   {message}"));
    }

    if state.documents().is_empty() {
        lines.push(format!("PDFs:     {NO_DOCUMENTS}"));
    } else {
        lines.push("PDFs:".to_string());
        for document in state.documents() {
            let marker = if state.selected() == Some(&document.name) {
                "*"
            } else {
                " "
            };
            lines.push(format!("  [{marker}] {}  ({})", document.name, document.path));
        }
    }

    lines.push(format!("Question: {}", state.question()));
    if !state.keyword().trim().is_empty() {
        lines.push(format!("Keyword:  {}", state.keyword()));
    }

    let mut busy = Vec::new();
    if matches!(state.list_phase(), ListPhase::Loading(_)) {
        busy.push("loading PDFs");
    }
    if matches!(state.submit_phase(), SubmitPhase::Submitting(_)) {
        busy.push("asking");
    }
    if matches!(state.upload_phase(), UploadPhase::Uploading(_)) {
        busy.push("uploading");
    }
    if !busy.is_empty() {
        lines.push(format!("Busy:     {}", busy.join(", ")));
    }

    match state.answer() {
        AnswerArea::Empty => {}
        AnswerArea::Notice(text) => lines.push(format!("Answer:   {text}")),
        AnswerArea::Answer { text, cached } => {
            let suffix = if *cached { " (cached)" } else { "" };
            lines.push(format!("Answer:   {text}{suffix}"));
        }
    }

    if let Some(status) = state.status() {
        lines.push(format!("Status:   {status}"));
    }
    if let Some(error) = state.last_error() {
        lines.push(format!(
            "Error:    [{}/{}] {}",
            category_label(error.category()),
            context_label(error.context()),
            error.message()
        ));
    }

    lines.join("\n")
}

fn category_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "transport",
        UiErrorCategory::Decode => "decode",
        UiErrorCategory::Validation => "validation",
        UiErrorCategory::Configuration => "configuration",
        UiErrorCategory::Startup => "startup",
    }
}

fn context_label(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::BackendStartup => "startup",
        UiErrorContext::ListDocuments => "list",
        UiErrorContext::Upload => "upload",
        UiErrorContext::Query => "query",
        UiErrorContext::Form => "form",
    }
}
