// Assistant message texts

use vibevideo_types::MediaFile;

use crate::request::RequestOrigin;

const SUGGESTIONS: &[&str] = &[
    "Speed up the video",
    "Cut specific segments",
    "Convert to grayscale",
    "Enhance audio quality",
    "Remove background noise",
    "Combine with other clips",
];

const RETRY_HINT: &str = "This might be a temporary issue. Please try again or contact support if the problem persists.";

pub(crate) fn file_uploaded(name: &str) -> String {
    format!("File uploaded: {}", name)
}

pub(crate) fn suggestions(name: &str) -> String {
    format!(
        "Here are some things I can help you do with \"{}\":\n\n• {}",
        name,
        SUGGESTIONS.join("\n• ")
    )
}

pub(crate) fn files_selected(files: &[MediaFile]) -> String {
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    format!(
        "Selected {} files for merging: {}. Use \"Merge Files\" to combine them.",
        files.len(),
        names.join(", ")
    )
}

pub(crate) fn previewing(name: &str) -> String {
    format!("Previewing: {}", name)
}

pub(crate) fn processed(origin: &RequestOrigin, instruction: &str, server_message: &str) -> String {
    match origin {
        RequestOrigin::Typed => format!(
            "✅ File processed successfully! Your request \"{}\" has been completed.",
            instruction
        ),
        RequestOrigin::QuickAction(label) => format!("✅ {} completed! Your processed file is ready.", label),
        RequestOrigin::Merge => format!("✅ {}", server_message),
    }
}

pub(crate) fn empty_result(origin: &RequestOrigin, instruction: &str) -> String {
    let subject = match origin {
        RequestOrigin::Typed => format!("Your request \"{}\"", instruction),
        RequestOrigin::QuickAction(label) => label.clone(),
        RequestOrigin::Merge => "Your merge request".to_string(),
    };
    format!(
        "⚠️ {} was received, but the server couldn't process the file. {}",
        subject, RETRY_HINT
    )
}

pub(crate) fn processing_failed(origin: &RequestOrigin, error: &str) -> String {
    match origin {
        RequestOrigin::Merge => format!("❌ Error merging files: {}", error),
        _ => format!("❌ Error processing file: {}", error),
    }
}

/// Stand-in when the chat endpoint accepted a message without replying
pub(crate) fn acknowledged(origin: &RequestOrigin) -> String {
    match origin {
        RequestOrigin::QuickAction(instruction) => format!(
            "I'll help you {}. Please upload a file to process.",
            instruction.to_lowercase()
        ),
        _ => "I received your message and processed it successfully!".to_string(),
    }
}

pub(crate) fn chat_failed(origin: &RequestOrigin, error: &str) -> String {
    match origin {
        RequestOrigin::Typed => format!("I encountered an error: {}. Please try again.", error),
        _ => format!("❌ Error: {}", error),
    }
}

pub(crate) fn transport_error(origin: &RequestOrigin) -> String {
    match origin {
        RequestOrigin::Typed => "I'm sorry, I encountered an error. Please try again.".to_string(),
        _ => "I'm sorry, I encountered an error processing your request. Please try again.".to_string(),
    }
}
