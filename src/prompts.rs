//! Prompt formatting for the three note-generation operations.
//!
//! Pure text templating: transcript, instructions, template, and source
//! documents are interpolated into fixed instruction blocks. Every prompt
//! ends by demanding the complete note in plain text, with no exposed
//! reasoning, so downstream display code never has to strip commentary.

/// Prompt for writing a new clinical note from a transcript.
///
/// The additional-context section is omitted entirely when `context` is
/// empty or whitespace-only.
pub fn note_writing_prompt(transcript: &str, template_prompt: &str, context: &str) -> String {
    let context_section = if context.trim().is_empty() {
        String::new()
    } else {
        format!(
            "\n\nADDITIONAL CONTEXT/INSTRUCTIONS:\n---\n{}\n---",
            context
        )
    };

    format!(
        "Based on the following transcript, create a clinical note, correcting for any transcription errors:\n\
         \n\
         TRANSCRIPT:\n\
         ---\n\
         {transcript}\n\
         ---\n\
         \n\
         NOTE TEMPLATE:\n\
         ---\n\
         {template_prompt}\n\
         ---\n\
         {context_section}\n\
         \n\
         Respond only with the complete note adhering to the NOTE TEMPLATE. Do not provide chain of thought.\n"
    )
}

/// Prompt for editing an existing clinical note per instructions
pub fn note_edit_prompt(original_note: &str, instructions: &str, template_prompt: &str) -> String {
    format!(
        "Edit the following clinical note according to these instructions:\n\
         \n\
         ORIGINAL NOTE:\n\
         ---\n\
         {original_note}\n\
         ---\n\
         \n\
         NOTE TEMPLATE:\n\
         ---\n\
         {template_prompt}\n\
         ---\n\
         \n\
         INSTRUCTIONS FOR EDIT:\n\
         ---\n\
         {instructions}\n\
         ---\n\
         \n\
         Respond only with the complete edited note adhering to the NOTE TEMPLATE. Do not provide chain of thought.\n"
    )
}

/// Prompt for synthesizing one note from multiple labeled sources.
///
/// Only non-empty sources are included, each wrapped in its named tag, in
/// fixed order: history and physical, consults, studies, progress notes.
pub fn note_synthesis_prompt(
    instructions: &str,
    template_prompt: &str,
    hp: &str,
    consults: &str,
    studies: &str,
    progress: &str,
) -> String {
    let sources = [
        ("HISTORY_AND_PHYSICAL", hp),
        ("CONSULT_NOTES", consults),
        ("STUDIES_AND_PROCEDURES", studies),
        ("PROGRESS_NOTES", progress),
    ];

    let source_blocks: Vec<String> = sources
        .iter()
        .filter(|(_, content)| !content.trim().is_empty())
        .map(|(tag, content)| format!("<{tag}>\n{content}\n</{tag}>"))
        .collect();

    format!(
        "Synthesize a clinical note from the following source documents:\n\
         \n\
         SYNTHESIS INSTRUCTIONS:\n\
         ---\n\
         {instructions}\n\
         ---\n\
         \n\
         NOTE TEMPLATE:\n\
         ---\n\
         {template_prompt}\n\
         ---\n\
         \n\
         SOURCE DOCUMENTS:\n\
         \n\
         {}\n\
         \n\
         Respond only with the complete note adhering to the NOTE TEMPLATE. Do not provide chain of thought.\n",
        source_blocks.join("\n\n")
    )
}
