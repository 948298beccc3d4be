use serde::Deserialize;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

/// Outcome of parsing one line of a completion event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A content fragment to append to the aggregated output
    Content(String),
    /// Terminal marker: the stream is complete, stop reading
    Done,
    /// Blank line, non-data line, malformed or empty chunk: keep reading
    Ignored,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Parse one line of the event stream.
///
/// Malformed JSON in a chunk is an `Ignored`, not an error: a single bad
/// chunk must never abort an otherwise healthy stream.
pub fn parse_line(line: &str) -> SseEvent {
    let line = line.trim();
    if line.is_empty() {
        return SseEvent::Ignored;
    }

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return SseEvent::Ignored;
    };

    if payload == DONE_MARKER {
        return SseEvent::Done;
    }

    let chunk: StreamChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(_) => return SseEvent::Ignored,
    };

    match chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
    {
        Some(content) if !content.is_empty() => SseEvent::Content(content),
        _ => SseEvent::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_fragments_parse_in_order() {
        let lines = [
            r#"data: {"choices":[{"delta":{"content":"A"}}]}"#,
            r#"data: {"choices":[{"delta":{"content":"B"}}]}"#,
            "data: [DONE]",
        ];

        let mut out = String::new();
        for line in lines {
            match parse_line(line) {
                SseEvent::Content(c) => out.push_str(&c),
                SseEvent::Done => break,
                SseEvent::Ignored => {}
            }
        }
        assert_eq!(out, "AB");
    }

    #[test]
    fn malformed_chunk_is_skipped_not_fatal() {
        assert_eq!(parse_line("data: {not valid json"), SseEvent::Ignored);
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":"C"}}]}"#),
            SseEvent::Content("C".to_string())
        );
    }

    #[test]
    fn done_marker_terminates() {
        assert_eq!(parse_line("data: [DONE]"), SseEvent::Done);
    }

    #[test]
    fn blank_and_non_data_lines_are_ignored() {
        assert_eq!(parse_line(""), SseEvent::Ignored);
        assert_eq!(parse_line("   "), SseEvent::Ignored);
        assert_eq!(parse_line(": keep-alive"), SseEvent::Ignored);
        assert_eq!(parse_line("event: message"), SseEvent::Ignored);
    }

    #[test]
    fn empty_or_missing_delta_content_is_ignored() {
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            SseEvent::Ignored
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{}}]}"#),
            SseEvent::Ignored
        );
        assert_eq!(parse_line(r#"data: {"choices":[]}"#), SseEvent::Ignored);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse_line("  data: [DONE]\r"),
            SseEvent::Done
        );
    }
}
