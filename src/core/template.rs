//! Message and output template rendering
//!
//! Message templates carry holes such as `{0}` or `{UserName}`. Numeric holes
//! index the argument list directly; named holes bind arguments in order of
//! appearance. `{{` and `}}` are literal braces. A hole without a matching
//! argument is left as written.
//!
//! Output templates describe the line a channel writes and understand the
//! tokens `Timestamp`, `Level`, `Message`, `NewLine`, `SourceContext`,
//! `MemberName`, `SourceCodeInformation`, `SourceCodePath` and `LineNumber`.
//! Unknown tokens are copied through unchanged.

use super::field_value::FieldValue;
use super::log_entry::LogEvent;
use super::parameters::ResolvedParameters;
use chrono::format::{Item, StrftimeItems};

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

/// One parsed piece of a template
enum Segment<'a> {
    Text(&'a str),
    Brace(char),
    Hole { raw: &'a str, name: &'a str, format: Option<&'a str> },
}

/// Split a template into literal text, escaped braces and holes
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while !rest.is_empty() {
        let Some(pos) = rest.find(['{', '}']) else {
            out.push(Segment::Text(rest));
            break;
        };
        if pos > 0 {
            out.push(Segment::Text(&rest[..pos]));
        }
        rest = &rest[pos..];

        if rest.starts_with("{{") {
            out.push(Segment::Brace('{'));
            rest = &rest[2..];
        } else if rest.starts_with("}}") {
            out.push(Segment::Brace('}'));
            rest = &rest[2..];
        } else if rest.starts_with('}') {
            out.push(Segment::Text("}"));
            rest = &rest[1..];
        } else {
            match rest[1..].find(['{', '}']) {
                Some(end) if rest.as_bytes()[end + 1] == b'}' && end > 0 => {
                    let raw = &rest[..end + 2];
                    let inner = &rest[1..end + 1];
                    let (head, format) = match inner.split_once(':') {
                        Some((head, format)) => (head, Some(format)),
                        None => (inner, None),
                    };
                    let name = head
                        .split(',')
                        .next()
                        .unwrap_or(head)
                        .trim_start_matches(['@', '$'])
                        .trim();
                    out.push(Segment::Hole { raw, name, format });
                    rest = &rest[end + 2..];
                }
                _ => {
                    out.push(Segment::Text("{"));
                    rest = &rest[1..];
                }
            }
        }
    }

    out
}

/// Substitute positional arguments into a message template
pub fn render_message(template: &str, args: &[FieldValue]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut next_named = 0usize;

    for segment in segments(template) {
        match segment {
            Segment::Text(text) => rendered.push_str(text),
            Segment::Brace(c) => rendered.push(c),
            Segment::Hole { raw, name, .. } => {
                let index = match name.parse::<usize>() {
                    Ok(index) => index,
                    Err(_) => {
                        next_named += 1;
                        next_named - 1
                    }
                };
                match args.get(index) {
                    Some(value) => rendered.push_str(&value.to_string()),
                    None => rendered.push_str(raw),
                }
            }
        }
    }

    rendered
}

/// Render a channel line for an event
pub fn render_output(template: &str, event: &LogEvent, parameters: &ResolvedParameters) -> String {
    let mut rendered = String::with_capacity(template.len() + event.message.len());

    for segment in segments(template) {
        match segment {
            Segment::Text(text) => rendered.push_str(text),
            Segment::Brace(c) => rendered.push(c),
            Segment::Hole { raw, name, format } => match name {
                "Timestamp" => {
                    let format = format
                        .filter(|f| is_valid_strftime(f))
                        .unwrap_or(DEFAULT_TIMESTAMP_FORMAT);
                    rendered.push_str(&event.timestamp.format(format).to_string());
                }
                "Level" => rendered.push_str(&format_level(event, format)),
                "Message" => {
                    if parameters.multi_line_events {
                        rendered.push_str(&event.message);
                    } else {
                        rendered.push_str(&sanitize_message(&event.message));
                    }
                }
                "NewLine" => rendered.push('\n'),
                "SourceContext" => {
                    if let Some(logged_type) = &event.logged_type {
                        rendered.push_str(logged_type);
                    }
                }
                "MemberName" => {
                    let member = &event.call_site.member;
                    if !member.is_empty() {
                        if event.logged_type.is_some() {
                            rendered.push_str("::");
                        }
                        rendered.push_str(member);
                    }
                }
                "SourceCodeInformation" => {
                    if !event.call_site.file.is_empty() {
                        rendered.push_str(&source_path(&event.call_site.file, parameters));
                        rendered.push(':');
                        rendered.push_str(&event.call_site.line.to_string());
                    }
                }
                "SourceCodePath" => {
                    rendered.push_str(&source_path(&event.call_site.file, parameters));
                }
                "LineNumber" => rendered.push_str(&event.call_site.line.to_string()),
                _ => rendered.push_str(raw),
            },
        }
    }

    rendered
}

/// Escape line breaks and tabs so one event stays on one line
pub fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Caller file path, relative to the source root when it is a prefix
pub fn source_path(file: &str, parameters: &ResolvedParameters) -> String {
    match parameters.source_root_path.as_deref() {
        Some(root) if !root.is_empty() && file.starts_with(root) => {
            file[root.len()..].trim_start_matches(['/', '\\']).to_string()
        }
        _ => file.to_string(),
    }
}

fn format_level(event: &LogEvent, format: Option<&str>) -> String {
    match format {
        Some("u3") => event.level.short_name().to_string(),
        Some("w3") => event.level.short_name().to_lowercase(),
        Some("u") => event.level.to_str().to_uppercase(),
        Some("w") => event.level.to_str().to_lowercase(),
        _ => event.level.to_str().to_string(),
    }
}

fn is_valid_strftime(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
