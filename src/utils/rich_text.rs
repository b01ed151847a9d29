use crate::internal::models::{Body, Op};

/// Concatenate the inserted text of every operation, dropping formatting.
pub fn to_plain_text(ops: &[Op]) -> String {
    ops.iter().filter_map(|op| op.insert.as_deref()).collect()
}

/// Render operations as Markdown. Formatting wraps the non-whitespace core of
/// each insert so markers never enclose leading or trailing newlines.
pub fn to_markdown(ops: &[Op]) -> String {
    let mut out = String::new();
    for op in ops {
        let Some(text) = op.insert.as_deref() else {
            continue;
        };
        let core = text.trim();
        if core.is_empty() {
            out.push_str(text);
            continue;
        }

        let start = text.len() - text.trim_start().len();
        let end = start + core.len();

        let mut rendered = core.to_string();
        if let Some(attrs) = &op.attributes {
            if let Some(link) = attrs.link.as_deref() {
                rendered = format!("[{}]({})", rendered, link);
            }
            if attrs.bold == Some(true) {
                rendered = format!("**{}**", rendered);
            }
            if attrs.italic == Some(true) {
                rendered = format!("_{}_", rendered);
            }
        }

        out.push_str(&text[..start]);
        out.push_str(&rendered);
        out.push_str(&text[end..]);
    }
    out
}

impl Body {
    pub fn to_plain_text(&self) -> String {
        to_plain_text(self.ops())
    }

    pub fn to_markdown(&self) -> String {
        to_markdown(self.ops())
    }
}
