use crate::view::{ElementId, View};
use std::collections::HashSet;
use std::io::Write;

/// Prints every element update as a line of text.
pub struct TerminalView {
    out: Box<dyn Write + Send>,
    disabled: HashSet<ElementId>,
}

impl TerminalView {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            disabled: HashSet::new(),
        }
    }

    fn line(&mut self, label: &str, value: &str) {
        if let Err(e) = writeln!(self.out, "{label:>18}  {value}") {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl View for TerminalView {
    fn set_text(&mut self, id: ElementId, text: &str) {
        match id {
            // Button labels only mirror the scanning state, which is printed via status.
            ElementId::TriggerScan | ElementId::ViewRecommendations => {}
            _ => self.line(id.as_str(), text),
        }
    }

    fn set_html(&mut self, id: ElementId, html: &str) {
        let text = markup_to_lines(html);
        if text.is_empty() {
            self.line(id.as_str(), "(none)");
            return;
        }
        for (i, line) in text.iter().enumerate() {
            let label = if i == 0 { id.as_str() } else { "" };
            self.line(label, line);
        }
    }

    fn set_class(&mut self, _id: ElementId, _class: &str) {}

    fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if disabled {
            self.disabled.insert(id);
        } else {
            self.disabled.remove(&id);
        }
    }

    fn is_disabled(&self, id: ElementId) -> bool {
        self.disabled.contains(&id)
    }
}

/// Strip tags and join the text of each block element onto one line.
fn markup_to_lines(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_tag = false;
    let mut tag = String::new();

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if tag.starts_with("/div") || tag.starts_with("/tr") {
                    flush(&mut current, &mut lines);
                } else if tag.starts_with("/h4") || tag.starts_with("/td") {
                    current.push_str("  ");
                }
            }
            _ if in_tag => tag.push(c),
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut lines);
    lines
}

fn flush(current: &mut String, lines: &mut Vec<String>) {
    let collapsed = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        lines.push(collapsed);
    }
    current.clear();
}
