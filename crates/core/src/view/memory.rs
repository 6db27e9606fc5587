use crate::view::{ElementId, View};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    /// Inner markup; when set it takes precedence over `text`.
    pub html: Option<String>,
    pub class: String,
    pub disabled: bool,
}

/// Element state held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    elements: BTreeMap<ElementId, Element>,
    writes: BTreeMap<ElementId, usize>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|e| e.text.as_str())
    }

    pub fn html(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|e| e.html.as_deref())
    }

    pub fn class(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|e| e.class.as_str())
    }

    /// Number of mutations applied to `id` since creation.
    pub fn write_count(&self, id: ElementId) -> usize {
        self.writes.get(&id).copied().unwrap_or(0)
    }

    fn touch(&mut self, id: ElementId) -> &mut Element {
        *self.writes.entry(id).or_default() += 1;
        self.elements.entry(id).or_default()
    }
}

impl View for MemoryView {
    fn set_text(&mut self, id: ElementId, text: &str) {
        let el = self.touch(id);
        el.text = text.to_string();
        el.html = None;
    }

    fn set_html(&mut self, id: ElementId, html: &str) {
        self.touch(id).html = Some(html.to_string());
    }

    fn set_class(&mut self, id: ElementId, class: &str) {
        self.touch(id).class = class.to_string();
    }

    fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        self.touch(id).disabled = disabled;
    }

    fn is_disabled(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|e| e.disabled)
    }
}
