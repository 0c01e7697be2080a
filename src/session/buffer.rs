/// Finalised transcript fragments of one attempt
///
/// Interim fragments are never stored here; they only feed the live display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtteranceBuffer {
    fragments: Vec<String>,
}

impl UtteranceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_final(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }

    /// Fragments joined by single spaces, in arrival order
    pub fn text(&self) -> String {
        self.fragments.join(" ")
    }

    /// Text submitted for the attempt
    pub fn trimmed(&self) -> String {
        self.text().trim().to_string()
    }

    /// Live display: finalised text followed by the pending interim fragment
    pub fn display(&self, interim: Option<&str>) -> String {
        match interim.filter(|s| !s.is_empty()) {
            Some(interim) if self.fragments.is_empty() => interim.to_string(),
            Some(interim) => format!("{} {}", self.text(), interim),
            None => self.text(),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}
