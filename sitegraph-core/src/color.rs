use crate::document::ColorTable;

/// The classic ten-color categorical palette, used when a document carries
/// no color table of its own.
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Ordinal color scale: maps domain keys to range entries in order. Unknown
/// keys are appended to the domain as they are seen, and the range cycles
/// when it runs out.
#[derive(Debug, Clone)]
pub struct ColorScale {
    domain: Vec<String>,
    range: Vec<String>,
}

impl ColorScale {
    pub fn new(table: &ColorTable) -> Self {
        if table.range.is_empty() {
            let mut scale = Self::from_palette();
            scale.domain = table.domain.clone();
            return scale;
        }
        Self {
            domain: table.domain.clone(),
            range: table.range.clone(),
        }
    }

    pub fn from_palette() -> Self {
        Self {
            domain: Vec::new(),
            range: CATEGORY_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Color for a key, extending the domain if the key is new.
    pub fn color_for(&mut self, key: &str) -> String {
        let idx = match self.domain.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => {
                self.domain.push(key.to_string());
                self.domain.len() - 1
            }
        };
        self.range[idx % self.range.len()].clone()
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::from_palette()
    }
}
