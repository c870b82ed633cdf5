use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("link {link} references unknown node '{reference}'")]
    DanglingLink { link: usize, reference: String },

    #[error("node '{node}' has a negative or non-finite value")]
    InvalidValue { node: String },

    #[error("duplicate node name '{name}'")]
    DuplicateName { name: String },

    #[error("color table has {domain_len} domain entries but an empty range")]
    EmptyColorRange { domain_len: usize },
}

/// A graph document as loaded from `data.json`: nodes, links between them,
/// and an ordinal color table keyed by node type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    #[serde(default)]
    pub colors: ColorTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: NodeRef,
    pub target: NodeRef,
}

/// Link endpoints may be given as node indices or node names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorTable {
    #[serde(default)]
    pub domain: Vec<String>,
    #[serde(default)]
    pub range: Vec<String>,
}

impl GraphDocument {
    /// Parse a document from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Resolve a link endpoint to a node index.
    pub fn resolve(&self, reference: &NodeRef) -> Option<usize> {
        match reference {
            NodeRef::Index(idx) => {
                if *idx < self.nodes.len() {
                    Some(*idx)
                } else {
                    None
                }
            }
            NodeRef::Name(name) => self.nodes.iter().position(|n| &n.name == name),
        }
    }

    /// Resolve every link to an index pair, in link order.
    pub fn resolved_links(&self) -> Result<Vec<(usize, usize)>, DocumentError> {
        let mut resolved = Vec::with_capacity(self.links.len());
        for (i, link) in self.links.iter().enumerate() {
            let source = self.resolve(&link.source).ok_or_else(|| {
                DocumentError::DanglingLink {
                    link: i,
                    reference: describe_ref(&link.source),
                }
            })?;
            let target = self.resolve(&link.target).ok_or_else(|| {
                DocumentError::DanglingLink {
                    link: i,
                    reference: describe_ref(&link.target),
                }
            })?;
            resolved.push((source, target));
        }
        Ok(resolved)
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        for node in &self.nodes {
            if !node.value.is_finite() || node.value < 0.0 {
                return Err(DocumentError::InvalidValue {
                    node: node.name.clone(),
                });
            }
        }

        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(DocumentError::DuplicateName {
                    name: node.name.clone(),
                });
            }
        }

        self.resolved_links()?;

        if !self.colors.domain.is_empty() && self.colors.range.is_empty() {
            return Err(DocumentError::EmptyColorRange {
                domain_len: self.colors.domain.len(),
            });
        }

        Ok(())
    }
}

fn describe_ref(reference: &NodeRef) -> String {
    match reference {
        NodeRef::Index(idx) => idx.to_string(),
        NodeRef::Name(name) => name.clone(),
    }
}
