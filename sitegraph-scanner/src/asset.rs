use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Asset type, classified by file extension. The `as_str` names appear in
/// the stats output and as the `type` of exported graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Html,
    Css,
    JavaScript,
    Json,
    Png,
    Jpeg,
    Gif,
    Svg,
    Ico,
    Woff,
    Text,
    Other,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("html") | Some("htm") => AssetKind::Html,
            Some("css") => AssetKind::Css,
            Some("js") | Some("mjs") => AssetKind::JavaScript,
            Some("json") => AssetKind::Json,
            Some("png") => AssetKind::Png,
            Some("jpg") | Some("jpeg") => AssetKind::Jpeg,
            Some("gif") => AssetKind::Gif,
            Some("svg") => AssetKind::Svg,
            Some("ico") => AssetKind::Ico,
            Some("woff") | Some("woff2") => AssetKind::Woff,
            Some("txt") | Some("md") => AssetKind::Text,
            _ => AssetKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Html => "Html",
            AssetKind::Css => "Css",
            AssetKind::JavaScript => "JavaScript",
            AssetKind::Json => "Json",
            AssetKind::Png => "Png",
            AssetKind::Jpeg => "Jpeg",
            AssetKind::Gif => "Gif",
            AssetKind::Svg => "Svg",
            AssetKind::Ico => "Ico",
            AssetKind::Woff => "Woff",
            AssetKind::Text => "Text",
            AssetKind::Other => "Other",
        }
    }

    /// Whether this kind of asset gets parsed for outgoing relations.
    pub fn is_parsed(&self) -> bool {
        matches!(self, AssetKind::Html | AssetKind::Css)
    }
}

/// How one asset refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    Anchor,
    Script,
    Stylesheet,
    Icon,
    Image,
    Iframe,
    CssImport,
    CssUrl,
}

impl RelationKind {
    /// Anchors are recorded but never pull new assets into the scan.
    pub fn is_followed(&self) -> bool {
        !matches!(self, RelationKind::Anchor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Anchor => "Anchor",
            RelationKind::Script => "Script",
            RelationKind::Stylesheet => "Stylesheet",
            RelationKind::Icon => "Icon",
            RelationKind::Image => "Image",
            RelationKind::Iframe => "Iframe",
            RelationKind::CssImport => "CssImport",
            RelationKind::CssUrl => "CssUrl",
        }
    }
}

/// Where a reference points after resolution against the scan root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationTarget {
    /// A root-relative path inside the scanned tree.
    Internal(PathBuf),
    /// An absolute URL leaving the tree.
    External(String),
    /// A reference that escaped the root or could not be resolved.
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub target: RelationTarget,
}

/// An asset that was read from disk during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedAsset {
    /// Root-relative path.
    pub path: PathBuf,
    pub kind: AssetKind,
    pub size: u64,
    pub depth: usize,
    pub relations: Vec<Relation>,
}

impl LoadedAsset {
    pub fn new(path: PathBuf, kind: AssetKind, size: u64, depth: usize) -> Self {
        Self {
            path,
            kind,
            size,
            depth,
            relations: Vec::new(),
        }
    }

    /// Root-absolute URL form of the path, e.g. `/blog/index.html`.
    pub fn url_path(&self) -> String {
        format!("/{}", path_to_slashes(&self.path))
    }

    pub fn display_name(&self) -> String {
        path_to_slashes(&self.path)
    }
}

pub(crate) fn path_to_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
