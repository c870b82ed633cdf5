pub mod asset;
pub mod error;
pub mod relations;
pub mod scanner;
pub mod stats;

pub use asset::{AssetKind, LoadedAsset, Relation, RelationKind, RelationTarget};
pub use error::ScanError;
pub use scanner::{AssetScanner, ProgressCallback, ScanOutcome, glob_match};
pub use stats::{KindStats, ScanStats, human_size};
