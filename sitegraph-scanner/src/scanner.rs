use crate::asset::{AssetKind, LoadedAsset, RelationKind, RelationTarget, path_to_slashes};
use crate::error::{Result, ScanError};
use crate::relations::extract_relations;
use crate::stats::ScanStats;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use sitegraph_core::{CATEGORY_PALETTE, ColorTable, GraphDocument, GraphLink, GraphNode, NodeRef};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Walks a site root on disk, loading entry assets and everything they
/// reference, except through anchors.
pub struct AssetScanner {
    visited: Arc<Mutex<HashSet<PathBuf>>>,
    loaded: Arc<Mutex<Vec<LoadedAsset>>>,
    max_depth: Option<usize>,
    progress_callback: Option<ProgressCallback>,
}

impl AssetScanner {
    pub fn new() -> Self {
        Self {
            visited: Arc::new(Mutex::new(HashSet::new())),
            loaded: Arc::new(Mutex::new(Vec::new())),
            max_depth: None,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn scan(
        &self,
        root: &Path,
        entry_pattern: &str,
        workers: usize,
    ) -> Result<ScanOutcome> {
        let started = Instant::now();
        info!(
            "Starting scan of {} with {} workers",
            root.display(),
            workers
        );

        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }

        let workers = workers.max(1);

        // Fresh state for this scan
        {
            self.visited.lock().await.clear();
            self.loaded.lock().await.clear();
        }

        // Find entry assets under the root
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if glob_match(entry_pattern, &path_to_slashes(relative)) {
                entries.push(relative.to_path_buf());
            }
        }
        entries.sort();
        debug!("{} entry assets match {}", entries.len(), entry_pattern);

        // Mark entry assets as visited
        {
            let mut visited = self.visited.lock().await;
            for entry in &entries {
                visited.insert(entry.clone());
            }
        }

        // Each worker owns a queue: VecDeque<(path, depth)>
        let worker_queues: Arc<Vec<Mutex<VecDeque<(PathBuf, usize)>>>> =
            Arc::new((0..workers).map(|_| Mutex::new(VecDeque::new())).collect());

        // Distribute entry assets round-robin
        for (i, entry) in entries.into_iter().enumerate() {
            let mut queue = worker_queues[i % workers].lock().await;
            queue.push_back((entry, 0));
        }

        // Spawn worker tasks
        let mut worker_handles = Vec::new();

        for worker_id in 0..workers {
            let root = root.to_path_buf();
            let max_depth = self.max_depth;
            let progress_cb = self.progress_callback.clone();
            let visited = self.visited.clone();
            let loaded = self.loaded.clone();
            let worker_queues_clone = worker_queues.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);
                let mut empty_iterations = 0;
                const MAX_EMPTY_ITERATIONS: usize = 10;

                loop {
                    let work_item = {
                        let mut queue = worker_queues_clone[worker_id].lock().await;
                        queue.pop_front()
                    };

                    let (path, depth) = if let Some(item) = work_item {
                        empty_iterations = 0;
                        item
                    } else {
                        // Own queue is empty - check if all workers are done
                        if Self::all_queues_empty(&worker_queues_clone).await {
                            empty_iterations += 1;
                            debug!(
                                "Worker {} found all queues empty ({}/{})",
                                worker_id, empty_iterations, MAX_EMPTY_ITERATIONS
                            );
                            if empty_iterations >= MAX_EMPTY_ITERATIONS {
                                debug!("Worker {} exiting", worker_id);
                                break;
                            }
                        } else {
                            empty_iterations = 0;
                        }

                        // Sleep and retry
                        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
                        continue;
                    };

                    // Report progress
                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, format!("/{}", path_to_slashes(&path)));
                    }

                    let asset = match Self::load_asset_static(&root, &path, depth).await {
                        Ok(asset) => asset,
                        Err(e) => {
                            warn!("Skipping {}: {}", path.display(), e);
                            continue;
                        }
                    };

                    // Queue internal targets of followed relations
                    if max_depth.is_none_or(|limit| depth < limit) {
                        let mut target_worker = 0;
                        for relation in &asset.relations {
                            if !relation.kind.is_followed() {
                                continue;
                            }
                            let RelationTarget::Internal(ref target) = relation.target else {
                                continue;
                            };

                            // Check and mark as visited
                            let should_queue = {
                                let mut visited_lock = visited.lock().await;
                                if !visited_lock.contains(target) {
                                    visited_lock.insert(target.clone());
                                    true
                                } else {
                                    false
                                }
                            };

                            if should_queue {
                                let mut queue =
                                    worker_queues_clone[target_worker].lock().await;
                                queue.push_back((target.clone(), depth + 1));
                                drop(queue); // Release lock immediately

                                // Round-robin to next worker
                                target_worker = (target_worker + 1) % worker_queues_clone.len();
                            }
                        }
                    }

                    let mut loaded_lock = loaded.lock().await;
                    loaded_lock.push(asset);
                }

                debug!("Worker {} finished", worker_id);
            });

            worker_handles.push(handle);
        }

        // Wait for all workers to complete
        for result in futures::future::join_all(worker_handles).await {
            result?;
        }

        // Node order is sorted by path so repeated scans of the same tree
        // produce the same graph
        let assets = {
            let mut loaded = self.loaded.lock().await;
            loaded.sort_by(|a, b| a.path.cmp(&b.path));
            loaded.clone()
        };

        let mut stats = ScanStats::new();
        for asset in &assets {
            stats.record(asset.kind, asset.size);
        }

        let mut graph: DiGraph<LoadedAsset, RelationKind> = DiGraph::new();
        let mut index_of: HashMap<PathBuf, NodeIndex> = HashMap::new();
        for asset in &assets {
            let index = graph.add_node(asset.clone());
            index_of.insert(asset.path.clone(), index);
        }

        // Edges cover every recorded relation, anchors included; targets
        // that never loaded are tallied instead
        for asset in &assets {
            let Some(&source) = index_of.get(&asset.path) else {
                continue;
            };
            for relation in &asset.relations {
                match relation.target {
                    RelationTarget::Internal(ref target) => match index_of.get(target) {
                        Some(&target_index) => {
                            graph.add_edge(source, target_index, relation.kind);
                        }
                        None => stats.unresolved += 1,
                    },
                    RelationTarget::External(_) => stats.external += 1,
                    RelationTarget::Unresolved(_) => stats.unresolved += 1,
                }
            }
        }

        stats.elapsed = started.elapsed();
        info!(
            "Scan complete. Loaded {} assets with {} references in {:.2?}",
            graph.node_count(),
            graph.edge_count(),
            stats.elapsed
        );

        Ok(ScanOutcome {
            root: root.to_path_buf(),
            graph,
            stats,
        })
    }

    /// Check if all worker queues are empty
    async fn all_queues_empty(worker_queues: &Arc<Vec<Mutex<VecDeque<(PathBuf, usize)>>>>) -> bool {
        for queue in worker_queues.iter() {
            if !queue.lock().await.is_empty() {
                return false;
            }
        }
        true
    }

    /// Static version of asset loading for use in spawned tasks
    async fn load_asset_static(root: &Path, path: &Path, depth: usize) -> Result<LoadedAsset> {
        let absolute = root.join(path);
        debug!("Loading {}", absolute.display());

        let bytes = tokio::fs::read(&absolute).await?;
        let kind = AssetKind::from_path(path);
        let mut asset = LoadedAsset::new(path.to_path_buf(), kind, bytes.len() as u64, depth);

        if kind.is_parsed() {
            let content = String::from_utf8_lossy(&bytes);
            asset.relations = extract_relations(path, kind, &content);
            debug!(
                "{} has {} relations",
                asset.url_path(),
                asset.relations.len()
            );
        }

        Ok(asset)
    }
}

impl Default for AssetScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a finished scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub root: PathBuf,
    pub graph: DiGraph<LoadedAsset, RelationKind>,
    pub stats: ScanStats,
}

impl ScanOutcome {
    /// Convert the scanned graph into the renderable document form. Node
    /// values grow with the logarithm of the asset size so one fat image
    /// does not dwarf the rest of the site.
    pub fn to_document(&self) -> GraphDocument {
        let mut domain: Vec<String> = Vec::new();
        let mut nodes = Vec::new();
        for asset in self.graph.node_weights() {
            let kind = asset.kind.as_str().to_string();
            if !domain.contains(&kind) {
                domain.push(kind.clone());
            }
            nodes.push(GraphNode {
                name: asset.display_name(),
                kind,
                value: ((1 + asset.size) as f64).log2() / 10.0,
                path: asset.url_path(),
            });
        }

        let links = self
            .graph
            .edge_references()
            .map(|edge| GraphLink {
                source: NodeRef::Index(edge.source().index()),
                target: NodeRef::Index(edge.target().index()),
            })
            .collect();

        let colors = if domain.is_empty() {
            ColorTable::default()
        } else {
            let range = CATEGORY_PALETTE
                .iter()
                .take(domain.len())
                .map(|color| color.to_string())
                .collect();
            ColorTable { domain, range }
        };

        GraphDocument {
            nodes,
            links,
            colors,
        }
    }
}

/// Match a root-relative slash path against a glob pattern. `**` spans any
/// number of directories, `*` matches within a single segment.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let path: Vec<&str> = path.split('/').collect();
    match_segments(&pattern, &path)
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((head, rest)) => match path.split_first() {
            Some((segment, path_rest)) => {
                match_segment(head, segment) && match_segments(rest, path_rest)
            }
            None => false,
        },
    }
}

fn match_segment(pattern: &str, segment: &str) -> bool {
    match_chars(pattern.as_bytes(), segment.as_bytes())
}

fn match_chars(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => (0..=text.len()).any(|skip| match_chars(rest, &text[skip..])),
        Some((byte, rest)) => match text.split_first() {
            Some((first, text_rest)) => byte == first && match_chars(rest, text_rest),
            None => false,
        },
    }
}
