//! Builders to construct the lot graph, state store and service from configuration.

use crate::config::{LayoutConfig, LotConfig, StoreBackendConfig};
use crate::core::{AuditSink, LotGraph, ParkingError, SlotBackend, SlotStore};
use crate::infra::store::{InMemoryBackend, JsonFileBackend};
use crate::runtime::ParkingLot;
use crate::util::serde::TimestampMs;

/// Build the topology graph from a layout description.
pub fn build_graph(layout: &LayoutConfig) -> Result<LotGraph, ParkingError> {
    let mut graph = LotGraph::new();
    for node in &layout.nodes {
        graph.add_node(node.id.clone(), node.kind, node.name.clone(), node.position)?;
    }
    for edge in &layout.edges {
        graph.add_edge(&edge.from, &edge.to, edge.weight)?;
    }
    tracing::info!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        "lot graph initialized"
    );
    Ok(graph)
}

/// Instantiate the configured slot state backend.
pub fn build_backend(cfg: &StoreBackendConfig) -> Result<Box<dyn SlotBackend>, ParkingError> {
    Ok(match cfg {
        StoreBackendConfig::InMemory => Box::new(InMemoryBackend::new()),
        StoreBackendConfig::File { dir, stream } => Box::new(JsonFileBackend::new(dir, stream.clone())?),
    })
}

/// Assembles a [`ParkingLot`] from a [`LotConfig`].
pub struct LotBuilder {
    config: LotConfig,
    backend: Option<Box<dyn SlotBackend>>,
    audit: Option<Box<dyn AuditSink>>,
}

impl LotBuilder {
    /// Start from a configuration.
    pub fn new(config: LotConfig) -> Self {
        Self {
            config,
            backend: None,
            audit: None,
        }
    }

    /// Configuration being built.
    pub const fn config(&self) -> &LotConfig {
        &self.config
    }

    /// Use this backend instead of the configured one.
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn SlotBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach an audit sink to the slot store.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration, build the graph, open the store.
    pub fn build(self, now_ms: TimestampMs) -> Result<ParkingLot, ParkingError> {
        self.config
            .validate()
            .map_err(|e| ParkingError::InvalidLayout(format!("config invalid: {e}")))?;

        let graph = build_graph(&self.config.layout)?;
        let backend = match self.backend {
            Some(backend) => backend,
            None => build_backend(&self.config.store)?,
        };
        let mut store = SlotStore::open(&graph.slot_ids(), backend, now_ms)?
            .with_history_cap(self.config.history_cap);
        if let Some(audit) = self.audit {
            store = store.with_audit(audit);
        }
        Ok(ParkingLot::new(
            graph,
            store,
            self.config.credentials,
            self.config.entrance,
        ))
    }
}
