//! Lot configuration structures.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, CredentialRegistry, NodeKind, Position, Vehicle};
use crate::util::serde::NodeId;

/// Environment variable naming a JSON config file.
pub const ENV_CONFIG_PATH: &str = "PARKING_CONFIG";
/// Environment variable selecting the file backend directory.
pub const ENV_STATE_DIR: &str = "PARKING_STATE_DIR";
/// Environment variable overriding the expiry sweep interval (seconds).
pub const ENV_SWEEP_SECS: &str = "PARKING_SWEEP_SECS";

/// Node entry of a layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique node id.
    pub id: NodeId,
    /// Node role.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Display name.
    pub name: String,
    /// Rendering position.
    #[serde(default)]
    pub position: Position,
}

/// Undirected edge entry of a layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// One endpoint.
    pub from: NodeId,
    /// Other endpoint.
    pub to: NodeId,
    /// Walking/driving distance.
    pub weight: f64,
}

/// Static lot topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Nodes in declaration order.
    pub nodes: Vec<NodeSpec>,
    /// Edges in declaration order.
    pub edges: Vec<EdgeSpec>,
}

impl LayoutConfig {
    /// The built-in 9-slot lot: one entrance, a distribution junction and
    /// three lanes of three slots, meshed by column. The middle lane is the
    /// cheapest to reach.
    pub fn default_lot() -> Self {
        let node = |id: &str, kind, name: &str, x, y| NodeSpec {
            id: id.into(),
            kind,
            name: name.into(),
            position: Position::new(x, y),
        };
        let edge = |from: &str, to: &str, weight| EdgeSpec {
            from: from.into(),
            to: to.into(),
            weight,
        };

        let mut nodes = vec![
            node("ENTRANCE", NodeKind::Entrance, "Main Entrance", 50.0, 300.0),
            node("MAIN_JUNCTION", NodeKind::Junction, "Distribution Point", 150.0, 300.0),
        ];
        let mut edges = vec![edge("ENTRANCE", "MAIN_JUNCTION", 10.0)];
        let lane_weights = [8.0, 5.0, 8.0];
        for (lane, lane_weight) in lane_weights.into_iter().enumerate() {
            let y = 150.0 * (lane as f64 + 1.0);
            let start = format!("LANE{}_START", lane + 1);
            nodes.push(node(&start, NodeKind::Junction, &format!("Lane {} Start", lane + 1), 250.0, y));
            edges.push(edge("MAIN_JUNCTION", &start, lane_weight));
            let mut prev = start;
            for col in 0..3 {
                let n = lane * 3 + col + 1;
                let id = format!("S{n}");
                let x = 350.0 + 100.0 * col as f64;
                nodes.push(node(&id, NodeKind::Slot, &format!("Slot {n}"), x, y));
                edges.push(edge(&prev, &id, 3.0));
                prev = id;
            }
        }
        // Column links between neighbouring lanes.
        for col in 1..=3 {
            edges.push(edge(&format!("S{col}"), &format!("S{}", col + 3), 4.0));
            edges.push(edge(&format!("S{}", col + 3), &format!("S{}", col + 6), 4.0));
        }
        Self { nodes, edges }
    }

    /// Check ids are unique, edges reference known nodes with positive
    /// weights, and at least one slot exists.
    pub fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err("node id must not be empty".into());
            }
            if !ids.insert(node.id.as_str()) {
                return Err(format!("duplicate node `{}`", node.id));
            }
        }
        if !self.nodes.iter().any(|n| n.kind == NodeKind::Slot) {
            return Err("layout has no slots".into());
        }
        for edge in &self.edges {
            if !ids.contains(edge.from.as_str()) || !ids.contains(edge.to.as_str()) {
                return Err(format!("edge {} -> {} references an unknown node", edge.from, edge.to));
            }
            if !edge.weight.is_finite() || edge.weight <= 0.0 {
                return Err(format!("edge {} -> {} must have a positive weight", edge.from, edge.to));
            }
        }
        Ok(())
    }
}

/// Slot state backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// State lives only as long as the process.
    #[default]
    InMemory,
    /// JSON document under `dir`.
    File {
        /// Directory holding the state file.
        dir: PathBuf,
        /// File stem.
        #[serde(default = "default_stream")]
        stream: String,
    },
}

fn default_stream() -> String {
    "slots".into()
}

const fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_entrance() -> NodeId {
    "ENTRANCE".into()
}

const fn default_history_cap() -> usize {
    crate::core::DEFAULT_HISTORY_CAP
}

/// Credentials shipped with the demo lot.
pub fn default_credentials() -> CredentialRegistry {
    let vehicle = |owner: &str, plate: &str, class: &str| Vehicle {
        owner: owner.into(),
        plate: plate.into(),
        class: class.into(),
    };
    [
        ("TAG12345".to_string(), vehicle("John Doe", "ABC-1234", "General")),
        ("TAG67890".to_string(), vehicle("Jane Smith", "XYZ-5678", "VIP")),
        ("TAG11223".to_string(), vehicle("Admin", "ADM-0001", "Staff")),
    ]
    .into_iter()
    .collect()
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotConfig {
    /// Lot topology.
    #[serde(default = "LayoutConfig::default_lot")]
    pub layout: LayoutConfig,
    /// Gate credentials.
    #[serde(default = "default_credentials")]
    pub credentials: CredentialRegistry,
    /// Slot state backend.
    #[serde(default)]
    pub store: StoreBackendConfig,
    /// Seconds between expiry sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Node vehicles enter at.
    #[serde(default = "default_entrance")]
    pub entrance: NodeId,
    /// Archived bookings retained.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default_lot(),
            credentials: default_credentials(),
            store: StoreBackendConfig::default(),
            sweep_interval_secs: default_sweep_interval_secs(),
            entrance: default_entrance(),
            history_cap: default_history_cap(),
        }
    }
}

impl LotConfig {
    /// Validate layout and scalar settings.
    pub fn validate(&self) -> Result<(), String> {
        self.layout
            .validate()
            .map_err(|e| format!("layout invalid: {e}"))?;
        if self.sweep_interval_secs == 0 {
            return Err("sweep_interval_secs must be greater than 0".into());
        }
        if self.history_cap == 0 {
            return Err("history_cap must be greater than 0".into());
        }
        if !self.layout.nodes.iter().any(|n| n.id == self.entrance) {
            return Err(format!("entrance `{}` is not a layout node", self.entrance));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the environment, loading `.env` first.
    ///
    /// `PARKING_CONFIG` points at a JSON file (defaults apply otherwise);
    /// `PARKING_STATE_DIR` and `PARKING_SWEEP_SECS` override the file.
    pub fn from_env() -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                serde_json::from_str::<Self>(&raw).with_context(|| format!("parsing config file {path}"))?
            }
            Err(_) => Self::default(),
        };
        if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
            cfg.store = StoreBackendConfig::File {
                dir: PathBuf::from(dir),
                stream: default_stream(),
            };
        }
        if let Ok(secs) = std::env::var(ENV_SWEEP_SECS) {
            cfg.sweep_interval_secs = secs
                .parse()
                .with_context(|| format!("{ENV_SWEEP_SECS} must be an integer, got `{secs}`"))?;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
