use serde::{Deserialize, Serialize};

pub use rumor_graph::NodeId;

/// Contagion state of a single node.
///
/// The lifecycle is `Susceptible → {Spreader, Debunker, Recovered}`,
/// `Spreader → {Debunker, Recovered}`, `Debunker → Recovered`. `Recovered`
/// is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Has not yet taken a side.
    #[default]
    Susceptible,
    /// Actively transmitting the rumor.
    Spreader,
    /// Actively countering the rumor.
    Debunker,
    /// Neither spreading nor debunking, permanently.
    Recovered,
}

impl NodeState {
    /// Every state, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::Susceptible,
        Self::Spreader,
        Self::Debunker,
        Self::Recovered,
    ];

    /// One-letter compartment label (`S`, `I`, `D`, `R`).
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Susceptible => 'S',
            Self::Spreader => 'I',
            Self::Debunker => 'D',
            Self::Recovered => 'R',
        }
    }
}

/// Origin of a debunker.
///
/// Only meaningful while the node is a [`NodeState::Debunker`]. Once set the
/// kind never changes, even after the node recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebunkerKind {
    /// Not a debunker (yet).
    #[default]
    None,
    /// Seeded authoritative source (media, government).
    Official,
    /// Seeded high-degree grassroots node.
    OpinionLeader,
    /// Turned debunker through ordinary contagion.
    Converted,
}

/// Recovery multiplier applied to `delta` for seeded debunkers; they lose
/// interest more slowly than converted ones.
pub const ORGANIZED_DECAY: f64 = 0.3;

impl DebunkerKind {
    /// Whether this debunker was seeded at the intervention step.
    #[must_use]
    pub const fn is_organized(self) -> bool {
        matches!(self, Self::Official | Self::OpinionLeader)
    }

    /// Recovery probability for a debunker of this kind given base `delta`.
    ///
    /// Kind [`DebunkerKind::None`] never recovers through this path.
    #[must_use]
    pub fn recovery_probability(self, delta: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Official | Self::OpinionLeader => delta * ORGANIZED_DECAY,
            Self::Converted => delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_distinct() {
        let symbols: Vec<char> = NodeState::ALL.iter().map(|s| s.symbol()).collect();
        assert_eq!(symbols, vec!['S', 'I', 'D', 'R']);
    }

    #[test]
    fn organized_debunkers_decay_slower() {
        let delta = 0.5;
        assert!((DebunkerKind::Converted.recovery_probability(delta) - 0.5).abs() < 1e-12);
        assert!((DebunkerKind::Official.recovery_probability(delta) - 0.15).abs() < 1e-12);
        assert!((DebunkerKind::OpinionLeader.recovery_probability(delta) - 0.15).abs() < 1e-12);
        assert!(DebunkerKind::None.recovery_probability(delta).abs() < f64::EPSILON);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&DebunkerKind::OpinionLeader).expect("serialize");
        assert_eq!(json, "\"opinion_leader\"");
        let back: NodeState = serde_json::from_str("\"spreader\"").expect("deserialize");
        assert_eq!(back, NodeState::Spreader);
    }
}
