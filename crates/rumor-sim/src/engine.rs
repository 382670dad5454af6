//! State transition engine.
//!
//! A [`Simulation`] owns the network, the committed per-node state, and the
//! dynamics random stream. Each call to [`Simulation::step`] advances one
//! synchronous step:
//!
//! 1. If the new step equals the intervention step, debunkers are seeded on
//!    the highest-degree susceptible nodes (officials first, then opinion
//!    leaders). Seeding writes straight into the committed state so the same
//!    step's transitions already see the new debunkers.
//! 2. Every node's next state is computed from a read-only snapshot of the
//!    committed state, visiting nodes in ascending id order and drawing from
//!    the single dynamics stream.
//! 3. The next-state buffers are swapped in and the population fractions are
//!    recorded.
//!
//! Before the intervention step only the `S`/`I`/`R` contagion rules apply.
//! From the intervention step on, influence ranges of active officials and
//! opinion leaders are resolved once per step and boost the transition
//! probabilities of nodes inside them, official range taking precedence.

use std::cmp::Reverse;
use std::mem;
use std::time::Instant;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rumor_graph::{FixedBitSet, Graph, GraphError, GraphStats, generate, influence_union};

use crate::config::{SimulationConfig, TransitionRates};
use crate::error::SimError;
use crate::metrics::{PopulationFractions, TimeSeries};
use crate::node::{DebunkerKind, NodeId, NodeState};
use crate::rng::{Stream, hit, stream_rng, unit};

/// Steps between `info!` progress summaries.
pub const SUMMARY_INTERVAL: usize = 5;

/// Multipliers applied to base probabilities inside an influence range.
///
/// For a susceptible node `primary` scales `alpha_r` and `secondary` scales
/// `alpha_d`. For a spreader `primary` scales `beta_d` and `secondary`
/// scales `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    /// Multiplier on `alpha_r` / `beta_d`.
    pub primary: f64,
    /// Multiplier on `alpha_d` / `delta`.
    pub secondary: f64,
}

/// Boost inside an official's influence range.
pub const OFFICIAL_BOOST: Boost = Boost {
    primary: 1.5,
    secondary: 1.3,
};

/// Boost inside an opinion leader's influence range.
pub const OPINION_LEADER_BOOST: Boost = Boost {
    primary: 1.3,
    secondary: 1.2,
};

const NO_BOOST: Boost = Boost {
    primary: 1.0,
    secondary: 1.0,
};

/// Which influence range covers a node during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
    /// Within `official_layers` hops of an active official.
    Official,
    /// Within `opinion_layers` hops of an active opinion leader, and not
    /// covered by an official.
    OpinionLeader,
    /// Outside every range.
    None,
}

impl Exposure {
    /// Probability multipliers for this exposure.
    #[must_use]
    pub const fn boost(self) -> Boost {
        match self {
            Self::Official => OFFICIAL_BOOST,
            Self::OpinionLeader => OPINION_LEADER_BOOST,
            Self::None => NO_BOOST,
        }
    }
}

/// Non-fatal conditions observed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimWarning {
    /// Fewer susceptible nodes than requested debunkers at the intervention
    /// step; every eligible node was seeded.
    InsufficientEligibleNodes {
        /// Step at which seeding happened.
        step: usize,
        /// `D0`.
        requested: usize,
        /// Debunkers actually seeded.
        seeded: usize,
        /// Susceptible nodes available.
        eligible: usize,
    },
}

impl std::fmt::Display for SimWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientEligibleNodes {
                step,
                requested,
                seeded,
                eligible,
            } => write!(
                f,
                "step {step}: requested {requested} debunkers but only {eligible} susceptible \
                 nodes were eligible; seeded {seeded}"
            ),
        }
    }
}

/// What happened at the intervention step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionReport {
    /// Step at which seeding happened.
    pub step: usize,
    /// Susceptible nodes available for seeding.
    pub eligible: usize,
    /// Officials requested (`round(D0 * official_ratio)`).
    pub officials_requested: usize,
    /// Opinion leaders requested.
    pub opinion_leaders_requested: usize,
    /// Nodes seeded as officials, highest degree first.
    pub officials: Vec<NodeId>,
    /// Nodes seeded as opinion leaders, highest degree first.
    pub opinion_leaders: Vec<NodeId>,
}

impl InterventionReport {
    /// Total debunkers requested (`D0`).
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.officials_requested + self.opinion_leaders_requested
    }

    /// Total debunkers seeded.
    #[must_use]
    pub fn seeded(&self) -> usize {
        self.officials.len() + self.opinion_leaders.len()
    }

    /// Whether fewer debunkers were seeded than requested.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.seeded() < self.requested()
    }
}

/// Everything a finished run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    /// Configuration the run used.
    pub config: SimulationConfig,
    /// Summary of the generated network.
    pub network: GraphStats,
    /// Population fractions, `steps + 1` samples.
    pub series: TimeSeries,
    /// State of every node after the last step.
    pub final_states: Vec<NodeState>,
    /// Debunker kind of every node after the last step.
    pub final_kinds: Vec<DebunkerKind>,
    /// Seeding outcome, if the intervention step was reached.
    pub intervention: Option<InterventionReport>,
    /// Non-fatal conditions, in the order they occurred.
    pub warnings: Vec<SimWarning>,
}

impl RunOutput {
    /// Stable digest of the final states, kinds, and the full series.
    ///
    /// Two runs with the same configuration produce the same fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hash = Fnv::new();
        for (state, kind) in self.final_states.iter().zip(&self.final_kinds) {
            hash.write(&[*state as u8, *kind as u8]);
        }
        for column in [
            &self.series.susceptible,
            &self.series.spreader,
            &self.series.debunker,
            &self.series.recovered,
        ] {
            for value in column {
                hash.write(&value.to_bits().to_le_bytes());
            }
        }
        hash.finish()
    }
}

struct Fnv(u64);

impl Fnv {
    const fn new() -> Self {
        Self(0xcbf2_9ce4_8422_2325)
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(0x0100_0000_01b3);
        }
    }

    const fn finish(&self) -> u64 {
        self.0
    }
}

/// A single simulation run in progress.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    graph: Graph,
    rng: StdRng,
    step: usize,
    states: Vec<NodeState>,
    kinds: Vec<DebunkerKind>,
    next_states: Vec<NodeState>,
    next_kinds: Vec<DebunkerKind>,
    series: TimeSeries,
    intervention: Option<InterventionReport>,
    warnings: Vec<SimWarning>,
}

impl Simulation {
    /// Validate `config`, grow the network from the topology stream, seed
    /// the initial spreaders, and record the `t = 0` sample.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for a bad configuration and
    /// [`SimError::Graph`] if network generation fails.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let started = Instant::now();
        let mut topology = stream_rng(config.seed, Stream::Topology);
        let graph = generate(config.nodes, config.edges_per_node, &mut topology)?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "network ready"
        );
        Ok(Self::assemble(config, graph))
    }

    /// Like [`Simulation::new`] but on a caller-supplied network.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for a bad configuration or a
    /// network whose size differs from `config.nodes`.
    pub fn with_graph(config: SimulationConfig, graph: Graph) -> Result<Self, SimError> {
        config.validate()?;
        if graph.node_count() != config.nodes {
            return Err(SimError::invalid(
                "nodes",
                format!(
                    "network has {} nodes but configuration expects {}",
                    graph.node_count(),
                    config.nodes
                ),
            ));
        }
        Ok(Self::assemble(config, graph))
    }

    fn assemble(config: SimulationConfig, graph: Graph) -> Self {
        let nodes = config.nodes;
        let mut rng = stream_rng(config.seed, Stream::Dynamics);
        let mut states = vec![NodeState::Susceptible; nodes];
        for node in index::sample(&mut rng, nodes, config.initial_spreaders) {
            states[node] = NodeState::Spreader;
        }
        let kinds = vec![DebunkerKind::None; nodes];

        let mut series = TimeSeries::with_steps(config.steps);
        series.record(&states);

        info!(
            seed = config.seed,
            nodes,
            initial_spreaders = config.initial_spreaders,
            steps = config.steps,
            intervention_step = config.intervention_step,
            initial_debunkers = config.initial_debunkers,
            "simulation initialized"
        );

        Self {
            next_states: states.clone(),
            next_kinds: kinds.clone(),
            config,
            graph,
            rng,
            step: 0,
            states,
            kinds,
            series,
            intervention: None,
            warnings: Vec::new(),
        }
    }

    /// Configuration of this run.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The contact network.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Last completed step; 0 before the first call to [`Simulation::step`].
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.step
    }

    /// Whether all `steps` have run.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.step >= self.config.steps
    }

    /// Committed state of every node.
    #[must_use]
    pub fn states(&self) -> &[NodeState] {
        &self.states
    }

    /// Committed debunker kind of every node.
    #[must_use]
    pub fn kinds(&self) -> &[DebunkerKind] {
        &self.kinds
    }

    /// Samples recorded so far.
    #[must_use]
    pub const fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Seeding outcome, once the intervention step has run.
    #[must_use]
    pub const fn intervention(&self) -> Option<&InterventionReport> {
        self.intervention.as_ref()
    }

    /// Warnings raised so far.
    #[must_use]
    pub fn warnings(&self) -> &[SimWarning] {
        &self.warnings
    }

    /// Advance one step and return the newly recorded sample, or `None` if
    /// the run is already finished.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Graph`] if an influence range cannot be resolved.
    pub fn step(&mut self) -> Result<Option<PopulationFractions>, SimError> {
        if self.is_finished() {
            return Ok(None);
        }
        let t = self.step + 1;
        if t == self.config.intervention_step {
            self.seed_debunkers(t);
        }

        self.next_states.copy_from_slice(&self.states);
        self.next_kinds.copy_from_slice(&self.kinds);

        let snapshot = Snapshot {
            graph: &self.graph,
            states: &self.states,
            kinds: &self.kinds,
        };
        let rates = self.config.rates();

        if t < self.config.intervention_step {
            for node in 0..self.states.len() {
                if let Some(transition) = snapshot.contagion(node, &rates, &mut self.rng) {
                    transition.apply(node, &mut self.next_states, &mut self.next_kinds);
                }
            }
        } else {
            let official = snapshot.reach(DebunkerKind::Official, self.config.official_layers)?;
            let opinion =
                snapshot.reach(DebunkerKind::OpinionLeader, self.config.opinion_layers)?;
            debug!(
                step = t,
                official_reach = official.count_ones(..),
                opinion_reach = opinion.count_ones(..),
                "influence ranges resolved"
            );
            for node in 0..self.states.len() {
                let exposure = if official.contains(node) {
                    Exposure::Official
                } else if opinion.contains(node) {
                    Exposure::OpinionLeader
                } else {
                    Exposure::None
                };
                if let Some(transition) =
                    snapshot.intervention(node, exposure, &rates, &mut self.rng)
                {
                    transition.apply(node, &mut self.next_states, &mut self.next_kinds);
                }
            }
        }

        mem::swap(&mut self.states, &mut self.next_states);
        mem::swap(&mut self.kinds, &mut self.next_kinds);
        self.step = t;

        let fractions = self.series.record(&self.states);
        if t % SUMMARY_INTERVAL == 0 || t == self.config.steps {
            info!(
                step = t,
                steps = self.config.steps,
                susceptible = fractions.susceptible,
                spreader = fractions.spreader,
                debunker = fractions.debunker,
                recovered = fractions.recovered,
                "step summary"
            );
        }
        Ok(Some(fractions))
    }

    /// Run every remaining step and collect the output.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Simulation::step`].
    pub fn run(mut self) -> Result<RunOutput, SimError> {
        let started = Instant::now();
        while self.step()?.is_some() {}
        info!(
            seed = self.config.seed,
            steps = self.step,
            elapsed_ms = started.elapsed().as_millis(),
            "simulation complete"
        );
        Ok(self.into_output())
    }

    /// Consume the simulation and collect its current output.
    #[must_use]
    pub fn into_output(self) -> RunOutput {
        RunOutput {
            network: GraphStats::from_graph(&self.graph),
            config: self.config,
            series: self.series,
            final_states: self.states,
            final_kinds: self.kinds,
            intervention: self.intervention,
            warnings: self.warnings,
        }
    }

    fn seed_debunkers(&mut self, step: usize) {
        let mut eligible: Vec<NodeId> = (0..self.states.len())
            .filter(|&node| self.states[node] == NodeState::Susceptible)
            .collect();
        eligible.sort_by_key(|&node| (Reverse(self.graph.degree(node)), node));

        let officials_requested = self.config.official_quota();
        let opinion_leaders_requested = self.config.opinion_quota();
        let officials: Vec<NodeId> = eligible.iter().copied().take(officials_requested).collect();
        let opinion_leaders: Vec<NodeId> = eligible
            .iter()
            .copied()
            .skip(officials.len())
            .take(opinion_leaders_requested)
            .collect();

        for &node in &officials {
            self.states[node] = NodeState::Debunker;
            self.kinds[node] = DebunkerKind::Official;
        }
        for &node in &opinion_leaders {
            self.states[node] = NodeState::Debunker;
            self.kinds[node] = DebunkerKind::OpinionLeader;
        }

        let report = InterventionReport {
            step,
            eligible: eligible.len(),
            officials_requested,
            opinion_leaders_requested,
            officials,
            opinion_leaders,
        };
        info!(
            step,
            officials = report.officials.len(),
            opinion_leaders = report.opinion_leaders.len(),
            eligible = report.eligible,
            "debunkers seeded"
        );
        if report.is_short() {
            let warning = SimWarning::InsufficientEligibleNodes {
                step,
                requested: report.requested(),
                seeded: report.seeded(),
                eligible: report.eligible,
            };
            warn!(%warning, "intervention under-seeded");
            self.warnings.push(warning);
        }
        self.intervention = Some(report);
    }

    #[cfg(test)]
    pub(crate) fn set_node(&mut self, node: NodeId, state: NodeState, kind: DebunkerKind) {
        self.states[node] = state;
        self.kinds[node] = kind;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Spread,
    Convert,
    Recover,
}

impl Transition {
    fn apply(self, node: NodeId, states: &mut [NodeState], kinds: &mut [DebunkerKind]) {
        match self {
            Self::Spread => states[node] = NodeState::Spreader,
            Self::Convert => {
                states[node] = NodeState::Debunker;
                kinds[node] = DebunkerKind::Converted;
            }
            Self::Recover => states[node] = NodeState::Recovered,
        }
    }
}

/// Read-only view of the committed state for one step.
struct Snapshot<'a> {
    graph: &'a Graph,
    states: &'a [NodeState],
    kinds: &'a [DebunkerKind],
}

impl Snapshot<'_> {
    /// First neighbor, in ascending id order, whose state is in `wanted`.
    /// That neighbor alone drives the node's draw this step.
    fn first_neighbor_in(&self, node: NodeId, wanted: &[NodeState]) -> Option<NodeId> {
        self.graph
            .neighbors(node)
            .iter()
            .copied()
            .find(|&neighbor| wanted.contains(&self.states[neighbor]))
    }

    /// Union of the influence ranges of active debunkers of `kind`.
    fn reach(&self, kind: DebunkerKind, depth: usize) -> Result<FixedBitSet, GraphError> {
        let sources = (0..self.states.len()).filter(|&node| {
            self.states[node] == NodeState::Debunker && self.kinds[node] == kind
        });
        influence_union(self.graph, sources, depth)
    }

    /// Pre-intervention rules.
    fn contagion<R: Rng + ?Sized>(
        &self,
        node: NodeId,
        rates: &TransitionRates,
        rng: &mut R,
    ) -> Option<Transition> {
        match self.states[node] {
            NodeState::Susceptible => {
                self.first_neighbor_in(node, &[NodeState::Spreader])?;
                let r = unit(rng);
                if r <= rates.alpha_r {
                    Some(Transition::Recover)
                } else if r <= rates.alpha_r + rates.alpha_i {
                    Some(Transition::Spread)
                } else {
                    None
                }
            }
            NodeState::Spreader => {
                self.first_neighbor_in(node, &[NodeState::Spreader, NodeState::Recovered])?;
                hit(rng, rates.delta).then_some(Transition::Recover)
            }
            NodeState::Debunker | NodeState::Recovered => None,
        }
    }

    /// Rules from the intervention step on.
    fn intervention<R: Rng + ?Sized>(
        &self,
        node: NodeId,
        exposure: Exposure,
        rates: &TransitionRates,
        rng: &mut R,
    ) -> Option<Transition> {
        let boost = exposure.boost();
        match self.states[node] {
            NodeState::Susceptible => {
                self.first_neighbor_in(node, &[NodeState::Spreader, NodeState::Debunker])?;
                let alpha_r = rates.alpha_r * boost.primary;
                let alpha_d = rates.alpha_d * boost.secondary;
                let r = unit(rng);
                if r <= alpha_r {
                    Some(Transition::Recover)
                } else if r <= alpha_r + rates.alpha_i {
                    Some(Transition::Spread)
                } else if r <= alpha_r + rates.alpha_i + alpha_d {
                    Some(Transition::Convert)
                } else {
                    None
                }
            }
            NodeState::Spreader => {
                if self.first_neighbor_in(node, &[NodeState::Debunker]).is_some()
                    && hit(rng, rates.beta_d * boost.primary)
                {
                    return Some(Transition::Convert);
                }
                self.first_neighbor_in(
                    node,
                    &[NodeState::Spreader, NodeState::Debunker, NodeState::Recovered],
                )?;
                hit(rng, rates.delta * boost.secondary).then_some(Transition::Recover)
            }
            NodeState::Debunker => {
                let kind = self.kinds[node];
                if kind == DebunkerKind::None {
                    return None;
                }
                self.first_neighbor_in(
                    node,
                    &[NodeState::Spreader, NodeState::Debunker, NodeState::Recovered],
                )?;
                hit(rng, kind.recovery_probability(rates.delta)).then_some(Transition::Recover)
            }
            NodeState::Recovered => None,
        }
    }
}
