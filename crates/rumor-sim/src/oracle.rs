use crate::engine::RunOutput;
use crate::metrics::TimeSeries;
use crate::node::{DebunkerKind, NodeId, NodeState};

// ── Core result types ─────────────────────────────────────────────────────────

/// Oracle result for an invariant check.
///
/// Returned by each checker on [`RunOracle`] and by [`check_run`].
#[derive(Debug, Clone, PartialEq)]
pub struct OracleResult {
    /// `true` iff no violations were found.
    pub passed: bool,
    /// Every invariant that was violated.
    pub violations: Vec<InvariantViolation>,
}

impl OracleResult {
    #[must_use]
    fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    #[must_use]
    fn from_violations(violations: Vec<InvariantViolation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }

    /// Merge another result into this one (failures accumulate).
    #[must_use]
    fn merge(mut self, other: Self) -> Self {
        if !other.passed {
            self.passed = false;
            self.violations.extend(other.violations);
        }
        self
    }
}

// ── Invariant violation diagnostics ──────────────────────────────────────────

/// Diagnostic information for a single failed invariant check.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// A series does not hold exactly `steps + 1` samples.
    SeriesLength {
        /// `steps + 1`.
        expected: usize,
        /// Shortest of the four series.
        actual: usize,
    },

    /// The four fractions at one step do not add up to 1.
    FractionSum {
        /// Offending step.
        step: usize,
        /// `S + I + D + R` at that step.
        total: f64,
    },

    /// The recovered share shrank between two consecutive steps.
    RecoveredDecreased {
        /// Later of the two steps.
        step: usize,
        /// Share at `step - 1`.
        before: f64,
        /// Share at `step`.
        after: f64,
    },

    /// Debunkers exist before the intervention step.
    EarlyDebunkers {
        /// Offending step.
        step: usize,
        /// Debunker share at that step.
        fraction: f64,
    },

    /// The intervention step was reached but nothing was recorded for it.
    MissingIntervention {
        /// Configured intervention step.
        intervention_step: usize,
    },

    /// Seeded debunkers differ from `min(D0, eligible)`.
    SeedingMismatch {
        /// `min(D0, eligible)`.
        expected: usize,
        /// Debunkers actually seeded.
        seeded: usize,
    },

    /// A node's state and debunker kind disagree: a debunker without a
    /// kind, or a kind on a node that never became a debunker.
    KindMismatch {
        /// Offending node.
        node: NodeId,
        /// Final state.
        state: NodeState,
        /// Final kind.
        kind: DebunkerKind,
    },
}

// ── Oracle ────────────────────────────────────────────────────────────────────

/// Post-run invariant checks.
///
/// # Invariants checked
///
/// 1. **Length** (`check_series_length`): every series has `steps + 1`
///    samples.
/// 2. **Conservation** (`check_fraction_sums`): `S + I + D + R = 1`.
/// 3. **Absorption** (`check_recovered_monotone`): `R` never shrinks.
/// 4. **Timing** (`check_no_early_debunkers`): `D = 0` before `Td`.
/// 5. **Seeding** (`check_seeding`): `min(D0, eligible)` debunkers seeded.
/// 6. **Kinds** (`check_kinds`): final state and kind agree.
pub struct RunOracle;

impl RunOracle {
    /// Allowed deviation of a fraction sum from 1.
    pub const SUM_TOLERANCE: f64 = 1e-9;

    /// Check that all four series hold `steps + 1` samples. Reports the
    /// shortest series on mismatch.
    #[must_use]
    pub fn check_series_length(series: &TimeSeries, steps: usize) -> OracleResult {
        let lengths = [
            series.susceptible.len(),
            series.spreader.len(),
            series.debunker.len(),
            series.recovered.len(),
        ];
        let actual = lengths.iter().copied().min().unwrap_or(0);
        let expected = steps + 1;
        if lengths.iter().all(|&len| len == expected) {
            OracleResult::pass()
        } else {
            OracleResult::from_violations(vec![InvariantViolation::SeriesLength {
                expected,
                actual,
            }])
        }
    }

    /// Check `S + I + D + R = 1` at every recorded step.
    #[must_use]
    pub fn check_fraction_sums(series: &TimeSeries) -> OracleResult {
        let violations = (0..series.len())
            .filter_map(|step| {
                let total = series.at(step)?.total();
                ((total - 1.0).abs() > Self::SUM_TOLERANCE)
                    .then_some(InvariantViolation::FractionSum { step, total })
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    /// Check that the recovered share is non-decreasing.
    #[must_use]
    pub fn check_recovered_monotone(series: &TimeSeries) -> OracleResult {
        let violations = series
            .recovered
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1] + Self::SUM_TOLERANCE < pair[0])
            .map(|(i, pair)| InvariantViolation::RecoveredDecreased {
                step: i + 1,
                before: pair[0],
                after: pair[1],
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    /// Check that no debunkers are recorded before `intervention_step`.
    #[must_use]
    pub fn check_no_early_debunkers(series: &TimeSeries, intervention_step: usize) -> OracleResult {
        let violations = series
            .debunker
            .iter()
            .take(intervention_step)
            .enumerate()
            .filter(|(_, fraction)| **fraction > 0.0)
            .map(|(step, &fraction)| InvariantViolation::EarlyDebunkers { step, fraction })
            .collect();
        OracleResult::from_violations(violations)
    }

    /// Check that the intervention seeded `min(D0, eligible)` debunkers.
    #[must_use]
    pub fn check_seeding(output: &RunOutput) -> OracleResult {
        let config = &output.config;
        let Some(report) = &output.intervention else {
            return OracleResult::from_violations(vec![
                InvariantViolation::MissingIntervention {
                    intervention_step: config.intervention_step,
                },
            ]);
        };
        let expected = config.initial_debunkers.min(report.eligible);
        let seeded = report.seeded();
        if seeded == expected {
            OracleResult::pass()
        } else {
            OracleResult::from_violations(vec![InvariantViolation::SeedingMismatch {
                expected,
                seeded,
            }])
        }
    }

    /// Check that every debunker has a kind and every kind belongs to a
    /// debunker or a recovered former debunker.
    #[must_use]
    pub fn check_kinds(states: &[NodeState], kinds: &[DebunkerKind]) -> OracleResult {
        let violations = states
            .iter()
            .zip(kinds)
            .enumerate()
            .filter(|&(_, (&state, &kind))| match state {
                NodeState::Debunker => kind == DebunkerKind::None,
                NodeState::Susceptible | NodeState::Spreader => kind != DebunkerKind::None,
                NodeState::Recovered => false,
            })
            .map(|(node, (&state, &kind))| InvariantViolation::KindMismatch { node, state, kind })
            .collect();
        OracleResult::from_violations(violations)
    }
}

/// Run every check on a finished run.
#[must_use]
pub fn check_run(output: &RunOutput) -> OracleResult {
    let series = &output.series;
    RunOracle::check_series_length(series, output.config.steps)
        .merge(RunOracle::check_fraction_sums(series))
        .merge(RunOracle::check_recovered_monotone(series))
        .merge(RunOracle::check_no_early_debunkers(
            series,
            output.config.intervention_step,
        ))
        .merge(RunOracle::check_seeding(output))
        .merge(RunOracle::check_kinds(&output.final_states, &output.final_kinds))
}

/// Human-readable description of a violation.
#[must_use]
pub fn format_violation(v: &InvariantViolation) -> String {
    match v {
        InvariantViolation::SeriesLength { expected, actual } => {
            format!("SeriesLength: expected {expected} samples, found {actual}")
        }
        InvariantViolation::FractionSum { step, total } => {
            format!("FractionSum: step {step} fractions sum to {total:.12}")
        }
        InvariantViolation::RecoveredDecreased {
            step,
            before,
            after,
        } => {
            format!("RecoveredDecreased: R fell from {before:.6} to {after:.6} at step {step}")
        }
        InvariantViolation::EarlyDebunkers { step, fraction } => {
            format!("EarlyDebunkers: D = {fraction:.6} at step {step}, before intervention")
        }
        InvariantViolation::MissingIntervention { intervention_step } => {
            format!("MissingIntervention: no seeding recorded for step {intervention_step}")
        }
        InvariantViolation::SeedingMismatch { expected, seeded } => {
            format!("SeedingMismatch: seeded {seeded} debunkers, expected {expected}")
        }
        InvariantViolation::KindMismatch { node, state, kind } => {
            format!("KindMismatch: node {node} is {state:?} with kind {kind:?}")
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
