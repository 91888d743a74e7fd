//! Structured text model reports.
//!
//! Reports are plain text rather than JSON: they are meant to be read when
//! a scenario fails, next to the oracle verdicts.

use std::fmt;

use array_builder::{AntennaModel, SolveConfig};
use mimo_types::ShapeKind;
use model_kernel::{Fill, ModelOp};

use crate::oracle::{run_all_oracles, OracleVerdict};

/// A complete model report with all sections.
pub struct ModelReport {
    pub shape_entries: Vec<ShapeEntry>,
    pub consumed: Vec<(String, String)>,
    pub port_entries: Vec<PortEntry>,
    pub solve: Option<SolveConfig>,
    pub oracle_results: Vec<OracleVerdict>,
}

/// A live shape's report entry.
pub struct ShapeEntry {
    pub name: String,
    pub kind: String,
    pub fill: String,
    pub cells: usize,
    pub measure: f64,
    pub boundary: Option<String>,
}

pub struct PortEntry {
    pub name: String,
    pub sheet: String,
    pub line: ([f64; 3], [f64; 3]),
}

impl ModelReport {
    /// Collect every section from a built model, running all oracles.
    pub fn from_model(model: &AntennaModel, solve: Option<&SolveConfig>) -> Self {
        let state = &model.state;
        let tol = state.tolerance().coincidence;

        let shape_entries = state
            .live_shapes()
            .map(|(_, s)| ShapeEntry {
                name: s.name.clone(),
                kind: match s.kind {
                    ShapeKind::Box => "box".to_string(),
                    ShapeKind::Rectangle { plane } => format!("{plane} rectangle"),
                },
                fill: match s.fill {
                    Fill::Dielectric(id) => state
                        .material(id)
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| "?".to_string()),
                    Fill::Vacuum => "vacuum".to_string(),
                    Fill::Sheet => "sheet".to_string(),
                },
                cells: s.region.cells().len(),
                measure: s.region.measure(tol),
                boundary: s.boundary.map(|b| b.to_string()),
            })
            .collect();

        let consumed = state
            .history()
            .iter()
            .filter_map(|op| match op {
                ModelOp::Subtract {
                    primary,
                    secondaries,
                } => Some(secondaries.iter().map(|s| (s.clone(), primary.clone())).collect::<Vec<_>>()),
                ModelOp::Unite { names } => names.split_first().map(|(first, rest)| {
                    rest.iter()
                        .map(|s| (s.clone(), first.clone()))
                        .collect::<Vec<_>>()
                }),
                _ => None,
            })
            .flatten()
            .collect();

        let port_entries = state
            .ports()
            .filter_map(|b| {
                b.port.as_ref().map(|p| PortEntry {
                    name: p.name.clone(),
                    sheet: b.shape_name.clone(),
                    line: (
                        [p.line.start.x, p.line.start.y, p.line.start.z],
                        [p.line.end.x, p.line.end.y, p.line.end.z],
                    ),
                })
            })
            .collect();

        Self {
            shape_entries,
            consumed,
            port_entries,
            solve: solve.cloned(),
            oracle_results: run_all_oracles(model),
        }
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== MIMO Array Model Report ===\n\n");

        out.push_str(&format!("Shapes ({} live):\n", self.shape_entries.len()));
        for s in &self.shape_entries {
            let bound = s
                .boundary
                .as_deref()
                .map(|b| format!(" [{b}]"))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {} ({}, {}) cells={} measure={:.4}{}\n",
                s.name, s.kind, s.fill, s.cells, s.measure, bound
            ));
        }

        if !self.consumed.is_empty() {
            out.push_str(&format!("\nConsumed ({}):\n", self.consumed.len()));
            for (name, by) in &self.consumed {
                out.push_str(&format!("  {name} -> {by}\n"));
            }
        }

        out.push_str(&format!("\nPorts ({}):\n", self.port_entries.len()));
        for p in &self.port_entries {
            let (a, b) = p.line;
            out.push_str(&format!(
                "  {} on {}: ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})\n",
                p.name, p.sheet, a[0], a[1], a[2], b[0], b[1], b[2]
            ));
        }

        if let Some(solve) = &self.solve {
            out.push_str(&format!(
                "\nSolve: {} at {:.3} GHz, {} passes, dS {}\n",
                solve.setup_name,
                solve.setup.frequency_hz / 1e9,
                solve.setup.maximum_passes,
                solve.setup.max_delta_s
            ));
            out.push_str(&format!(
                "  sweep {}: {}-{} {} x{}\n",
                solve.sweep.name,
                solve.sweep.start,
                solve.sweep.stop,
                solve.sweep.unit,
                solve.sweep.count
            ));
            out.push_str(&format!(
                "  sphere {}: theta {}°, phi {}°\n",
                solve.sphere.name, solve.sphere.theta_step_deg, solve.sphere.phi_step_deg
            ));
            for (port, ex) in &solve.excitations {
                out.push_str(&format!(
                    "  {port}: {} W @ {}°\n",
                    ex.magnitude_w, ex.phase_deg
                ));
            }
        }

        let passed = self.oracle_results.iter().filter(|v| v.passed).count();
        out.push_str(&format!(
            "\nOracles ({passed}/{} passed):\n",
            self.oracle_results.len()
        ));
        for v in &self.oracle_results {
            let status = if v.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("  [{status}] {}: {}\n", v.oracle_name, v.detail));
        }
        out
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
