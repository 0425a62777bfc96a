//! vrp-pragmatic solver integration.

use std::io::BufWriter;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};
use vrp_cli::extensions::solve::config::{Config, TerminationConfig, create_builder_from_config};
use vrp_core::solver::Solver;
use vrp_pragmatic::format::problem::{Matrix, PragmaticProblem, Problem};
use vrp_pragmatic::format::solution::{PragmaticOutputType, Solution as PragmaticSolution, write_pragmatic};

use super::adapter::{build_job_table, build_pragmatic_matrix, build_pragmatic_problem, DEFAULT_PROFILE};
use super::solution::map_solution;
use super::{Optimizer, RoutingProblem, Solution, SolverConfig};

/// Optimizer backed by vrp-core, fed through the pragmatic format
pub struct PragmaticOptimizer {
    config: SolverConfig,
    /// Day that planning hour 0 maps to
    date: NaiveDate,
}

impl PragmaticOptimizer {
    pub fn new(config: SolverConfig, date: NaiveDate) -> Self {
        Self { config, date }
    }
}

impl Optimizer for PragmaticOptimizer {
    fn solve(&self, problem: &RoutingProblem) -> Result<Vec<Solution>> {
        if problem.is_empty() {
            debug!("No shipments to optimize, returning empty solution");
            return Ok(vec![Solution::empty()]);
        }

        let started_at = Instant::now();
        let solution = solve_pragmatic(problem, self.date, &self.config)?;

        info!(
            "vrp-pragmatic solved {} shipments in {} ms: {} vehicles, {} unassigned, cost {:.1}",
            problem.shipments.len(),
            started_at.elapsed().as_millis(),
            solution.vehicle_count(),
            solution.unassigned.len(),
            solution.cost,
        );
        Ok(vec![solution])
    }

    fn name(&self) -> &str {
        "vrp-pragmatic"
    }
}

fn solve_pragmatic(problem: &RoutingProblem, date: NaiveDate, config: &SolverConfig) -> Result<Solution> {
    let jobs = build_job_table(problem)?;
    let problem_json = build_pragmatic_problem(problem, date)?;
    let problem_format: Problem = serde_json::from_value(problem_json)
        .context("Failed to deserialize pragmatic problem")?;

    let matrix: Matrix = build_pragmatic_matrix(&problem.matrices, DEFAULT_PROFILE);
    let core_problem = (problem_format, vec![matrix])
        .read_pragmatic()
        .context("Failed to build core problem from pragmatic format")?;

    let core_problem = Arc::new(core_problem);
    let solver_config = build_solver_config(core_problem.clone(), config)?;

    let solution = Solver::new(core_problem.clone(), solver_config)
        .solve()
        .context("Failed to solve VRP with vrp-pragmatic")?;

    let solution = write_pragmatic_solution(core_problem.as_ref(), &solution)?;
    Ok(map_solution(&solution, problem, &jobs, date)?)
}

fn build_solver_config(
    problem: Arc<vrp_core::models::Problem>,
    config: &SolverConfig,
) -> Result<vrp_core::rosomaxa::evolution::EvolutionConfig<
    vrp_core::solver::RefinementContext,
    vrp_core::models::GoalContext,
    vrp_core::construction::heuristics::InsertionContext,
>> {
    let config = Config {
        termination: Some(TerminationConfig {
            max_time: Some(config.max_time_seconds as usize),
            max_generations: Some(config.max_generations),
            variation: None,
        }),
        evolution: None,
        hyper: None,
        environment: None,
        telemetry: None,
        output: None,
    };

    let builder = create_builder_from_config(problem, Vec::new(), &config)
        .context("Failed to create solver builder")?;

    builder.build().context("Failed to build solver configuration")
}

fn write_pragmatic_solution(
    problem: &vrp_core::models::Problem,
    solution: &vrp_core::models::Solution,
) -> Result<PragmaticSolution> {
    let mut writer = BufWriter::new(Vec::new());
    write_pragmatic(problem, solution, PragmaticOutputType::default(), &mut writer)
        .context("Failed to serialize pragmatic solution")?;

    let bytes = writer.into_inner().context("Failed to flush solution writer")?;
    let json = String::from_utf8(bytes).context("Solution is not valid UTF-8")?;
    let parsed: PragmaticSolution = serde_json::from_str(&json)
        .context("Failed to parse pragmatic solution JSON")?;

    Ok(parsed)
}
