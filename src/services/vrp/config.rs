//! VRP Solver configuration

/// Termination settings handed to the vrp-core solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Maximum solving time in seconds
    pub max_time_seconds: u32,
    /// Maximum generations for metaheuristic
    pub max_generations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_time_seconds: 30,
            max_generations: 3000,
        }
    }
}

impl SolverConfig {
    pub fn new(max_time_seconds: u32, max_generations: usize) -> Self {
        Self {
            max_time_seconds,
            max_generations,
        }
    }

    /// Fast configuration for interactive use
    /// - Quick response time (~5 seconds per solve)
    pub fn fast() -> Self {
        Self::new(5, 500)
    }

    /// Quality configuration for overnight planning runs
    /// - Longer solve time (~60 seconds per solve)
    /// - Better optimization results
    pub fn quality() -> Self {
        Self::new(60, 10000)
    }

    /// Instant configuration, mostly for smoke runs over large networks
    pub fn instant() -> Self {
        Self::new(2, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.max_time_seconds, 30);
        assert_eq!(config.max_generations, 3000);
    }

    #[test]
    fn test_fast_config() {
        let config = SolverConfig::fast();
        assert_eq!(config.max_time_seconds, 5);
        assert!(config.max_generations < SolverConfig::default().max_generations);
    }

    #[test]
    fn test_quality_config() {
        let config = SolverConfig::quality();
        assert_eq!(config.max_time_seconds, 60);
        assert!(config.max_generations > SolverConfig::default().max_generations);
    }

    #[test]
    fn test_instant_config() {
        let config = SolverConfig::instant();
        assert!(config.max_time_seconds < SolverConfig::fast().max_time_seconds);
    }
}
