pub mod evolution_stats;
pub mod game_metrics;

pub use evolution_stats::EvolutionStats;
pub use game_metrics::GameMetrics;
