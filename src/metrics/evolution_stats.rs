//! Rolling statistics over completed generations

use std::collections::VecDeque;

use crate::evolution::GenerationReport;

/// Generation tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use evo_snake::metrics::EvolutionStats;
///
/// let stats = EvolutionStats::new(10);
/// assert_eq!(stats.total_generations(), 0);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionStats {
    /// Best score per generation (rolling window)
    best_scores: VecDeque<f64>,

    /// Mean score per generation (rolling window)
    mean_scores: VecDeque<f64>,

    /// Longest snake per generation (rolling window)
    best_lengths: VecDeque<usize>,

    total_generations: usize,
    total_agents: usize,
    champion_score: f64,
    champion_generation: usize,
    window_size: usize,
}

impl EvolutionStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            best_scores: VecDeque::with_capacity(window_size),
            mean_scores: VecDeque::with_capacity(window_size),
            best_lengths: VecDeque::with_capacity(window_size),
            total_generations: 0,
            total_agents: 0,
            champion_score: 0.0,
            champion_generation: 0,
            window_size,
        }
    }

    pub fn record(&mut self, report: &GenerationReport) {
        Self::push_deque(&mut self.best_scores, report.best_score, self.window_size);
        Self::push_deque(&mut self.mean_scores, report.mean_score, self.window_size);
        Self::push_deque(&mut self.best_lengths, report.best_length, self.window_size);
        self.total_generations += 1;
        self.total_agents += report.evaluated;
        if report.new_champion {
            self.champion_generation = report.generation;
        }
        self.champion_score = report.champion_score;
    }

    /// Mean of the per-generation best scores in the window
    pub fn mean_best_score(&self) -> f64 {
        Self::mean(self.best_scores.iter().copied())
    }

    pub fn mean_score(&self) -> f64 {
        Self::mean(self.mean_scores.iter().copied())
    }

    pub fn mean_best_length(&self) -> f64 {
        Self::mean(self.best_lengths.iter().map(|&len| len as f64))
    }

    pub fn total_generations(&self) -> usize {
        self.total_generations
    }

    /// Agents evaluated across all recorded generations
    pub fn total_agents(&self) -> usize {
        self.total_agents
    }

    pub fn champion_score(&self) -> f64 {
        self.champion_score
    }

    /// Generation the current champion was found in; 0 before any champion
    pub fn champion_generation(&self) -> usize {
        self.champion_generation
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Generations: {} | Agents: {} | Best: {:.1} | Mean: {:.1} | Len: {:.1} | Champion: {:.1} (gen {})",
            self.total_generations,
            self.total_agents,
            self.mean_best_score(),
            self.mean_score(),
            self.mean_best_length(),
            self.champion_score,
            self.champion_generation,
        )
    }

    fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
        let count = values.len();
        if count == 0 {
            0.0
        } else {
            values.sum::<f64>() / count as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
