//! The generational loop: evaluate, select, reproduce, recombine, replace.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::config::{EvolutionConfig, ReplacementPolicy};
use super::error::EvolutionError;
use super::fitness::Fitness;
use super::selection::tournament_select;
use crate::agent::Agent;
use crate::game::Game;
use crate::neural::NeuralNet;

/// Best agent seen so far. Never mutated once stored.
#[derive(Debug, Clone)]
pub struct Champion {
    pub agent: Agent,
    pub score: f64,
    /// 1-based generation the champion was evaluated in
    pub generation: usize,
}

/// Replace `slot` when `score` matches or beats the held champion.
///
/// Equal scores take over, so the most recent of equally good agents is kept.
/// Returns whether the champion changed.
pub fn promote_champion(
    slot: &mut Option<Champion>,
    agent: &Agent,
    score: f64,
    generation: usize,
) -> bool {
    if slot.as_ref().is_some_and(|champion| score < champion.score) {
        return false;
    }
    *slot = Some(Champion {
        agent: agent.clone(),
        score,
        generation,
    });
    true
}

/// Summary of one completed generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub generation: usize,
    pub evaluated: usize,
    pub best_score: f64,
    pub mean_score: f64,
    pub best_length: usize,
    pub champion_score: f64,
    pub new_champion: bool,
    /// Population size after replacement
    pub population_len: usize,
}

/// Tick every agent in lockstep until all of them are dead.
///
/// With `parallel`, each agent is played out on the rayon pool instead. Agents
/// never interact, so both orders produce the same final games.
pub fn evaluate_headless(agents: &mut [Agent], parallel: bool) {
    if parallel {
        agents.par_iter_mut().for_each(|agent| {
            agent.play_out();
        });
        return;
    }

    while agents.iter().any(Agent::is_alive) {
        for agent in agents.iter_mut().filter(|agent| agent.is_alive()) {
            agent.update();
        }
    }
}

/// `copies` fresh, mutated and capped copies of every parent
pub fn reproduce<R: Rng + ?Sized>(
    parents: &[&Agent],
    copies: usize,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<Vec<Agent>, EvolutionError> {
    let mut children = Vec::with_capacity(parents.len() * copies);
    for parent in parents {
        for _ in 0..copies {
            children.push(parent.mutated_copy(
                config.mutation_mean,
                config.mutation_std,
                config.weight_cap,
                rng,
            )?);
        }
    }
    Ok(children)
}

/// Shuffle the candidates into random pairs and replace each pair by its
/// uniform-crossover children. An unpaired leftover passes through unchanged.
pub fn recombine<R: Rng + ?Sized>(
    mut candidates: Vec<Agent>,
    probability: f64,
    rng: &mut R,
) -> Result<Vec<Agent>, EvolutionError> {
    candidates.shuffle(rng);

    let mut next = Vec::with_capacity(candidates.len());
    let mut pending = candidates.into_iter();
    while let Some(first) = pending.next() {
        match pending.next() {
            Some(second) => {
                let (a, b) = first.cross_over_uniform(&second, probability, rng)?;
                next.push(a);
                next.push(b);
            }
            None => next.push(first),
        }
    }
    Ok(next)
}

/// Runs generations over an owned population with one seeded RNG
#[derive(Debug)]
pub struct Evolution {
    config: EvolutionConfig,
    rng: SmallRng,
    population: Vec<Agent>,
    champion: Option<Champion>,
    generation: usize,
}

impl Evolution {
    /// Random initial population sized by the config
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate().map_err(EvolutionError::Config)?;
        let mut rng = Self::make_rng(config.seed);

        let population = (0..config.population_size)
            .map(|_| {
                Agent::random(
                    &config.game,
                    &config.hidden_layers,
                    config.init_mean,
                    config.init_std,
                    &mut rng,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(config, rng, population))
    }

    /// Population built from one network: an exact copy plus mutated copies
    pub fn from_network(config: EvolutionConfig, net: NeuralNet) -> Result<Self, EvolutionError> {
        config.validate().map_err(EvolutionError::Config)?;
        let mut rng = Self::make_rng(config.seed);

        let game = Game::seeded(config.game.clone(), rng.r#gen());
        let origin = Agent::new(game, net)?;
        let mut population = Vec::with_capacity(config.population_size);
        population.push(origin.fresh_copy(&mut rng));
        for _ in 1..config.population_size {
            population.push(origin.mutated_copy(
                config.mutation_mean,
                config.mutation_std,
                config.weight_cap,
                &mut rng,
            )?);
        }

        Ok(Self::from_parts(config, rng, population))
    }

    fn from_parts(config: EvolutionConfig, rng: SmallRng, population: Vec<Agent>) -> Self {
        Self {
            config,
            rng,
            population,
            champion: None,
            generation: 0,
        }
    }

    fn make_rng(seed: Option<u64>) -> SmallRng {
        match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Every agent kept so far; with [`ReplacementPolicy::Append`] this is the full history
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Completed generations
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.generation >= self.config.generations
    }

    /// Run one evaluate → select → reproduce → recombine → replace cycle
    pub fn run_generation(&mut self) -> Result<GenerationReport, EvolutionError> {
        let start = self
            .population
            .len()
            .saturating_sub(self.config.population_size);
        let current = &mut self.population[start..];
        if current.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        evaluate_headless(current, self.config.parallel);

        let fitness = &self.config.fitness;
        let scores: Vec<f64> = current.iter().map(|agent| agent.score(fitness)).collect();
        let winners = tournament_select(&scores, self.config.tournament_size, &mut self.rng)?;

        self.generation += 1;
        let current = &self.population[start..];
        let mut new_champion = false;
        for &index in &winners {
            new_champion |= promote_champion(
                &mut self.champion,
                &current[index],
                scores[index],
                self.generation,
            );
        }

        let parents: Vec<&Agent> = winners.iter().map(|&index| &current[index]).collect();
        let candidates = reproduce(
            &parents,
            self.config.tournament_size,
            &self.config,
            &mut self.rng,
        )?;
        let candidates = recombine(candidates, self.config.crossover_probability, &mut self.rng)?;

        let best = scores
            .iter()
            .enumerate()
            .fold(0, |best, (index, &score)| if score > scores[best] { index } else { best });
        let best_length = current[best].game().snake_len();
        let evaluated = scores.len();

        match self.config.replacement {
            ReplacementPolicy::Replace => self.population = candidates,
            ReplacementPolicy::Append => self.population.extend(candidates),
        }

        let report = GenerationReport {
            generation: self.generation,
            evaluated,
            best_score: scores[best],
            mean_score: scores.iter().sum::<f64>() / evaluated as f64,
            best_length,
            champion_score: self.champion.as_ref().map_or(0.0, |champion| champion.score),
            new_champion,
            population_len: self.population.len(),
        };

        if new_champion {
            debug!(
                generation = report.generation,
                score = report.champion_score,
                "new champion"
            );
        }
        info!(
            generation = report.generation,
            best = report.best_score,
            mean = report.mean_score,
            champion = report.champion_score,
            population = report.population_len,
            "generation complete"
        );

        Ok(report)
    }

    /// Run the remaining generations, calling `on_generation` after each one
    pub fn run<F>(&mut self, mut on_generation: F) -> Result<(), EvolutionError>
    where
        F: FnMut(&Self, &GenerationReport),
    {
        while !self.is_finished() {
            let report = self.run_generation()?;
            on_generation(self, &report);
        }
        Ok(())
    }

    /// Score `agent` under this run's fitness formula
    pub fn score(&self, agent: &Agent) -> f64 {
        self.config.fitness.score(agent.game())
    }
}
