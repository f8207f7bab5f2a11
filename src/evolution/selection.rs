use rand::Rng;

use super::error::EvolutionError;

/// Tournament selection without replacement.
///
/// Brackets of `bracket` distinct candidates are drawn uniformly from the
/// remaining pool until it is empty. The strictly highest score in each
/// bracket wins; ties go to the first candidate drawn. Returns the indices
/// of the winners in the order their brackets were drawn.
///
/// The pool size must be a multiple of `bracket`.
pub fn tournament_select<R: Rng + ?Sized>(
    scores: &[f64],
    bracket: usize,
    rng: &mut R,
) -> Result<Vec<usize>, EvolutionError> {
    if bracket == 0 {
        return Err(EvolutionError::EmptyBracket);
    }
    if scores.len() % bracket != 0 {
        return Err(EvolutionError::ExhaustedPool {
            bracket,
            remaining: scores.len() % bracket,
        });
    }

    let mut pool: Vec<usize> = (0..scores.len()).collect();
    let mut winners = Vec::with_capacity(scores.len() / bracket);

    while !pool.is_empty() {
        let mut best: Option<usize> = None;
        for _ in 0..bracket {
            let drawn = pool.swap_remove(rng.gen_range(0..pool.len()));
            match best {
                Some(current) if scores[drawn] <= scores[current] => {}
                _ => best = Some(drawn),
            }
        }
        if let Some(winner) = best {
            winners.push(winner);
        }
    }

    Ok(winners)
}
