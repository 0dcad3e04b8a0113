//! Random team partitioner.
//!
//! Pure function: shuffle the roster uniformly, then slice it into
//! consecutive chunks. The remainder chunk is a team of its own — a lone
//! straggler still gets a shirt.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::Player;

/// One team. Member order within a team carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub members: Vec<Player>,
}

/// Partition `roster` into teams of `team_size`, uniformly at random.
///
/// Returns `ceil(len / team_size)` teams; all but the last are full, the
/// last holds the remainder. Empty roster gives no teams.
pub fn partition<R: Rng + ?Sized>(roster: &[Player], team_size: usize, rng: &mut R) -> Vec<Team> {
    assert!(team_size > 0, "team_size must be positive");
    if roster.is_empty() {
        return Vec::new();
    }
    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);
    shuffled
        .chunks(team_size)
        .map(|chunk| Team { members: chunk.to_vec() })
        .collect()
}
