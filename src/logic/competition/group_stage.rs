// Group stage: teams are drawn into groups, each group plays a round robin.
use rand::{Rng, seq::SliceRandom};
use tracing::warn;

use crate::logic::{competition::round_robin, game::Game, types::TeamId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDraw {
    // Group letter of every drawn team.
    pub labels: Vec<(TeamId, String)>,
    pub games: Vec<Game>,
}

// One group per letter.
pub const MAX_GROUPS: usize = 26;

// Get the label of the group at the given index: A, B, C... up to Z.
pub fn group_label(index: usize) -> String {
    let letter = (b'A' + index.min(MAX_GROUPS - 1) as u8) as char;
    letter.to_string()
}

// How many groups the teams are dealt into.
pub fn group_count(no_of_teams: usize, group_size: usize) -> usize {
    no_of_teams.div_ceil(group_size.max(1))
}

// Shuffle the teams, deal them into groups of `group_size` in order
// and generate each group's round robin. The last group may be smaller.
pub fn generate<R: Rng + ?Sized>(teams: &[TeamId], group_size: usize, rounds: u32, rng: &mut R) -> GroupDraw {
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);

    let mut draw = GroupDraw::default();
    for (i, group) in shuffled.chunks(group_size.max(1)).enumerate() {
        let label = group_label(i);
        if group.len() < 2 {
            warn!(group = %label, "group has a single team and no matches");
        }

        draw.labels.extend(group.iter().map(|id| (*id, label.clone())));
        draw.games.extend(round_robin::generate(group, rounds, &format!("Grupo {label} - ")));
    }

    return draw;
}
