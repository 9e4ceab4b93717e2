//! Point distribution, the second half of the `game_point` phase (C6).

use crate::player::Player;

/// Base point awarded per bad dwarf for a bad-team win, keyed by `winner_list`
/// size.
fn bad_team_base_point(num_winners: usize) -> u32 {
    match num_winners {
        1 => 4,
        2 => 3,
        3 => 3,
        4 => 2,
        _ => 0,
    }
}

/// Awards points for a good-team win: the top `n` gold cards, sorted
/// descending, traversing `winner_list` counter-clockwise starting at the
/// winning mover's seat. `winner` is the player index who completed the
/// connection (may not itself be in `winner_list`, if a bad dwarf triggered
/// it); `winner_list` holds the good dwarves' player indices in seating order.
pub fn distribute_good_team_win(
    players: &mut [Player],
    gold_stack: &mut Vec<u8>,
    winner: usize,
    winner_list: &[usize],
    num_player: usize,
) {
    let n = winner_list.len();
    if n == 0 {
        return;
    }
    let take = n.min(gold_stack.len());
    let mut gold: Vec<u8> = gold_stack.drain(0..take).collect();
    gold.sort_unstable_by(|a, b| b.cmp(a));

    // Reversing the (clockwise) seating order of winner_list yields a
    // counter-clockwise traversal.
    let mut seats: Vec<usize> = winner_list.to_vec();
    seats.reverse();

    let mut idx = match seats.iter().position(|&seat| seat == winner) {
        Some(i) => i,
        None => {
            // A bad dwarf connected the gold. Roll one seat clockwise from
            // them and award starting from whichever good dwarf sits there.
            let clockwise = (winner + 1) % num_player;
            seats.iter().position(|&seat| seat == clockwise).unwrap_or(0)
        }
    };

    for value in gold {
        players[seats[idx % n]].point += value as u32;
        idx += 1;
    }
}

/// Awards points for a bad-team win (the deck and all hands emptied without
/// the gold being reached). Each bad dwarf gets a fixed base point, and the
/// gold stack is then greedily picked over per dwarf: on each pass, the first
/// remaining card that fits inside what's left of that dwarf's budget is
/// removed (not scored further — the budget already covers it), rescanning
/// from the start of the stack after every removal so a later, smaller card
/// is never skipped by a stale index (see SPEC_FULL.md Open Question 2).
pub fn distribute_bad_team_win(
    players: &mut [Player],
    gold_stack: &mut Vec<u8>,
    winner_list: &[usize],
) {
    let base = bad_team_base_point(winner_list.len());
    for &seat in winner_list {
        players[seat].point += base;
        let mut remaining = base as i32;
        while remaining > 0 {
            let fits = gold_stack.iter().position(|&g| remaining - i32::from(g) >= 0);
            match fits {
                Some(pos) => remaining -= i32::from(gold_stack.remove(pos)),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_players(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(i.to_string())).collect()
    }

    #[test]
    fn good_team_win_awards_descending_gold_counter_clockwise_from_winner() {
        let mut players = make_players(4);
        let mut gold_stack = vec![1, 2, 3, 1];
        // seats 0 and 2 are good, winner is seat 0.
        distribute_good_team_win(&mut players, &mut gold_stack, 0, &[0, 2], 4);
        // top 2 cards are {3, 2} (sorted desc); counter-clockwise from seat 0
        // in [0, 2] reversed (= [2, 0]) starting at 0 -> seats [0, 2].
        assert_eq!(players[0].point, 3);
        assert_eq!(players[2].point, 2);
        assert_eq!(gold_stack, vec![1, 1]);
    }

    #[test]
    fn good_team_win_rolls_to_next_seat_when_a_bad_dwarf_connects() {
        let mut players = make_players(4);
        let mut gold_stack = vec![3, 2];
        // seat 1 (bad) connected the gold; good seats are 0 and 2.
        distribute_good_team_win(&mut players, &mut gold_stack, 1, &[0, 2], 4);
        // clockwise from seat 1 is seat 2; award starts there.
        assert_eq!(players[2].point, 3);
        assert_eq!(players[0].point, 2);
    }

    #[test]
    fn bad_team_win_awards_base_point_and_consumes_fitting_gold() {
        let mut players = make_players(3);
        let mut gold_stack = vec![3, 1, 1, 1];
        // single bad dwarf -> base point 4.
        distribute_bad_team_win(&mut players, &mut gold_stack, &[1]);
        assert_eq!(players[1].point, 4);
        // budget 4: takes 3 then 1, leaving the remaining two 1s.
        assert_eq!(gold_stack, vec![1, 1]);
    }

    #[test]
    fn bad_team_win_with_no_winners_awards_nothing() {
        let mut players = make_players(3);
        let mut gold_stack = vec![1, 2, 3];
        distribute_bad_team_win(&mut players, &mut gold_stack, &[]);
        assert_eq!(players.iter().map(|p| p.point).sum::<u32>(), 0);
        assert_eq!(gold_stack, vec![1, 2, 3]);
    }
}
