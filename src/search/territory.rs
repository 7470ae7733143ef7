// Territory estimate from a multi-source flood fill
//
// Every live head starts a breadth-first frontier and all frontiers advance
// one ring per round. The first snake to reach a cell owns it (+1). When a
// second snake reaches a cell in the same round it was claimed, the cell is
// contested: the owner loses the point again (-1) and nobody can claim it.

use super::moves::get_neighbors;
use crate::rules::BoardState;
use crate::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    Owned { slot: usize, round: u32 },
    Contested,
}

/// Signed reachable-cell count per snake slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    counts: Vec<i32>,
}

impl Territory {
    pub fn score(&self, slot: usize) -> i32 {
        self.counts.get(slot).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[i32] {
        &self.counts
    }
}

pub fn flood_fill(board: &BoardState, wrapped: bool) -> Territory {
    let width = board.width;
    let index = |c: Coord| (c.y * width + c.x) as usize;

    let mut claims: Vec<Option<Claim>> = vec![None; (board.width * board.height) as usize];
    let mut counts = vec![0; board.snakes.len()];
    let mut frontier: Vec<(usize, Coord)> = Vec::new();

    for (slot, snake) in board.live_snakes() {
        let head = snake.head();
        if board.in_bounds(&head) {
            claims[index(head)] = Some(Claim::Owned { slot, round: 0 });
            frontier.push((slot, head));
        }
    }

    let mut round = 0;
    while !frontier.is_empty() {
        round += 1;
        let mut next = Vec::new();
        for (slot, cell) in frontier {
            if claims[index(cell)] == Some(Claim::Contested) {
                continue;
            }
            for neighbor in get_neighbors(board, cell, wrapped) {
                let idx = index(neighbor.point);
                match claims[idx] {
                    None => {
                        claims[idx] = Some(Claim::Owned { slot, round });
                        counts[slot] += 1;
                        next.push((slot, neighbor.point));
                    }
                    Some(Claim::Owned { slot: owner, round: claimed })
                        if owner != slot && claimed == round =>
                    {
                        counts[owner] -= 1;
                        claims[idx] = Some(Claim::Contested);
                    }
                    _ => {}
                }
            }
        }
        frontier = next;
    }

    Territory { counts }
}
