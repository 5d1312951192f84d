//! Choosing the next/previous queue slot.
//!
//! Pure functions over the queue; randomness comes from the caller's RNG so
//! shuffle is reproducible under a seeded generator.

use rand::Rng;

use crate::catalog::Track;

fn position_of(queue: &[Track], current: Option<u64>) -> Option<usize> {
    let current = current?;
    queue.iter().position(|t| t.id == current)
}

/// Index of the track to play after `current`.
///
/// With shuffle on, a random slot holding a different track is drawn; the
/// draw is retried at most `queue.len()` times before falling back to the
/// following slot. A current track that is not in the queue restarts from
/// the top (or any slot, under shuffle). `None` for an empty queue.
pub fn next_index<R: Rng + ?Sized>(
    queue: &[Track],
    current: Option<u64>,
    shuffle: bool,
    rng: &mut R,
) -> Option<usize> {
    if queue.is_empty() {
        return None;
    }
    let len = queue.len();
    let pos = position_of(queue, current);

    if shuffle {
        if len == 1 {
            return Some(0);
        }
        let Some(pos) = pos else {
            return Some(rng.gen_range(0..len));
        };
        for _ in 0..len {
            let candidate = rng.gen_range(0..len);
            if queue[candidate].id != queue[pos].id {
                return Some(candidate);
            }
        }
        return Some((pos + 1) % len);
    }

    Some(match pos {
        Some(p) => (p + 1) % len,
        None => 0,
    })
}

/// Index of the track before `current`, wrapping to the end. Shuffle does not
/// apply; a current track missing from the queue selects the first slot.
pub fn previous_index(queue: &[Track], current: Option<u64>) -> Option<usize> {
    if queue.is_empty() {
        return None;
    }
    let len = queue.len();
    Some(match position_of(queue, current) {
        Some(p) => (p + len - 1) % len,
        None => 0,
    })
}
