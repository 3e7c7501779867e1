//! Acceptance check run on every assembled level before it is returned.

use crate::error::AttemptFailure;

use super::Level;
use super::pathing::reachable_from;

/// Passes when the end tile is reachable from a distinct start tile.
pub fn validate(level: &Level) -> Result<(), AttemptFailure> {
    let start = level.start_tile().pos();
    let end = level.end_tile().pos();
    if start == end {
        return Err(AttemptFailure::TooFewFloorTiles);
    }
    if reachable_from(level, start).contains(&end) {
        Ok(())
    } else {
        Err(AttemptFailure::Unreachable { start, end })
    }
}
