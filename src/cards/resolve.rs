//! Geometric resolution of boundary and motorway/railway cards. Both
//! resolvers are pure: the same inputs always give the same cell, and `None`
//! means too few candidates qualify, which callers treat as "no relocation".
//! Obstructed cells never qualify.

use std::collections::HashSet;

use tracing::debug;

use crate::board::{GameBounds, InfrastructureSites, RoadIndex};
use crate::cards::{BoundaryCard, MotorwayCard};
use crate::coords::GridKey;
use crate::types::Rotation;

/// Half-width, in degrees, of the cone around a card's compass bearing.
pub const SITE_BEARING_TOLERANCE: f64 = 22.5;
/// Sites closer than this (projected units) to the trigger are ignored.
pub const MIN_SITE_DISTANCE: f64 = 200.0;

/// Walks the boundary ring in the card's rotation and returns the N-th cell
/// carrying the card's road class. A boundary trigger starts the walk just
/// past itself; an interior trigger starts at its nearest boundary cell,
/// which counts as the first cell walked.
pub fn resolve_boundary_card(
    card: &BoundaryCard,
    trigger: GridKey,
    bounds: &GameBounds,
    roads: &RoadIndex,
    excluded: &HashSet<GridKey>,
) -> Option<GridKey> {
    let ring = bounds.ring(card.rotation);
    if ring.is_empty() {
        return None;
    }

    let start = match ring.iter().position(|c| *c == trigger) {
        Some(pos) => pos + 1,
        None => {
            // Ties go to the earliest cell in clockwise order whatever the
            // card's rotation.
            let nearest = bounds
                .ring(Rotation::Clockwise)
                .into_iter()
                .min_by_key(|c| c.manhattan(trigger))?;
            ring.iter().position(|c| *c == nearest)?
        }
    };
    let walk_len = if bounds.is_boundary(trigger) {
        ring.len() - 1
    } else {
        ring.len()
    };

    let resolved = ring
        .iter()
        .cycle()
        .skip(start)
        .take(walk_len)
        .filter(|c| roads.has_road(**c, card.road_class) && !excluded.contains(*c))
        .nth(card.ordinal.rank() - 1)
        .copied();
    debug!(?card, %trigger, ?resolved, "boundary card resolved");
    resolved
}

fn angular_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Picks the N-th closest junction or station lying within
/// [`SITE_BEARING_TOLERANCE`] of the card's compass bearing and at least
/// [`MIN_SITE_DISTANCE`] away.
pub fn resolve_motorway_card(
    card: &MotorwayCard,
    trigger: GridKey,
    sites: &InfrastructureSites,
    excluded: &HashSet<GridKey>,
) -> Option<GridKey> {
    let mut candidates: Vec<(f64, GridKey)> = sites
        .sites(card.infrastructure)
        .iter()
        .filter(|site| !excluded.contains(*site))
        .map(|site| (trigger.distance(*site), *site))
        .filter(|(distance, site)| {
            *distance >= MIN_SITE_DISTANCE
                && angular_difference(trigger.bearing_to(*site), card.direction.bearing())
                    <= SITE_BEARING_TOLERANCE
        })
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let resolved = candidates
        .get(card.ordinal.rank() - 1)
        .map(|(_, site)| *site);
    debug!(?card, %trigger, candidates = candidates.len(), ?resolved, "motorway card resolved");
    resolved
}
