use tracing::debug;

use crate::{
    config::Tuning,
    driver::CanvasDriver,
    error::{LoomError, LoomResult},
    geom::{Direction, WorldPos},
};

/// True iff the target sits strictly inside the viewport's safe
/// rectangle. A delta of exactly half the extent is off-screen.
pub fn on_screen(center: WorldPos, target: WorldPos, tuning: &Tuning) -> bool {
    let half = tuning.half_extent();
    (center.x - target.x).abs() < half && (center.y - target.y).abs() < half
}

/// Which way to pan next for an off-screen target; `None` when the
/// target is the center itself.
pub fn pan_direction(center: WorldPos, target: WorldPos, tuning: &Tuning) -> Option<Direction> {
    if center == target {
        return None;
    }
    let dx = center.x - target.x;
    let dy = center.y - target.y;

    // Clockwise quadrant numbering starting upper-right.
    let quadrant = if dy < 0 {
        if dx < 0 { 4 } else { 3 }
    } else if dx < 0 {
        2
    } else {
        1
    };

    if dx == 0 {
        return Some(if quadrant <= 2 {
            Direction::Up
        } else {
            Direction::Down
        });
    }

    // Where the center-to-target line crosses the safe rectangle's near
    // vertical edge. If that point is still visible, the motion left to
    // cover is dominantly horizontal; otherwise vertical. Keeps pans
    // from oscillating when the target sits almost on an axis.
    let half = tuning.viewport_extent as f64 / 2.0;
    let edge_x = (center.x + tuning.half_extent() - 1) as f64;
    let edge_y = center.y as f64 + dy as f64 * tuning.viewport_extent as f64 / dx as f64;
    let crossing_visible =
        (center.x as f64 - edge_x).abs() < half && (center.y as f64 - edge_y).abs() < half;

    Some(if crossing_visible {
        if quadrant % 2 == 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if quadrant <= 2 {
        Direction::Up
    } else {
        Direction::Down
    })
}

/// Pan until the target is visible, then land the cursor on it.
///
/// The cursor pass is two-step: a first offset of `cursor_scale` px per
/// world unit, then, if the read-back position misses, one corrective
/// offset of `correction_scale` px per residual unit. The surface's
/// pixel-to-offset mapping is not quite linear and has no closed-form
/// inverse; two passes are enough in practice.
#[tracing::instrument(skip(center, driver, tuning))]
pub fn walk_to(
    center: &mut WorldPos,
    driver: &mut dyn CanvasDriver,
    tuning: &Tuning,
    target: WorldPos,
) -> LoomResult<()> {
    while !on_screen(*center, target, tuning) {
        let Some(direction) = pan_direction(*center, target, tuning) else {
            break;
        };
        *center = driver.pan_viewport(direction)?;
        debug!(center = %*center, ?direction, "panned");
    }

    let dx = tuning.cursor_scale * (target.x - center.x);
    let dy = tuning.cursor_scale * (target.y - center.y);
    let landed = cursor_step(driver, dx, dy)?;
    if landed != target {
        let cdx = dx + tuning.correction_scale * (target.x - landed.x);
        let cdy = dy + tuning.correction_scale * (target.y - landed.y);
        let corrected = cursor_step(driver, cdx, cdy)?;
        debug!(from = %landed, to = %corrected, "corrected cursor");
    }
    Ok(())
}

// A cursor move the surface rejects as out of bounds is the surface
// interrupting us, not a navigation bug.
fn cursor_step(driver: &mut dyn CanvasDriver, dx: i64, dy: i64) -> LoomResult<WorldPos> {
    match driver.move_cursor_by(dx, dy) {
        Err(LoomError::OutOfBounds) => Err(LoomError::intercepted(
            "cursor moved outside the navigable area",
        )),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCanvas;

    fn chebyshev(a: WorldPos, b: WorldPos) -> i64 {
        (a.x - b.x).abs().max((a.y - b.y).abs())
    }

    #[test]
    fn on_screen_boundary_is_exclusive() {
        let t = Tuning::default();
        let c = WorldPos::new(0, 0);
        assert!(on_screen(c, WorldPos::new(49, 49), &t));
        assert!(on_screen(c, WorldPos::new(-49, 0), &t));
        assert!(!on_screen(c, WorldPos::new(50, 0), &t));
        assert!(!on_screen(c, WorldPos::new(0, -50), &t));
        assert!(!on_screen(c, WorldPos::new(50, 50), &t));
    }

    #[test]
    fn centered_target_needs_no_pan() {
        let t = Tuning::default();
        let c = WorldPos::new(3, 3);
        assert_eq!(pan_direction(c, c, &t), None);
    }

    #[test]
    fn axis_aligned_targets_pick_the_obvious_direction() {
        let t = Tuning::default();
        let c = WorldPos::new(0, 0);
        assert_eq!(
            pan_direction(c, WorldPos::new(200, 0), &t),
            Some(Direction::Right)
        );
        assert_eq!(
            pan_direction(c, WorldPos::new(-200, 0), &t),
            Some(Direction::Left)
        );
        assert_eq!(
            pan_direction(c, WorldPos::new(0, 200), &t),
            Some(Direction::Down)
        );
        assert_eq!(
            pan_direction(c, WorldPos::new(0, -200), &t),
            Some(Direction::Up)
        );
    }

    #[test]
    fn edge_crossing_tie_break_prefers_the_dominant_axis() {
        let t = Tuning::default();
        let c = WorldPos::new(0, 0);
        // Crossing point at y = 45: still visible, go horizontal.
        assert_eq!(
            pan_direction(c, WorldPos::new(200, 90), &t),
            Some(Direction::Right)
        );
        // Crossing point at y = 55: off the rectangle, go vertical.
        assert_eq!(
            pan_direction(c, WorldPos::new(200, 110), &t),
            Some(Direction::Down)
        );
        assert_eq!(
            pan_direction(c, WorldPos::new(-200, -110), &t),
            Some(Direction::Up)
        );
    }

    #[test]
    fn pan_walk_makes_monotone_progress() {
        let t = Tuning::default();
        let step = 25;
        for tx in (-130..=130).step_by(13) {
            for ty in (-130..=130).step_by(13) {
                let target = WorldPos::new(tx, ty);
                let mut center = WorldPos::new(0, 0);
                let mut dist = chebyshev(center, target);
                let mut hops = 0;
                while !on_screen(center, target, &t) {
                    let dir = pan_direction(center, target, &t).unwrap();
                    match dir {
                        Direction::Left => center.x -= step,
                        Direction::Right => center.x += step,
                        Direction::Up => center.y -= step,
                        Direction::Down => center.y += step,
                    }
                    let next = chebyshev(center, target);
                    assert!(next <= dist, "panned away from {target} via {dir:?}");
                    dist = next;
                    hops += 1;
                    assert!(hops < 40, "no convergence towards {target}");
                }
            }
        }
    }

    #[test]
    fn walks_and_lands_cursor_on_target() {
        let t = Tuning::default();
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        let mut center = WorldPos::new(0, 0);
        let target = WorldPos::new(120, 40);
        walk_to(&mut center, &mut sim, &t, target).unwrap();
        assert!(on_screen(center, target, &t));
        assert_eq!(center, sim.center());
        assert_eq!(sim.cursor(), target);
        assert_eq!(sim.cursor_moves(), 1);
    }

    #[test]
    fn second_pass_corrects_a_short_first_landing() {
        let t = Tuning::default();
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        sim.set_cursor_bias(-2, -2);
        let mut center = WorldPos::new(0, 0);
        let target = WorldPos::new(10, 5);
        walk_to(&mut center, &mut sim, &t, target).unwrap();
        assert_eq!(sim.cursor(), target);
        assert_eq!(sim.cursor_moves(), 2);
    }

    #[test]
    fn out_of_bounds_cursor_reads_as_interception() {
        let t = Tuning::default();
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        sim.set_navigable(WorldPos::new(-50, -50), WorldPos::new(50, 50));
        let mut center = WorldPos::new(0, 0);
        let err = walk_to(&mut center, &mut sim, &t, WorldPos::new(60, 0)).unwrap_err();
        assert!(err.is_interception());
    }
}
