use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    driver::{AccessState, CanvasDriver},
    error::{LoomError, LoomResult},
    geom::{Direction, WorldPos},
    palette::{Palette, Rgb},
};

/// Deterministic in-process stand-in for the remote surface.
///
/// Models what the scheduler can observe of the real transport: a
/// viewport panned in fixed steps, a roughly 3-px-per-cell cursor
/// projection, cooldown box readings, palette swatches, and scriptable
/// interruptions. The CLI runs rehearsals against it; the integration
/// tests drive every recovery path through it.
pub struct SimCanvas {
    center: WorldPos,
    cursor: WorldPos,
    selected: Rgb,
    painted: HashMap<WorldPos, Rgb>,
    placements: Vec<(WorldPos, Rgb)>,
    missing_swatches: HashSet<Rgb>,
    cooldown_script: VecDeque<String>,
    reject_clicks: HashSet<u64>,
    challenge_at: Option<u64>,
    challenge: bool,
    stalled: bool,
    navigable: Option<(WorldPos, WorldPos)>,
    pan_step: i64,
    px_per_cell: i64,
    cursor_bias: (i64, i64),
    clicks: u64,
    cursor_moves: u64,
    pans: u64,
    refreshes: u64,
}

impl SimCanvas {
    pub fn new(center: WorldPos) -> Self {
        Self {
            center,
            cursor: center,
            selected: Palette::COLORS[0], // the surface opens with the first swatch active
            painted: HashMap::new(),
            placements: Vec::new(),
            missing_swatches: HashSet::new(),
            cooldown_script: VecDeque::new(),
            reject_clicks: HashSet::new(),
            challenge_at: None,
            challenge: false,
            stalled: false,
            navigable: None,
            pan_step: 25,
            px_per_cell: 3,
            cursor_bias: (0, 0),
            clicks: 0,
            cursor_moves: 0,
            pans: 0,
            refreshes: 0,
        }
    }

    /// Shift every first-pass cursor landing, in px. Non-zero bias makes
    /// the corrective second pass necessary, as on the real surface.
    pub fn set_cursor_bias(&mut self, dx: i64, dy: i64) {
        self.cursor_bias = (dx, dy);
    }

    /// Restrict the cursor to an inclusive world rectangle; landings
    /// outside it are rejected as out of bounds.
    pub fn set_navigable(&mut self, min: WorldPos, max: WorldPos) {
        self.navigable = Some((min, max));
    }

    /// Queue cooldown box readings, returned in order; `"0"` afterwards.
    pub fn script_cooldowns<I, S>(&mut self, readings: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cooldown_script.extend(readings.into_iter().map(S::into));
    }

    /// Reject the nth click (1-based) once; the placement is dropped.
    pub fn reject_click(&mut self, index: u64) {
        self.reject_clicks.insert(index);
    }

    /// Raise a persistent challenge overlay at the nth click (1-based);
    /// every interaction fails until `refresh_session`.
    pub fn raise_challenge_at(&mut self, index: u64) {
        self.challenge_at = Some(index);
    }

    pub fn remove_swatch(&mut self, rgb: Rgb) {
        self.missing_swatches.insert(rgb);
    }

    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    pub fn center(&self) -> WorldPos {
        self.center
    }

    pub fn cursor(&self) -> WorldPos {
        self.cursor
    }

    /// Every successfully issued click, in order.
    pub fn placements(&self) -> &[(WorldPos, Rgb)] {
        &self.placements
    }

    pub fn painted(&self, pos: WorldPos) -> Option<Rgb> {
        self.painted.get(&pos).copied()
    }

    pub fn cursor_moves(&self) -> u64 {
        self.cursor_moves
    }

    pub fn pans(&self) -> u64 {
        self.pans
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    fn guard(&self) -> LoomResult<()> {
        if self.challenge {
            return Err(LoomError::intercepted("challenge overlay is visible"));
        }
        if self.stalled {
            return Err(LoomError::intercepted("no answer from the surface"));
        }
        Ok(())
    }
}

fn project(px: i64, px_per_cell: i64) -> i64 {
    (px as f64 / px_per_cell as f64).round() as i64
}

impl CanvasDriver for SimCanvas {
    fn pan_viewport(&mut self, direction: Direction) -> LoomResult<WorldPos> {
        self.guard()?;
        self.pans += 1;
        match direction {
            Direction::Left => self.center.x -= self.pan_step,
            Direction::Right => self.center.x += self.pan_step,
            Direction::Up => self.center.y -= self.pan_step,
            Direction::Down => self.center.y += self.pan_step,
        }
        Ok(self.center)
    }

    fn move_cursor_by(&mut self, dx: i64, dy: i64) -> LoomResult<WorldPos> {
        self.guard()?;
        self.cursor_moves += 1;
        let (bx, by) = self.cursor_bias;
        let landing = WorldPos::new(
            self.center.x + project(dx + bx, self.px_per_cell),
            self.center.y + project(dy + by, self.px_per_cell),
        );
        if let Some((min, max)) = self.navigable {
            if landing.x < min.x || landing.y < min.y || landing.x > max.x || landing.y > max.y {
                return Err(LoomError::OutOfBounds);
            }
        }
        self.cursor = landing;
        Ok(landing)
    }

    fn click(&mut self) -> LoomResult<()> {
        self.guard()?;
        self.clicks += 1;
        if self.challenge_at == Some(self.clicks) {
            self.challenge = true;
            return Err(LoomError::intercepted("challenge raised mid-click"));
        }
        if self.reject_clicks.remove(&self.clicks) {
            return Err(LoomError::intercepted("click rejected by the surface"));
        }
        self.painted.insert(self.cursor, self.selected);
        self.placements.push((self.cursor, self.selected));
        Ok(())
    }

    fn select_color(&mut self, rgb: Rgb) -> LoomResult<()> {
        self.guard()?;
        if self.missing_swatches.contains(&rgb) {
            return Err(LoomError::SwatchMissing(rgb));
        }
        self.selected = rgb;
        Ok(())
    }

    fn read_cooldown(&mut self) -> LoomResult<String> {
        self.guard()?;
        Ok(self
            .cooldown_script
            .pop_front()
            .unwrap_or_else(|| "0".to_string()))
    }

    fn read_access(&mut self) -> LoomResult<AccessState> {
        Ok(AccessState {
            challenge_visible: self.challenge,
            connection_stalled: self.stalled,
        })
    }

    fn refresh_session(&mut self) -> LoomResult<WorldPos> {
        self.refreshes += 1;
        self.challenge = false;
        self.stalled = false;
        self.cursor = self.center;
        Ok(self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pans_move_the_center_one_step() {
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        assert_eq!(
            sim.pan_viewport(Direction::Right).unwrap(),
            WorldPos::new(25, 0)
        );
        assert_eq!(
            sim.pan_viewport(Direction::Down).unwrap(),
            WorldPos::new(25, 25)
        );
        assert_eq!(sim.pans(), 2);
    }

    #[test]
    fn cursor_projection_is_exact_without_bias() {
        let mut sim = SimCanvas::new(WorldPos::new(10, 10));
        let landed = sim.move_cursor_by(3 * 7, 3 * -4).unwrap();
        assert_eq!(landed, WorldPos::new(17, 6));
    }

    #[test]
    fn click_paints_the_selected_color() {
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        sim.select_color(Rgb::new(0, 0, 0)).unwrap();
        sim.move_cursor_by(3, 0).unwrap();
        sim.click().unwrap();
        assert_eq!(sim.painted(WorldPos::new(1, 0)), Some(Rgb::new(0, 0, 0)));
        assert_eq!(sim.placements().len(), 1);
    }

    #[test]
    fn challenge_blocks_until_refresh() {
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        sim.raise_challenge_at(1);
        assert!(sim.click().unwrap_err().is_interception());
        assert!(sim.read_cooldown().unwrap_err().is_interception());
        assert!(sim.read_access().unwrap().challenge_visible);
        assert_eq!(sim.refresh_session().unwrap(), WorldPos::new(0, 0));
        assert!(sim.read_access().unwrap().clear());
        sim.click().unwrap();
        assert_eq!(sim.placements().len(), 1);
    }

    #[test]
    fn cooldown_script_drains_then_reads_zero() {
        let mut sim = SimCanvas::new(WorldPos::new(0, 0));
        sim.script_cooldowns(["1:05", "30"]);
        assert_eq!(sim.read_cooldown().unwrap(), "1:05");
        assert_eq!(sim.read_cooldown().unwrap(), "30");
        assert_eq!(sim.read_cooldown().unwrap(), "0");
    }
}
