use crate::{
    error::LoomResult,
    geom::{Direction, WorldPos},
    palette::Rgb,
};

/// What the remote surface's access check reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessState {
    pub challenge_visible: bool,
    pub connection_stalled: bool,
}

impl AccessState {
    pub fn clear(&self) -> bool {
        !self.challenge_visible && !self.connection_stalled
    }
}

/// The automation transport to one remote canvas session.
///
/// Implementations own the surface mechanics (browser, protocol, or the
/// in-tree simulator); the scheduler only sees these fire-and-confirm
/// primitives. Methods report an unanswered challenge or a rejected
/// interaction as [`LoomError::Intercepted`](crate::LoomError::Intercepted),
/// and a cursor move that leaves the navigable area as
/// [`LoomError::OutOfBounds`](crate::LoomError::OutOfBounds).
pub trait CanvasDriver {
    /// Pan the visible window one step; returns the viewport center read
    /// back from the surface after the pan settled.
    fn pan_viewport(&mut self, direction: Direction) -> LoomResult<WorldPos>;

    /// Position the cursor at a pixel offset measured from the viewport's
    /// center; returns the world position now under the cursor.
    fn move_cursor_by(&mut self, dx: i64, dy: i64) -> LoomResult<WorldPos>;

    /// Place at the current cursor position.
    fn click(&mut self) -> LoomResult<()>;

    /// Pick a palette swatch. A swatch the surface does not offer is
    /// [`LoomError::SwatchMissing`](crate::LoomError::SwatchMissing).
    fn select_color(&mut self, rgb: Rgb) -> LoomResult<()>;

    /// Raw text of the surface's cooldown box, e.g. `"1:23"` or `"45"`.
    fn read_cooldown(&mut self) -> LoomResult<String>;

    fn read_access(&mut self) -> LoomResult<AccessState>;

    /// Reload the surface; returns the re-read viewport center.
    fn refresh_session(&mut self) -> LoomResult<WorldPos>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_state_clear() {
        assert!(AccessState::default().clear());
        assert!(
            !AccessState {
                challenge_visible: true,
                connection_stalled: false,
            }
            .clear()
        );
        assert!(
            !AccessState {
                challenge_visible: false,
                connection_stalled: true,
            }
            .clear()
        );
    }
}
