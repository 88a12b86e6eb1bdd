use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use tracing::debug;

use crate::{config::Tuning, geom::WorldPos, palette::Rgb, source::PixelSource};

/// Which image axis the raster walk advances fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Default,
    Chessboard,
    Random,
}

/// One unit of work: paint `rgb` at `world`. Created once by the planner,
/// consumed by the scheduler; re-issuing the same command is safe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacementCommand {
    pub world: WorldPos,
    pub rgb: Rgb,
    pub image: (u32, u32), // image-local coordinate this command came from
}

/// Order the image's opaque pixels into the placement sequence.
///
/// Pixels under the alpha floor are dropped entirely. `step` skips the
/// first N entries of the already-ordered sequence, which is what makes
/// an interrupted multi-hour run resumable: the same image, axis, method,
/// and seed reproduce the same sequence.
#[tracing::instrument(skip(source, tuning))]
pub fn plan(
    source: &dyn PixelSource,
    origin: WorldPos,
    axis: Axis,
    method: Method,
    step: usize,
    tuning: &Tuning,
) -> Vec<PlacementCommand> {
    let (width, height) = source.dimensions();
    let (outer, inner) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };

    let mut cells = Vec::new();
    for a in 0..outer {
        for b in 0..inner {
            let (x, y) = match axis {
                Axis::Horizontal => (b, a),
                Axis::Vertical => (a, b),
            };
            let [r, g, bl, alpha] = source.rgba(x, y);
            if f32::from(alpha) < tuning.alpha_floor * 255.0 {
                continue;
            }
            cells.push(PlacementCommand {
                world: WorldPos::new(origin.x + i64::from(x), origin.y + i64::from(y)),
                rgb: Rgb::new(r, g, bl),
                image: (x, y),
            });
        }
    }
    debug!(opaque = cells.len(), "collected drawable pixels");

    let ordered = match method {
        Method::Default => cells,
        Method::Chessboard => {
            // Alternating cells first, so a half-finished pass already
            // reads as the full image at a squint.
            let (even, odd): (Vec<_>, Vec<_>) = cells
                .into_iter()
                .partition(|c| (c.image.0 + c.image.1) % 2 == 0);
            even.into_iter().chain(odd).collect()
        }
        Method::Random => {
            // Fixed seed: the same input always shuffles the same way,
            // otherwise a numeric resume offset would be meaningless.
            let mut rng = StdRng::seed_from_u64(tuning.shuffle_seed);
            let mut keyed: Vec<(f64, PlacementCommand)> =
                cells.into_iter().map(|c| (rng.random::<f64>(), c)).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            keyed.into_iter().map(|(_, c)| c).collect()
        }
    };

    ordered.into_iter().skip(step).collect()
}
