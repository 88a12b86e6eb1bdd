use std::thread;

use tracing::{debug, error, info};

use crate::{
    config::Tuning,
    driver::CanvasDriver,
    error::{LoomError, LoomResult},
    geom::WorldPos,
    history::TrailingHistory,
    navigator, pacer,
    notify::{NotificationSink, ResumeGate},
    palette::{Palette, Rgb},
    planner::PlacementCommand,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Intercepted,
    Recovering,
}

/// All mutable session state, owned by the scheduler and lent to
/// component operations. Nothing here is global.
#[derive(Debug)]
pub struct SessionCtx {
    pub center: WorldPos,
    pub selected: Option<Rgb>,
    pub history: TrailingHistory,
    pub state: SessionState,
}

impl SessionCtx {
    pub fn new(center: WorldPos, tuning: &Tuning) -> Self {
        Self {
            center,
            selected: None,
            history: TrailingHistory::new(tuning.history_depth),
            state: SessionState::Active,
        }
    }
}

/// What a completed run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub placed: u64,
    pub skipped: u64,
    pub replayed: u64,
    pub interceptions: u64,
}

enum Outcome {
    Placed,
    Skipped,
}

/// Drives the planned sequence against one remote session: color
/// selection, navigation, cooldown pacing, the click, and recovery when
/// the surface interrupts. The scheduler is the only component that
/// transitions session state.
pub struct Scheduler<'a> {
    driver: &'a mut dyn CanvasDriver,
    notifier: &'a mut dyn NotificationSink,
    gate: &'a mut dyn ResumeGate,
    tuning: Tuning,
    ctx: SessionCtx,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        driver: &'a mut dyn CanvasDriver,
        notifier: &'a mut dyn NotificationSink,
        gate: &'a mut dyn ResumeGate,
        tuning: Tuning,
        start_center: WorldPos,
    ) -> Self {
        let ctx = SessionCtx::new(start_center, &tuning);
        Self {
            driver,
            notifier,
            gate,
            tuning,
            ctx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.ctx.state
    }

    /// Work through the planned sequence, one placement at a time.
    #[tracing::instrument(skip_all, fields(commands = plan.len()))]
    pub fn run(&mut self, plan: &[PlacementCommand]) -> LoomResult<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, cmd) in plan.iter().enumerate() {
            match self.place_gated(cmd, true, &mut summary)? {
                Outcome::Placed => {
                    summary.placed += 1;
                    info!(step = index + 1, target = %cmd.world, color = %cmd.rgb, "placed");
                    thread::sleep(self.tuning.settle_delay);
                }
                Outcome::Skipped => summary.skipped += 1,
            }
        }
        Ok(summary)
    }

    // One full placement attempt: select, navigate, pace, click.
    fn issue(&mut self, cmd: &PlacementCommand) -> LoomResult<Outcome> {
        let Some(slot) = Palette::resolve(cmd.rgb) else {
            error!(color = %cmd.rgb, "color is not in the palette, skipping");
            return Ok(Outcome::Skipped);
        };

        if self.ctx.selected != Some(cmd.rgb) {
            match self.driver.select_color(cmd.rgb) {
                Ok(()) => {
                    debug!(slot, color = %cmd.rgb, "selected");
                    self.ctx.selected = Some(cmd.rgb);
                }
                Err(LoomError::SwatchMissing(rgb)) => {
                    error!(color = %rgb, "surface offers no swatch for this color, skipping");
                    return Ok(Outcome::Skipped);
                }
                Err(e) => return Err(e),
            }
        }

        navigator::walk_to(&mut self.ctx.center, self.driver, &self.tuning, cmd.world)?;

        // The wait sits between navigation and the click on purpose: the
        // budget deducts the time navigation already burned.
        let reading = self.driver.read_cooldown()?;
        let reported = pacer::parse_cooldown(&reading)?;
        let wait = pacer::remaining_wait(reported, self.tuning.latency_budget);
        if !wait.is_zero() {
            debug!(?wait, "cooling down before the click");
            thread::sleep(wait);
        }

        self.driver.click()?;
        Ok(Outcome::Placed)
    }

    // Retry through the interception gate until the command lands or is
    // skipped. Replay is suppressed while already replaying.
    fn place_gated(
        &mut self,
        cmd: &PlacementCommand,
        allow_replay: bool,
        summary: &mut RunSummary,
    ) -> LoomResult<Outcome> {
        loop {
            match self.issue(cmd) {
                Ok(outcome) => {
                    if matches!(outcome, Outcome::Placed) {
                        self.ctx.history.push(*cmd);
                    }
                    return Ok(outcome);
                }
                Err(e) if e.is_interception() => {
                    summary.interceptions += 1;
                    self.ctx.state = SessionState::Intercepted;
                    error!(error = %e, target = %cmd.world, "session intercepted");
                    self.await_resume()?;
                    if allow_replay {
                        self.ctx.state = SessionState::Recovering;
                        self.replay_history(summary)?;
                    }
                    self.ctx.state = SessionState::Active;
                    // The command that tripped the gate is retried, not
                    // skipped.
                }
                Err(e) => return Err(e),
            }
        }
    }

    // Blocks until the operator confirms the surface is usable again.
    // Unbounded by design: resolving the challenge is out of our hands.
    fn await_resume(&mut self) -> LoomResult<()> {
        loop {
            self.notifier
                .notify("a problem on the remote surface needs your attention");
            self.gate.wait_for_resume()?;
            if self.tuning.refresh_on_resume {
                self.ctx.center = self.driver.refresh_session()?;
                self.ctx.selected = None;
            }
            let access = self.driver.read_access()?;
            if access.clear() {
                return Ok(());
            }
            error!(?access, "surface still blocked after confirmation");
        }
    }

    // The last placements before an interception may never have landed
    // server-side; re-issue the trailing window oldest-first.
    fn replay_history(&mut self, summary: &mut RunSummary) -> LoomResult<()> {
        let snapshot = self.ctx.history.snapshot();
        info!(count = snapshot.len(), "replaying recent placements");
        for cmd in &snapshot {
            if matches!(self.place_gated(cmd, false, summary)?, Outcome::Placed) {
                summary.replayed += 1;
                info!(target = %cmd.world, "replayed");
            }
            thread::sleep(self.tuning.replay_delay);
        }
        Ok(())
    }
}
