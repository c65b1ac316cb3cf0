//! Evolution animation sequencer.
//!
//! A backend-triggered personality change plays a fixed-timing sequence:
//! reveal overlay → 300 ms flash → particles → optional factors list →
//! 1000 ms pause → reveal modal → apply the new theme. The sequence is
//! linear and non-cancelable once started.
//!
//! Timing is injectable through the [`Clock`] trait so tests can drive the
//! stages without real sleeps.

use std::future::Future;
use std::time::Duration;

use crate::session::Effect;
use crate::theme::Theme;

/// Overlay flash hold before particles spawn.
pub const FLASH_HOLD: Duration = Duration::from_millis(300);

/// Pause between the factors list and the modal reveal.
pub const MODAL_DELAY: Duration = Duration::from_millis(1000);

/// Overlay fade-out delay after the modal is closed. Intentionally decoupled
/// from the immediate modal hide.
pub const OVERLAY_FADE: Duration = Duration::from_millis(500);

/// Number of cosmetic particles spawned per sequence.
pub const PARTICLE_COUNT: usize = 50;

/// Sleep source for timed stages.
pub trait Clock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// One timed stage: an effect to emit, then a delay before the next stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub effect: Effect,
    pub delay_after: Duration,
}

/// The ordered stage list for an evolution into `personality`.
///
/// `factors` is the optional explanation list; it is forwarded even when
/// empty so the renderer decides whether to show the block.
pub fn stages(personality: Theme, factors: Vec<String>) -> Vec<Stage> {
    vec![
        Stage { effect: Effect::ShowOverlay, delay_after: Duration::ZERO },
        Stage { effect: Effect::FlashOverlay, delay_after: FLASH_HOLD },
        Stage {
            effect: Effect::SpawnParticles { theme: personality, count: PARTICLE_COUNT },
            delay_after: Duration::ZERO,
        },
        Stage { effect: Effect::ShowFactors(factors), delay_after: MODAL_DELAY },
        Stage { effect: Effect::ShowModal(personality), delay_after: Duration::ZERO },
        Stage { effect: Effect::SetThemeMarker(personality), delay_after: Duration::ZERO },
    ]
}

/// Drives the staged sequence against a clock.
pub struct EvolutionSequence<C: Clock> {
    clock: C,
}

impl<C: Clock> EvolutionSequence<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Play the full sequence, emitting each stage effect in order and
    /// sleeping the stage delays in between. Runs to completion; there is no
    /// cancellation point.
    pub async fn run<F: FnMut(&Effect)>(
        &self,
        personality: Theme,
        factors: Vec<String>,
        emit: &mut F,
    ) {
        for stage in stages(personality, factors) {
            emit(&stage.effect);
            if !stage.delay_after.is_zero() {
                self.clock.sleep(stage.delay_after).await;
            }
        }
    }

    /// Close the modal: modal and particles disappear immediately, the
    /// overlay fades out only after [`OVERLAY_FADE`]. The two hide
    /// operations are intentionally decoupled in timing.
    pub async fn close_modal<F: FnMut(&Effect)>(&self, emit: &mut F) {
        emit(&Effect::HideModal);
        emit(&Effect::ClearParticles);
        self.clock.sleep(OVERLAY_FADE).await;
        emit(&Effect::HideOverlay);
    }
}
