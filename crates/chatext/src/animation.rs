//! Waiting animation and the done signal that dismisses it.
//!
//! A waiting animation is shown until either a done signal arrives or its
//! delay elapses. Each animation owns a single timer task and a one-shot
//! completion token; the [`AnimationSlot`] shared by both extensions holds
//! the token of the animation currently on screen.
//!
//! ```text
//! WaitingAnimation ──install──▶ AnimationSlot ◀──dismiss── DoneAnimation
//!        │                            │
//!        └── timer task ◀── oneshot ──┘   (ends on signal or delay, hides once)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::ext::{Activation, Extension, ExtensionFuture, ExtensionKind};
use crate::host::{Interaction, Mount, RenderContext};
use crate::view::View;

pub const WAITING_DISCRIMINATOR: &str = "ext_waitingAnimation";
pub const DONE_DISCRIMINATOR: &str = "ext_doneAnimation";

/// Length of one full shine sweep across the text.
const SHINE_CYCLE_MS: u64 = 1000;

// ── View ──────────────────────────────────────────────────────────────

/// A spinner followed by text whose letters shine in sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WaitingView {
    pub text: String,
    pub letters: Vec<WaitingLetter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WaitingLetter {
    pub letter: char,
    /// Animation offset; `None` for spaces, which do not animate.
    pub delay_ms: Option<u64>,
}

impl WaitingView {
    pub fn new(text: &str) -> Self {
        let len = text.chars().count() as u64;
        let letters = text
            .chars()
            .enumerate()
            .map(|(index, letter)| WaitingLetter {
                letter,
                delay_ms: (letter != ' ').then(|| index as u64 * SHINE_CYCLE_MS / len.max(1)),
            })
            .collect();
        Self {
            text: text.to_string(),
            letters,
        }
    }
}

// ── Completion token ──────────────────────────────────────────────────

/// Holds the completion token of the waiting animation on screen.
#[derive(Clone, Default)]
pub struct AnimationSlot {
    current: Arc<Mutex<Option<(u64, oneshot::Sender<()>)>>>,
    next_id: Arc<AtomicU64>,
}

impl AnimationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dismiss the animation on screen (if any) and hand out a token for a
    /// new one.
    fn install(&self) -> (u64, oneshot::Receiver<()>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        let previous = {
            let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
            slot.replace((id, tx))
        };
        if let Some((_, tx)) = previous {
            let _ = tx.send(());
        }
        (id, rx)
    }

    /// Fire the token of the animation on screen. Returns whether one was
    /// waiting for it. The token is consumed either way.
    pub fn dismiss(&self) -> bool {
        let taken = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        taken.is_some_and(|(_, tx)| tx.send(()).is_ok())
    }

    /// Drop the token of animation `id` if it is still installed.
    fn release(&self, id: u64) {
        if let Ok(mut slot) = self.current.lock()
            && slot.as_ref().is_some_and(|(current, _)| *current == id)
        {
            *slot = None;
        }
    }

    /// Whether an animation currently holds the slot.
    pub fn is_occupied(&self) -> bool {
        self.current.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

/// How a waiting animation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitingOutcome {
    /// A done signal or a newer animation replaced it.
    Dismissed,
    /// Its delay elapsed first.
    TimedOut,
}

/// Owner of a running waiting animation's timer task.
#[derive(Debug)]
pub struct WaitingHandle {
    task: JoinHandle<WaitingOutcome>,
}

impl WaitingHandle {
    /// Wait for the animation to end.
    pub async fn finished(self) -> WaitingOutcome {
        self.task.await.unwrap_or(WaitingOutcome::Dismissed)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

fn spawn_timer(
    slot: AnimationSlot,
    id: u64,
    token: oneshot::Receiver<()>,
    delay: Duration,
    mount: Arc<dyn Mount>,
) -> WaitingHandle {
    let task = tokio::spawn(async move {
        let outcome = tokio::select! {
            _ = token => WaitingOutcome::Dismissed,
            _ = tokio::time::sleep(delay) => WaitingOutcome::TimedOut,
        };
        slot.release(id);
        mount.set_hidden(true);
        debug!(?outcome, "waiting animation ended");
        outcome
    });
    WaitingHandle { task }
}

// ── Extensions ────────────────────────────────────────────────────────

/// Shows [`WaitingView`] until dismissed or timed out.
///
/// Payload: `text` (string) and `delay` (milliseconds). Missing, empty, or
/// zero values fall back to the configured defaults.
pub struct WaitingAnimationExtension {
    slot: AnimationSlot,
    default_text: String,
    default_delay: Duration,
    settle: Duration,
}

impl WaitingAnimationExtension {
    pub fn new(
        slot: AnimationSlot,
        default_text: impl Into<String>,
        default_delay: Duration,
        settle: Duration,
    ) -> Self {
        Self {
            slot,
            default_text: default_text.into(),
            default_delay,
            settle,
        }
    }

    fn delay_from(&self, payload: &serde_json::Value) -> Duration {
        payload
            .get("delay")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(self.default_delay)
    }
}

impl Extension for WaitingAnimationExtension {
    fn name(&self) -> &'static str {
        "WaitingAnimation"
    }

    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Response
    }

    fn discriminator(&self) -> &'static str {
        WAITING_DISCRIMINATOR
    }

    fn activate(&self, ctx: RenderContext) -> ExtensionFuture<'_> {
        Box::pin(async move {
            let host = ctx.require_host()?;
            let mount = ctx.require_mount()?;
            let text = ctx
                .trace
                .payload_str("text")
                .filter(|t| !t.is_empty())
                .unwrap_or(&self.default_text)
                .to_string();
            let delay = self.delay_from(&ctx.trace.payload);

            let (id, token) = self.slot.install();
            tokio::time::sleep(self.settle).await;

            mount.render(View::Waiting(WaitingView::new(&text)));
            host.interact(Interaction::Continue);
            debug!(%text, delay_ms = delay.as_millis() as u64, "waiting animation shown");

            Ok(Activation::Waiting(spawn_timer(
                self.slot.clone(),
                id,
                token,
                delay,
                mount,
            )))
        })
    }
}

/// Dismisses the waiting animation on screen, then lets the conversation
/// continue.
pub struct DoneAnimationExtension {
    slot: AnimationSlot,
    settle: Duration,
}

impl DoneAnimationExtension {
    pub fn new(slot: AnimationSlot, settle: Duration) -> Self {
        Self { slot, settle }
    }
}

impl Extension for DoneAnimationExtension {
    fn name(&self) -> &'static str {
        "DoneAnimation"
    }

    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Response
    }

    fn discriminator(&self) -> &'static str {
        DONE_DISCRIMINATOR
    }

    fn activate(&self, ctx: RenderContext) -> ExtensionFuture<'_> {
        Box::pin(async move {
            let host = ctx.require_host()?;
            let dismissed = self.slot.dismiss();
            tokio::time::sleep(self.settle).await;
            host.interact(Interaction::Continue);
            Ok(Activation::Done { dismissed })
        })
    }
}
