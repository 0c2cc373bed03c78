//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap. Handlers only touch the shared [`TimerContext`].
//!
//! ```text
//!  OFF ──[ready]──▶ IDLE ──[press/start]──▶ WORK ◀──────────────────────┐
//!                    ▲                       │ [elapsed ≥ work]          │
//!                    │                       ├──────────▶ SHORT_BREAK ───┤ [elapsed ≥ short
//!                    │                       │                           │  or 2nd press]
//!                    │                       └──────────▶ LONG_BREAK     │
//!                    │                          [n short]     │ [elapsed ≥ long − short]
//!                    │                                        ▼          │
//!                    │                          LONG_BREAK_LAST_MINUTES ─┘ [elapsed ≥ long
//!                    │                                                      or 2nd press]
//!  Any active state ─┴─[reset]
//! ```

use super::context::{CountingNotice, TimerContext};
use super::{StateDescriptor, TimerState};
use crate::events::TimerEvent;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; TimerState::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: TimerState::Off,
            name: "Off",
            on_enter: None,
            react: off_react,
        },
        // Index 1 — Idle
        StateDescriptor {
            id: TimerState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            react: idle_react,
        },
        // Index 2 — Work
        StateDescriptor {
            id: TimerState::Work,
            name: "Work",
            on_enter: Some(work_enter),
            react: work_react,
        },
        // Index 3 — ShortBreak
        StateDescriptor {
            id: TimerState::ShortBreak,
            name: "ShortBreak",
            on_enter: Some(short_break_enter),
            react: short_break_react,
        },
        // Index 4 — LongBreak
        StateDescriptor {
            id: TimerState::LongBreak,
            name: "LongBreak",
            on_enter: Some(long_break_enter),
            react: long_break_react,
        },
        // Index 5 — LongBreakLastMinutes (continues LongBreak's countdown)
        StateDescriptor {
            id: TimerState::LongBreakLastMinutes,
            name: "LongBreakLastMinutes",
            on_enter: None,
            react: last_minutes_react,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF state — waiting for initialisation to finish
// ═══════════════════════════════════════════════════════════════════════════

fn off_react(_ctx: &mut TimerContext, event: TimerEvent) -> Option<TimerState> {
    match event {
        TimerEvent::TimerReady => Some(TimerState::Idle),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — between cycles
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut TimerContext) {
    ctx.reset_counting();
    info!(
        "IDLE: {} short / {} long breaks so far",
        ctx.short_breaks_taken, ctx.long_breaks_taken
    );
}

fn idle_react(_ctx: &mut TimerContext, event: TimerEvent) -> Option<TimerState> {
    match event {
        TimerEvent::StartTimer | TimerEvent::TimerAction => Some(TimerState::Work),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  WORK state — pausable countdown
// ═══════════════════════════════════════════════════════════════════════════

fn work_enter(ctx: &mut TimerContext) {
    ctx.reset_counting();
    info!("WORK: {}s period, press to start", ctx.config.work_period_secs);
}

fn work_react(ctx: &mut TimerContext, event: TimerEvent) -> Option<TimerState> {
    match event {
        TimerEvent::ResetTimer => Some(TimerState::Idle),

        TimerEvent::TimerAction => {
            // Not started or paused → run; running → pause.
            if ctx.timer_active {
                ctx.pause_counting(ctx.now);
            } else {
                ctx.start_counting(ctx.now);
            }
            debug!("WORK: press, active={} elapsed={}s", ctx.timer_active, ctx.counting_seconds());
            None
        }

        TimerEvent::CheckTimer(_) => {
            if ctx.counting_seconds() < u64::from(ctx.config.work_period_secs) {
                return None;
            }
            if ctx.config.long_break_enabled
                && ctx.short_breaks_taken >= ctx.config.long_break_after
            {
                info!(
                    "WORK: done after {} short breaks → long break",
                    ctx.short_breaks_taken
                );
                Some(TimerState::LongBreak)
            } else {
                Some(TimerState::ShortBreak)
            }
        }

        TimerEvent::TimerReady | TimerEvent::StartTimer => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Break press rule — shared by every break state
// ═══════════════════════════════════════════════════════════════════════════

/// First press starts the break countdown; any later press ends the break.
/// Breaks never pause.
fn break_action(ctx: &mut TimerContext) -> Option<TimerState> {
    if ctx.is_started() {
        info!("BREAK: skipped after {}s", ctx.counting_seconds());
        ctx.notice = Some(CountingNotice::BreakSkipped);
        Some(TimerState::Work)
    } else {
        ctx.start_counting(ctx.now);
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SHORT_BREAK state
// ═══════════════════════════════════════════════════════════════════════════

fn short_break_enter(ctx: &mut TimerContext) {
    ctx.reset_counting();
    ctx.short_breaks_taken = ctx.short_breaks_taken.saturating_add(1);
    info!(
        "SHORT_BREAK: #{} for {}s",
        ctx.short_breaks_taken, ctx.config.short_break_secs
    );
}

fn short_break_react(ctx: &mut TimerContext, event: TimerEvent) -> Option<TimerState> {
    match event {
        TimerEvent::ResetTimer => Some(TimerState::Idle),
        TimerEvent::TimerAction => break_action(ctx),
        TimerEvent::CheckTimer(_) => {
            (ctx.counting_seconds() >= u64::from(ctx.config.short_break_secs))
                .then_some(TimerState::Work)
        }
        TimerEvent::TimerReady | TimerEvent::StartTimer => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LONG_BREAK state — first segment of the long break countdown
// ═══════════════════════════════════════════════════════════════════════════

fn long_break_enter(ctx: &mut TimerContext) {
    ctx.reset_counting();
    ctx.short_breaks_taken = 0;
    ctx.long_breaks_taken = ctx.long_breaks_taken.saturating_add(1);
    info!(
        "LONG_BREAK: #{} for {}s",
        ctx.long_breaks_taken, ctx.config.long_break_secs
    );
}

fn long_break_react(ctx: &mut TimerContext, event: TimerEvent) -> Option<TimerState> {
    match event {
        TimerEvent::ResetTimer => Some(TimerState::Idle),
        TimerEvent::TimerAction => break_action(ctx),
        TimerEvent::CheckTimer(_) => {
            let elapsed = ctx.counting_seconds();
            // A stalled tick source can overshoot the whole break; go straight
            // to Work so a repeated check cannot cascade through both states.
            if elapsed >= u64::from(ctx.config.long_break_secs) {
                Some(TimerState::Work)
            } else if elapsed >= u64::from(ctx.config.long_break_tail_starts_at()) {
                Some(TimerState::LongBreakLastMinutes)
            } else {
                None
            }
        }
        TimerEvent::TimerReady | TimerEvent::StartTimer => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LONG_BREAK_LAST_MINUTES state — same countdown, different lamps
// ═══════════════════════════════════════════════════════════════════════════

fn last_minutes_react(ctx: &mut TimerContext, event: TimerEvent) -> Option<TimerState> {
    match event {
        TimerEvent::ResetTimer => Some(TimerState::Idle),
        TimerEvent::TimerAction => break_action(ctx),
        TimerEvent::CheckTimer(_) => {
            (ctx.counting_seconds() >= u64::from(ctx.config.long_break_secs))
                .then_some(TimerState::Work)
        }
        TimerEvent::TimerReady | TimerEvent::StartTimer => None,
    }
}
