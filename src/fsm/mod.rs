//! Function-pointer finite state machine engine for the Pomodoro cycle.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  StateTable                                                │
//! │  ┌──────────────────────┬───────────┬──────────────────┐   │
//! │  │ TimerState           │ on_enter  │ react            │   │
//! │  ├──────────────────────┼───────────┼──────────────────┤   │
//! │  │ Off                  │ —         │ fn(ctx, ev)->Opt │   │
//! │  │ Idle                 │ fn(ctx)   │ fn(ctx, ev)->Opt │   │
//! │  │ Work                 │ fn(ctx)   │ fn(ctx, ev)->Opt │   │
//! │  │ ShortBreak           │ fn(ctx)   │ fn(ctx, ev)->Opt │   │
//! │  │ LongBreak            │ fn(ctx)   │ fn(ctx, ev)->Opt │   │
//! │  │ LongBreakLastMinutes │ —         │ fn(ctx, ev)->Opt │   │
//! │  └──────────────────────┴───────────┴──────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state tag carries no data. Everything that must survive a transition
//! (countdown timestamps, break tallies) lives in the single [`TimerContext`]
//! owned by [`PomodoroMachine`], so every state sees the same counters.
//!
//! Each dispatched event is handed to `react` of the **current** state.
//! If it returns `Some(next)`, the engine switches the current pointer and
//! runs `on_enter` of `next`. Transitions are O(1) and never block.

pub mod context;
pub mod states;

use context::{CountingNotice, TimerContext};
use log::info;
use serde::Serialize;

use crate::config::TimerConfig;
use crate::events::{TimerEvent, Timestamp};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all timer states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TimerState {
    Off = 0,
    Idle = 1,
    Work = 2,
    ShortBreak = 3,
    LongBreak = 4,
    LongBreakLastMinutes = 5,
}

impl TimerState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 6;

    /// Every state, in table order.
    pub const ALL: [TimerState; Self::COUNT] = [
        Self::Off,
        Self::Idle,
        Self::Work,
        Self::ShortBreak,
        Self::LongBreak,
        Self::LongBreakLastMinutes,
    ];

    /// Convert an index back to `TimerState`.  Panics on out-of-range in
    /// debug builds; returns `Off` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Idle,
            2 => Self::Work,
            3 => Self::ShortBreak,
            4 => Self::LongBreak,
            5 => Self::LongBreakLastMinutes,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Off
            }
        }
    }

    /// Break states cannot be paused; a second press skips to `Work`.
    pub fn is_break(self) -> bool {
        matches!(
            self,
            Self::ShortBreak | Self::LongBreak | Self::LongBreakLastMinutes
        )
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions. Runs once per transition into the state.
pub type StateActionFn = fn(&mut TimerContext);

/// Signature for the event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateReactFn = fn(&mut TimerContext, TimerEvent) -> Option<TimerState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: TimerState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub react: StateReactFn,
}

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TimerState,
    pub to: TimerState,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the current-state index. The mutable
/// [`TimerContext`] is threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `TimerState as usize`.
    table: [StateDescriptor; TimerState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Number of transitions taken since start.
    transitions: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; TimerState::COUNT], initial: TimerState) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `dispatch()`.
    pub fn start(&mut self, ctx: &mut TimerContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Hand one event to the current state and apply the resulting transition.
    pub fn dispatch(&mut self, event: TimerEvent, ctx: &mut TimerContext) -> Option<Transition> {
        let next = (self.table[self.current].react)(ctx, event);
        next.map(|next_id| self.transition(next_id, ctx))
    }

    /// The current state's identity.
    pub fn current_state(&self) -> TimerState {
        TimerState::from_index(self.current)
    }

    /// Name of the current state, as listed in the table.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Transitions taken since start.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: TimerState, ctx: &mut TimerContext) -> Transition {
        let from = self.current_state();
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }

        Transition { from, to: next_id }
    }
}

// ---------------------------------------------------------------------------
// Pomodoro machine (engine + shared context)
// ---------------------------------------------------------------------------

/// The appliance's one timer: state engine plus every shared field.
///
/// Created once at boot in `Off` and owned by the controller task for
/// the lifetime of the process.
pub struct PomodoroMachine {
    fsm: Fsm,
    ctx: TimerContext,
}

impl PomodoroMachine {
    pub fn new(config: TimerConfig) -> Self {
        let mut fsm = Fsm::new(states::build_state_table(), TimerState::Off);
        let mut ctx = TimerContext::new(config);
        fsm.start(&mut ctx);
        Self { fsm, ctx }
    }

    /// Process exactly one event.
    ///
    /// `now` stamps events without a payload; `CheckTimer` carries its own.
    pub fn dispatch(&mut self, event: TimerEvent, now: Timestamp) -> Option<Transition> {
        self.ctx.notice = None;
        self.ctx.now = match event {
            TimerEvent::CheckTimer(at) => at,
            _ => now,
        };
        self.fsm.dispatch(event, &mut self.ctx)
    }

    pub fn state(&self) -> TimerState {
        self.fsm.current_state()
    }

    pub fn state_name(&self) -> &'static str {
        self.fsm.current_name()
    }

    pub fn context(&self) -> &TimerContext {
        &self.ctx
    }

    pub fn config(&self) -> &TimerConfig {
        &self.ctx.config
    }

    /// Elapsed seconds of the current period, excluding pauses.
    pub fn counting_seconds(&self, now: Timestamp) -> u64 {
        self.ctx.counting_seconds_at(now)
    }

    pub fn timer_active(&self) -> bool {
        self.ctx.timer_active
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.is_paused()
    }

    pub fn is_started(&self) -> bool {
        self.ctx.is_started()
    }

    pub fn short_breaks_taken(&self) -> u32 {
        self.ctx.short_breaks_taken
    }

    pub fn long_breaks_taken(&self) -> u32 {
        self.ctx.long_breaks_taken
    }

    pub fn transition_count(&self) -> u64 {
        self.fsm.transition_count()
    }

    /// Take the counting notice left by the last dispatch, if any.
    /// Cleared at the start of every dispatch.
    pub fn take_notice(&mut self) -> Option<CountingNotice> {
        self.ctx.notice.take()
    }
}
