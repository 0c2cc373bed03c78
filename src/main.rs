//! Pomodoro lamp firmware — main entry point.
//!
//! Hexagonal architecture with three execution contexts joined by queues.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │   LampAdapter       LogEventSink       Esp32TimeAdapter        │
//! │   (LampPort)        (EventSink)        (ClockPort)             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          PomodoroService (pure logic)                  │    │
//! │  │  PomodoroMachine · lamp table                          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  button ISR ─▶ edge ring ─▶ debounce task ─┐                   │
//! │  esp_timer tick ───────────────────────────┴─▶ EVENT_QUEUE ─▶  │
//! │                                                   controller   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use futures_lite::future::block_on;
use log::info;

use pomodoro::adapters::hardware::LampAdapter;
use pomodoro::adapters::log_sink::LogEventSink;
use pomodoro::adapters::time::Esp32TimeAdapter;
use pomodoro::app::service::{PomodoroService, run_controller};
use pomodoro::config::TimerConfig;
use pomodoro::error::Error;
use pomodoro::drivers::button::{Debouncer, run_debounce_task};
use pomodoro::drivers::task_pin::{Core, spawn_on_core};
use pomodoro::drivers::{hw_init, hw_timer};
use pomodoro::events::{EVENT_QUEUE, EdgeQueue, TimerEvent, post_event};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Pomodoro v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = TimerConfig::default();
    config.validate()?;
    info!(
        "Config: work={}s short={}s long={}s (enabled={}, after {})",
        config.work_period_secs,
        config.short_break_secs,
        config.long_break_secs,
        config.long_break_enabled,
        config.long_break_after,
    );

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let clock = Esp32TimeAdapter::new();

    // ── 4. Tasks ──────────────────────────────────────────────
    // The edge ring lives for the whole program: the ISR keeps the producer,
    // the debounce task the consumer.
    let edge_ring: &'static mut EdgeQueue = Box::leak(Box::new(EdgeQueue::new()));
    let (edge_tx, mut edge_rx) = edge_ring.split();

    let mut debouncer = Debouncer::new(config.debounce_ms);
    let debounce = spawn_on_core(Core::App, 6, 4, "debounce\0", move || {
        run_debounce_task(&mut edge_rx, &EVENT_QUEUE, &clock, &mut debouncer);
    })?;

    let tick_interval_ms = config.tick_interval_ms;
    let mut service = PomodoroService::new(config);
    let controller = spawn_on_core(Core::App, 5, 8, "controller\0", move || {
        let mut lamps = LampAdapter::new();
        let mut sink = LogEventSink::new();
        service.start(&mut sink);
        block_on(run_controller(&EVENT_QUEUE, &mut service, &clock, &mut lamps, &mut sink));
    })?;

    // ── 5. Event sources ──────────────────────────────────────
    hw_init::init_isr_service(edge_tx)?;
    post_event(&EVENT_QUEUE, TimerEvent::TimerReady).map_err(Error::from)?;
    hw_timer::start_tick_timer(&EVENT_QUEUE, tick_interval_ms)?;

    info!("System ready.");

    // Neither task returns; a join only completes if one panicked.
    controller
        .join()
        .map_err(|_| anyhow!("controller task panicked"))?;
    debounce
        .join()
        .map_err(|_| anyhow!("debounce task panicked"))?;
    Ok(())
}
