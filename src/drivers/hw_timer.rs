//! Periodic tick source using ESP-IDF's esp_timer API.
//!
//! Posts `CheckTimer(now)` into the event queue once per tick. On
//! simulation targets a plain thread sleeps between ticks instead.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call `post_event()`, which takes a critical section for
//! the enqueue and wakes the controller.

use crate::events::{EventQueue, TimerEvent, post_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// timer callbacks fire. Only called from the main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t { unsafe { TICK_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static EventQueue` handed to start_tick_timer().
    let queue = unsafe { &*arg.cast_const().cast::<EventQueue>() };
    // SAFETY: esp_timer_get_time reads the monotonic system timer.
    let now = unsafe { esp_timer_get_time() }.max(0) as u64;
    post_tick(queue, now);
}

/// Enqueue one tick stamped with `now`. A full queue drops the tick; the
/// next one re-evaluates the period.
pub fn post_tick(queue: &EventQueue, now: u64) -> bool {
    post_event(queue, TimerEvent::CheckTimer(now)).is_ok()
}

/// Start the periodic tick timer posting into `queue`.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(
    queue: &'static EventQueue,
    interval_ms: u32,
) -> Result<(), crate::error::Error> {
    // SAFETY: TICK_TIMER is written here once at boot from the main task
    // before any callback fires. The callback only posts to the event queue.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::from_ref(queue).cast_mut().cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"pomodoro_tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={})", ret);
            return Err(crate::error::Error::Init("tick timer create failed"));
        }
        let ret = esp_timer_start_periodic(tick_timer(), u64::from(interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return Err(crate::error::Error::Init("tick timer start failed"));
        }
    }
    info!("hw_timer: tick every {} ms", interval_ms);
    Ok(())
}

/// Simulation tick source: a thread that posts a tick every `interval_ms`,
/// stamped with microseconds since the thread started.
#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(
    queue: &'static EventQueue,
    interval_ms: u32,
) -> Result<(), crate::error::Error> {
    let period = std::time::Duration::from_millis(u64::from(interval_ms));
    std::thread::Builder::new()
        .name("sim-tick".into())
        .spawn(move || {
            let boot = std::time::Instant::now();
            loop {
                std::thread::sleep(period);
                post_tick(queue, boot.elapsed().as_micros() as u64);
            }
        })
        .map_err(|_| crate::error::Error::Init("tick thread spawn failed"))?;
    log::info!("hw_timer(sim): tick every {} ms", interval_ms);
    Ok(())
}
