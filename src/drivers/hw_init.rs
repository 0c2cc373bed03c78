//! One-shot hardware peripheral initialization.
//!
//! Configures the button input, the three lamp outputs and the GPIO ISR
//! service using raw ESP-IDF sys calls. Called once from `main()` before
//! the tasks start.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

use crate::events::EdgeProducer;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_button_input()?;
        init_lamp_outputs()?;
    }
    info!("hw_init: button + lamps configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Input ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_button_input() -> Result<(), HwInitError> {
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK { return Err(HwInitError::GpioConfigFailed(ret)); }
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_lamp_outputs() -> Result<(), HwInitError> {
    for &pin in &pins::LAMP_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK { return Err(HwInitError::GpioConfigFailed(ret)); }
        // Active-low: HIGH = dark until the first pattern is written.
        unsafe { gpio_set_level(pin, 1) };
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_lamp_outputs(). Only the controller task writes lamps.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the producer leaked in init_isr_service(). This ISR
    // is its only user, so the mutable borrow is exclusive.
    let edges = unsafe { &mut *arg.cast::<EdgeProducer<'static>>() };
    crate::drivers::button::button_isr_handler(edges, pins::BUTTON_GPIO);
}

/// Install per-pin GPIO ISR service and register the button handler.
///
/// Takes ownership of the producer half of the edge ring; it lives for the
/// rest of the program as the handler argument. Call after
/// init_peripherals() and after the debounce task is running.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(edges: EdgeProducer<'static>) -> Result<(), HwInitError> {
    let arg = Box::into_raw(Box::new(edges)).cast::<core::ffi::c_void>();
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed. The handler only pushes into the edge
    // ring and notifies the debounce task.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            drop(Box::from_raw(arg.cast::<EdgeProducer<'static>>()));
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // Any edge: press and release both notify, the debouncer sorts it out.
        gpio_set_intr_type(pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_ANYEDGE);
        let ret = gpio_isr_handler_add(pins::BUTTON_GPIO, Some(button_gpio_isr), arg);
        if ret != ESP_OK {
            drop(Box::from_raw(arg.cast::<EdgeProducer<'static>>()));
            return Err(HwInitError::IsrHandlerFailed(ret));
        }
        gpio_intr_enable(pins::BUTTON_GPIO);

        info!("hw_init: ISR service installed (button on GPIO {})", pins::BUTTON_GPIO);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(_edges: EdgeProducer<'static>) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EdgeQueue;

    #[test]
    fn sim_init_succeeds() {
        let queue: &'static mut EdgeQueue = Box::leak(Box::new(EdgeQueue::new()));
        let (edges, _rx) = queue.split();
        assert_eq!(init_peripherals(), Ok(()));
        assert_eq!(init_isr_service(edges), Ok(()));
    }

    #[test]
    fn init_error_display_carries_return_code() {
        assert_eq!(
            HwInitError::GpioConfigFailed(-1).to_string(),
            "GPIO config failed (rc=-1)"
        );
        assert_eq!(
            HwInitError::IsrInstallFailed(259).to_string(),
            "GPIO ISR service install failed (rc=259)"
        );
    }
}
