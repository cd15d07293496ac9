//! Periodic tick timer using ESP-IDF's esp_timer API.
//!
//! Calls [`TickSource::on_tick`] once per period.  On simulation targets a
//! background thread sleeps between ticks to approximate the timing.
//!
//! The callback runs in the esp_timer task context (not ISR).  It only
//! touches the tick source inside its critical section.

use crate::error::{Error, Result};
use crate::tick::TickSource;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Handle to the running tick timer.  Dropping it stops the ticks.
pub struct TickTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    #[cfg(not(target_os = "espidf"))]
    stop: std::sync::Arc<std::sync::atomic::AtomicBool>,
    #[cfg(not(target_os = "espidf"))]
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static TickSource` passed to
    // `start_tick_timer`; it outlives the timer.
    let source = unsafe { &*(arg as *const TickSource) };
    source.on_tick();
}

/// Start calling `source.on_tick()` every `period_us` microseconds.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(source: &'static TickSource, period_us: u32) -> Result<TickTimer> {
    let args = esp_timer_create_args_t {
        callback: Some(tick_cb),
        arg: source as *const TickSource as *mut core::ffi::c_void,
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"drive_tick".as_ptr(),
        skip_unhandled_events: false,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();

    // SAFETY: `args` outlives the call; `handle` receives a fresh timer
    // that is owned by the returned `TickTimer`.
    let ret = unsafe { esp_timer_create(&args, &mut handle) };
    if ret != ESP_OK {
        log::error!("hw_timer: create failed (rc={})", ret);
        return Err(Error::Init("tick timer create failed"));
    }

    // SAFETY: `handle` was just created and is not running.
    let ret = unsafe { esp_timer_start_periodic(handle, u64::from(period_us)) };
    if ret != ESP_OK {
        log::error!("hw_timer: start failed (rc={})", ret);
        // SAFETY: timer is stopped; delete releases it.
        unsafe { esp_timer_delete(handle) };
        return Err(Error::Init("tick timer start failed"));
    }

    info!("hw_timer: tick @ {} us started", period_us);
    Ok(TickTimer { handle })
}

#[cfg(target_os = "espidf")]
impl Drop for TickTimer {
    fn drop(&mut self) {
        // SAFETY: `handle` is valid for the lifetime of `self`.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
        }
    }
}

/// Start calling `source.on_tick()` every `period_us` microseconds.
#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(source: &'static TickSource, period_us: u32) -> Result<TickTimer> {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    if period_us == 0 {
        return Err(Error::Init("tick period must be non-zero"));
    }

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let period = Duration::from_micros(u64::from(period_us));
    let thread = std::thread::Builder::new()
        .name("drive_tick".into())
        .spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                std::thread::sleep(period);
                source.on_tick();
            }
        })
        .map_err(|_| Error::Init("tick thread spawn failed"))?;

    info!("hw_timer(sim): tick @ {} us started", period_us);
    Ok(TickTimer {
        stop,
        thread: Some(thread),
    })
}

#[cfg(not(target_os = "espidf"))]
impl Drop for TickTimer {
    fn drop(&mut self) {
        self.stop.store(true, std::sync::atomic::Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
