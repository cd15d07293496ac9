//! `critical-section` implementation for ESP-IDF.
//!
//! The tick timer callback runs in the esp_timer task and the control
//! loop in the main task, so a process-wide mutex is enough to make the
//! tick source's critical sections mutually exclusive.  The restore token
//! records whether the calling task already held the lock, so nested
//! sections only release on the way out of the outermost one.

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

use critical_section::RawRestoreState;

static TICK_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static HOLDING: Cell<bool> = const { Cell::new(false) };
    static GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

struct EspCriticalSection;
critical_section::set_impl!(EspCriticalSection);

unsafe impl critical_section::Impl for EspCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        if HOLDING.get() {
            return true;
        }
        let guard = TICK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        GUARD.with_borrow_mut(|held| *held = Some(guard));
        HOLDING.set(true);
        false
    }

    unsafe fn release(nested: RawRestoreState) {
        if !nested {
            HOLDING.set(false);
            GUARD.with_borrow_mut(|held| *held = None);
        }
    }
}
