//! Operator interrupt (Ctrl+C) handling.
//!
//! While armed, the SIGINT handler only flips an atomic flag; copy loops poll it between files
//! through the [`Interrupt`] trait. A second SIGINT, or any SIGINT while disarmed (e.g. while
//! waiting at a prompt), exits right away.

use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status used when the operator cancels a copy.
pub const CANCELLED_EXIT_CODE: i32 = 1;

pub trait Interrupt {
    fn is_requested(&self) -> bool;
}

impl Interrupt for AtomicBool {
    fn is_requested(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<F> Interrupt for F
where
    F: Fn() -> bool,
{
    fn is_requested(&self) -> bool {
        self()
    }
}

/// Never interrupted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Never;

impl Interrupt for Never {
    fn is_requested(&self) -> bool {
        false
    }
}

/// Process-wide flag set by the SIGINT handler.
#[derive(Debug)]
pub struct SigintFlag {
    requested: AtomicBool,
    armed: AtomicBool,
}

impl SigintFlag {
    /// Disarmed, the next SIGINT terminates the process instead of being recorded.
    pub fn set_armed(&self, armed: bool) {
        self.armed.store(armed, Ordering::SeqCst);
    }
}

impl Interrupt for SigintFlag {
    fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

static SIGINT: SigintFlag = SigintFlag {
    requested: AtomicBool::new(false),
    armed: AtomicBool::new(true),
};

extern "C" fn handle_sigint(_signum: libc::c_int) {
    let armed = SIGINT.armed.load(Ordering::SeqCst);
    if !armed || SIGINT.requested.swap(true, Ordering::SeqCst) {
        // only async-signal-safe calls allowed here
        unsafe { libc::_exit(CANCELLED_EXIT_CODE) };
    }
}

/// Installs the SIGINT handler and returns the flag it sets.
pub fn install() -> std::io::Result<&'static SigintFlag> {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handle_sigint as libc::sighandler_t;
        action.sa_flags = libc::SA_RESTART; // let the copy in flight finish
        libc::sigemptyset(&mut action.sa_mask as *mut libc::sigset_t);
        if libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut()) != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }
    Ok(&SIGINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn closures_and_flags_act_as_interrupts() {
        let calls = Cell::new(0);
        let after_two = || {
            calls.set(calls.get() + 1);
            calls.get() > 2
        };
        assert!(!after_two.is_requested());
        assert!(!after_two.is_requested());
        assert!(after_two.is_requested());

        let flag = AtomicBool::new(false);
        assert!(!flag.is_requested());
        flag.store(true, Ordering::SeqCst);
        assert!(flag.is_requested());
        assert!(!Never.is_requested());
    }
}
