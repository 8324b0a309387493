//! Dunion crash handler.
use std::{io::Write, panic::PanicHookInfo, process::exit, sync::atomic, thread};

use backtrace::Backtrace;

const BUG_REPORT_MSG: &str = "This is a bug in dunionc, please file a bug report with the output above";

/// The crash handler that the driver registers as the `panic` hook. It
/// ensures that only one thread reports a panic, it prints the panic message,
/// the location, and a backtrace.
///
/// # Registering the handler
/// ```ignore
/// std::panic::set_hook(Box::new(dunion_utils::crash::crash_handler));
/// ```
pub fn crash_handler(info: &PanicHookInfo) {
    static PANIC_ONCE: atomic::AtomicBool = atomic::AtomicBool::new(false);

    if !PANIC_ONCE.swap(true, atomic::Ordering::SeqCst) {
        let stderr = std::io::stderr();
        let mut stderr = stderr.lock();

        let _ = write!(&mut stderr, "Sorry :^(\nInternal Error");

        if let Some(s) = info.payload().downcast_ref::<&str>() {
            let _ = writeln!(&mut stderr, ": {s}\n");
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            let _ = writeln!(&mut stderr, ": {s}\n");
        } else {
            let _ = writeln!(&mut stderr, "\n");
        }

        if let Some(location) = info.location() {
            let _ = writeln!(
                &mut stderr,
                "Occurred at '{}:{}:{}'",
                location.file(),
                location.line(),
                location.column()
            );
        }

        let backtrace = Backtrace::new();

        if let Some(name) = thread::current().name() {
            let _ = writeln!(&mut stderr, "Backtrace for thread \"{name}\":\n{backtrace:?}");
        } else {
            let _ = writeln!(&mut stderr, "Backtrace:\n{backtrace:?}");
        }

        let _ = writeln!(&mut stderr, "{BUG_REPORT_MSG}");
    }

    exit(1);
}
