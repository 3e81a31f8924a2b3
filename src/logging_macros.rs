//! Logging macros that prefix each event with `[file:module:line]`.
//!
//! Useful where the log line alone would not say which of several call
//! sites produced it, e.g. store requests issued from many UI paths.

#[doc(hidden)]
#[macro_export]
macro_rules! __trace_with_context {
    ($level:ident, $($arg:tt)*) => {
        tracing::$level!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => { $crate::__trace_with_context!(debug, $($arg)*) };
}

#[macro_export]
macro_rules! trace_info {
    ($($arg:tt)*) => { $crate::__trace_with_context!(info, $($arg)*) };
}

#[macro_export]
macro_rules! trace_warn {
    ($($arg:tt)*) => { $crate::__trace_with_context!(warn, $($arg)*) };
}

#[macro_export]
macro_rules! trace_error {
    ($($arg:tt)*) => { $crate::__trace_with_context!(error, $($arg)*) };
}
