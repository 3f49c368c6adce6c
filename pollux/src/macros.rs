#[macro_export]
macro_rules! expect {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(t) => t,
            Err(why) => {
                panic!("{}: {}", $msg, why);
            }
        }
    };
}

// Everything logs under the `pollux` target

#[macro_export]
macro_rules! pollux_error {
    ($($arg:tt)+) => {
        $crate::log::error!(target: "pollux", $($arg)+)
    };
}

#[macro_export]
macro_rules! pollux_warn {
    ($($arg:tt)+) => {
        $crate::log::warn!(target: "pollux", $($arg)+)
    };
}

#[macro_export]
macro_rules! pollux_info {
    ($($arg:tt)+) => {
        $crate::log::info!(target: "pollux", $($arg)+)
    };
}

#[macro_export]
macro_rules! pollux_debug {
    ($($arg:tt)+) => {
        $crate::log::debug!(target: "pollux", $($arg)+)
    };
}

#[macro_export]
macro_rules! pollux_trace {
    ($($arg:tt)+) => {
        $crate::log::trace!(target: "pollux", $($arg)+)
    };
}
