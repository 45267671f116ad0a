//!
//! Console reporting for bootstrap runs.
//!
//! Every provisioning decision, deployment, and registry write emits one
//! line so an operator can follow (and later reconstruct) what a run did on
//! a given network.
//!

use derive_more::Display;

///
/// Level
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Ord, PartialOrd)]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

#[macro_export]
macro_rules! log {
    ($level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        let level = $crate::log::Level::$level;
        let message = format!($fmt $(, $arg)*);

        let (color, reset) = match level {
            $crate::log::Level::Ok    => ("\x1b[32m", "\x1b[0m"),
            $crate::log::Level::Info  => ("\x1b[34m", "\x1b[0m"),
            $crate::log::Level::Warn  => ("\x1b[33m", "\x1b[0m"),
            $crate::log::Level::Error => ("\x1b[31m", "\x1b[0m"),
            $crate::log::Level::Debug => ("", ""),
        };

        let label = format!("{color}{:^5}{reset}", level.to_string().to_uppercase());
        println!("{label}| {message}");
    }};
}
