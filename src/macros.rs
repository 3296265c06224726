// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Expands to the fully qualified name of the enclosing function, as a `&'static str`.
///
/// Inside a closure the name ends with `::{{closure}}`; the logger strips that when rendering.
///
/// # Examples
///
/// ```
/// fn handler() -> &'static str {
///     logsplit::function_name!()
/// }
///
/// assert!(handler().ends_with("::handler"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Log a formatted line at the given severity, attributed to the enclosing function.
///
/// Takes the logger, a `&Context`, the severity and `format_args!`-style arguments. Evaluates to
/// the `Result` of [`Logger::log_at`](crate::Logger::log_at).
///
/// # Examples
///
/// ```
/// use logsplit::Context;
/// use logsplit::Logger;
/// use logsplit::Severity;
/// use logsplit::append::Buffer;
///
/// fn serve(logger: &Logger, ctx: &Context) {
///     logsplit::log!(logger, ctx, Severity::Info, "served {} bytes", 512).unwrap();
/// }
///
/// let out = Buffer::default();
/// let (logger, ctx) = Logger::builder()
///     .out(out.clone())
///     .disable_timestamps()
///     .build(&Context::background());
///
/// serve(&logger, &ctx);
/// assert_eq!(out.contents(), "INFO serve served 512 bytes\n");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $ctx:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_at(
            $ctx,
            $severity,
            $crate::function_name!(),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Log a formatted standard line. See [`log!`](crate::log!).
#[macro_export]
macro_rules! standard {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::Severity::Standard, $($arg)+)
    };
}

/// Log a formatted critical line. See [`log!`](crate::log!).
#[macro_export]
macro_rules! critical {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::Severity::Critical, $($arg)+)
    };
}

/// Log a formatted error line. See [`log!`](crate::log!).
#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a formatted warning line. See [`log!`](crate::log!).
#[macro_export]
macro_rules! warning {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log a formatted info line. See [`log!`](crate::log!).
#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a formatted debug line. See [`log!`](crate::log!).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::Severity::Debug, $($arg)+)
    };
}
