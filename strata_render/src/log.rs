// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditional logging macros.
//!
//! With the `tracing` feature these re-export the `tracing` macros. Without it
//! they compile to dead code that still borrows every field value, so bindings
//! that only feed a log event stay used.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

/// Borrow each field value and format argument of a `tracing`-style event.
#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __strata_render_fields {
    () => {};
    ($name:ident = % $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_render_fields!($($($rest)*)?);
    };
    ($name:ident = ? $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_render_fields!($($($rest)*)?);
    };
    ($name:ident = $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_render_fields!($($($rest)*)?);
    };
    (% $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_render_fields!($($($rest)*)?);
    };
    (? $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_render_fields!($($($rest)*)?);
    };
    ($message:literal $(, $arg:expr)* $(,)?) => {
        $(let _ = &$arg;)*
    };
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __strata_render_event {
    ($($event:tt)*) => {
        if false {
            $crate::__strata_render_fields!($($event)*);
        }
    };
}

#[cfg(not(feature = "tracing"))]
pub(crate) use crate::{
    __strata_render_event as debug, __strata_render_event as trace,
    __strata_render_event as warn,
};
