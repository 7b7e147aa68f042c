// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditional logging macros.
//!
//! With the `tracing` feature this re-exports `tracing::trace`. Without it the
//! macro compiles to dead code that still borrows every field value.

#[cfg(feature = "tracing")]
pub(crate) use tracing::trace;

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __strata_frame_fields {
    () => {};
    ($name:ident = ? $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_frame_fields!($($($rest)*)?);
    };
    ($name:ident = $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_frame_fields!($($($rest)*)?);
    };
    (? $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $crate::__strata_frame_fields!($($($rest)*)?);
    };
    ($message:literal $(, $arg:expr)* $(,)?) => {
        $(let _ = &$arg;)*
    };
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __strata_frame_trace {
    ($($event:tt)*) => {
        if false {
            $crate::__strata_frame_fields!($($event)*);
        }
    };
}

#[cfg(not(feature = "tracing"))]
pub(crate) use crate::__strata_frame_trace as trace;
