// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deferred values settled at most once
//!
//! A `Future` is a shared handle to a value that is either still pending or
//! has been fulfilled or rejected for good. Reactions registered with
//! `then`, `catch` and `finally` always run through a `Schedule`, never inside
//! the call that registered them or the call that settled the Future.

// Most parts of this module use a certain pattern to describe template parameters:
//
// T => The value a Future is fulfilled with
// E => The reason a Future is rejected with
// U => The value of a Future derived from the current one
// R => Whatever a handler returns, turned into a `Resolution` of U or T

mod all;
mod cell;
mod future;
mod promise;
mod resolve;

pub use self::cell::Status;
pub use self::future::*;
pub use self::promise::*;
pub use self::resolve::{IntoResolution, Resolution};

pub(crate) use self::all::join;

use crate::error::Error;

/// Anything that can report its eventual outcome to a `Promise`
///
/// Resolving a Future with a `Thenable` does not fulfill it with the thenable
/// itself; the Future follows whatever the thenable settles to instead.
/// `Future` implements this, and so can any foreign deferred type.
pub trait Thenable<T, E> {
    /// Arrange for `promise` to be settled with this value's outcome
    fn register(&self, promise: Promise<T, E>);
}

/// Create a pending Future together with the `Promise` settling it
pub fn make<T, E>() -> (Promise<T, E>, Future<T, E>)
    where T: Clone + 'static,
          E: Clone + From<Error> + 'static
{
    crate::Builder::new().pending()
}
