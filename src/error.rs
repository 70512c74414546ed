// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors raised by the Future machinery itself

use std::any::Any;

use thiserror::Error;

/// Reasons a Future may be rejected without a user supplied error.
///
/// Custom reason types take part in resolution by implementing `From<Error>`,
/// which is how a chaining cycle or a panicking handler reaches them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A Future was resolved with itself
    #[error("chaining cycle detected for future")]
    ChainingCycle,

    /// An executor or a handler panicked
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// A plain rejection reason
    #[error("{0}")]
    Rejected(String),
}

impl Error {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Error {
        let msg = match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_owned(),
            Err(payload) => match payload.downcast::<String>() {
                Ok(s) => *s,
                Err(..) => "Box<Any>".to_owned(),
            },
        };

        Error::Panicked(msg)
    }
}

impl<'a> From<&'a str> for Error {
    fn from(reason: &'a str) -> Error {
        Error::Rejected(reason.to_owned())
    }
}

impl From<String> for Error {
    fn from(reason: String) -> Error {
        Error::Rejected(reason)
    }
}
