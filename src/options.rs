// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Future options

use std::default::Default;

/// How a pending Future stores the reactions registered on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// Every registration is kept and notified in registration order
    Multicast,

    /// Only the latest registration is kept; registering again while the
    /// Future is pending replaces the previous one.
    Single,
}

/// Future options
#[derive(Debug, Clone)]
pub struct Options {
    pub name: Option<String>,
    pub subscription: Subscription,
}

impl Options {
    pub fn new() -> Options {
        Options {
            name: None,
            subscription: Subscription::Multicast,
        }
    }

    pub fn name(&mut self, name: String) -> &mut Options {
        self.name = Some(name);
        self
    }

    pub fn subscription(&mut self, subscription: Subscription) -> &mut Options {
        self.subscription = subscription;
        self
    }

    /// Options handed down to Futures derived from one carrying `self`.
    ///
    /// Names identify a single Future and are not inherited.
    pub(crate) fn derive(&self) -> Options {
        Options {
            name: None,
            subscription: self.subscription,
        }
    }
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}
