// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate coio_future;
extern crate env_logger;

use coio_future::{all, Error, Future, Schedule, Scheduler};

fn main() {
    env_logger::init();

    let r: Future<f64> = Future::new(|p| {
        // Settle from a later turn, the way a timer callback would
        Scheduler::current().schedule(Box::new(move || {
            if true {
                p.resolve(Ok(1.23))
            } else {
                p.reject(Error::from("Final error"))
            }
        }));
        Ok(())
    });

    let r = r.then_else(|res| {
                            assert_eq!(res, 1.23);
                            Ok(34)
                        },
                        |err| {
                            assert_eq!(err, Error::from("Final error"));
                            Ok(35)
                        })
             .finally(|| {
                 println!("settled");
                 Ok(())
             });

    let total = all(vec![r, Future::resolved(8)]).then(|v| Ok(v.iter().sum::<i32>()));

    assert_eq!(total.sync(), Some(Ok(42)));
    println!("{}", total);
}
