//! Basic usage example for `PooledList`.
//!
//! This example shows how a list grows through the capacity table, how swap removal reorders
//! items and how disposal hands the storage back to the shared pool.

use fast_list::{BufferPool, Dispose, DisposePolicy, PooledList};

struct Session {
    name: &'static str,
}

impl Dispose for Session {
    fn dispose(&mut self) {
        println!("Closing session {}", self.name);
    }
}

fn main() {
    let mut numbers = PooledList::new(4).expect("4 is a valid initial capacity");

    for value in 1..=20 {
        numbers
            .add(value)
            .expect("20 items are far below the largest table entry");
        println!(
            "Added {value:>2}: len = {:>2}, capacity = {:>2}",
            numbers.len(),
            numbers.capacity()
        );
    }

    numbers.remove_at(0).expect("list is live");
    println!("After removing index 0: {:?}", numbers.as_slice());

    numbers.dispose();
    println!(
        "Idle i32 buffers of size 31 after dispose: {}",
        BufferPool::retained::<i32>(31)
    );

    let mut sessions = PooledList::builder()
        .capacity(2)
        .dispose_policy(DisposePolicy::dispose_items())
        .build()
        .expect("2 is a valid initial capacity");

    for name in ["alpha", "beta", "gamma"] {
        sessions.add(Session { name }).expect("list is live");
    }

    // Every session is closed before the storage returns to the pool.
    sessions.dispose();
}
