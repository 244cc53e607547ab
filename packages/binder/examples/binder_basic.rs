//! Basic usage example for `Binder`.
//!
//! This example binds several values to a few keys, unbinds one of them and finally disposes
//! the binder, which disposes every value that is still bound.

use binder::{Binder, Dispose, DisposePolicy, TableCapacityStrategy};

struct Subscription {
    topic: &'static str,
    id: u32,
}

impl Dispose for Subscription {
    fn dispose(&mut self) {
        println!("Cancelling subscription {} on {}", self.id, self.topic);
    }
}

fn main() {
    let mut subscriptions = Binder::<&str, Subscription>::builder()
        .strategy(TableCapacityStrategy::shared())
        .capacity(4)
        .dispose_policy(DisposePolicy::dispose_items())
        .build()
        .expect("strategy is set and 4 keys fit in the capacity table");

    for (id, topic) in [(1, "news"), (2, "news"), (3, "sports"), (4, "weather")] {
        subscriptions
            .bind(topic)
            .expect("binder is live")
            .to(Subscription { topic, id })
            .expect("binding is live");
    }

    let news = subscriptions
        .get_binding("news")
        .expect("binder is live")
        .expect("news was bound above");
    println!("'news' has {} subscriptions", news.len());

    println!("Unbinding 'sports'");
    subscriptions.unbind("sports").expect("binder is live");

    println!("Disposing the binder with {} keys", subscriptions.len());
    subscriptions.dispose();
}
