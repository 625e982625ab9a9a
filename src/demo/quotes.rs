//! Quote pool for the random-quote demo.

use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub static QUOTES: [Quote; 5] = [
    Quote { text: "HTML er kraftigere enn du tror.", author: "Web-utvikler" },
    Quote { text: "Mindre JavaScript, bedre ytelse.", author: "Performance Guru" },
    Quote { text: "HTMX gjør backend-utviklere lykkelige.", author: "Full-stack Dev" },
    Quote { text: "Hypermedia er fremtiden.", author: "Roy Fielding (kanskje)" },
    Quote { text: "SPAs er ikke alltid svaret.", author: "Pragmatisk utvikler" },
];

/// Pick a quote uniformly at random.
pub fn random_quote() -> &'static Quote {
    QUOTES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&QUOTES[0])
}
