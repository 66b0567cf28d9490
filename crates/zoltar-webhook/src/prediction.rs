//! Zoltar's prophecies.

use rand::seq::IndexedRandom;

const TEMPLATES: &[&str] = &[
    "{user}, you will soon outwit a great distraction.",
    "Zoltar says: chaos leads to clarity, {user}.",
    "{user}, beware the quiet moments, for they hold your fate.",
    "A bold choice will pay off, {user}. Trust it.",
    "Laughter brings fortune to your doorstep, {user}.",
    "{user}, chaos is your co-pilot today.",
    "Beware the muted mic, {user}. Your moment approaches.",
    "Fortune favors the brave... and the caffeinated, {user}.",
];

/// Pick a random prophecy addressed to `user`.
pub fn generate_prediction(user: &str) -> String {
    let template = TEMPLATES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(TEMPLATES[0]);
    template.replace("{user}", user)
}
