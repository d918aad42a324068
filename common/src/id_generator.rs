use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Swift", "Brave", "Clever", "Mighty", "Silent", "Golden", "Wild", "Noble",
    "Fierce", "Gentle", "Quick", "Wise", "Bold", "Proud", "Cunning", "Sly",
];

const NOUNS: &[&str] = &[
    "Falcon", "Bear", "Tiger", "Wolf", "Eagle", "Dragon", "Lion", "Panther",
    "Hawk", "Fox", "Raven", "Cobra", "Shark", "Phoenix", "Lynx", "Viper",
];

/// A fresh relay room name such as `swift-falcon-42`, safe to put in a URL
/// query without escaping.
pub fn generate_room_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let suffix: u16 = rng.random_range(0..100);
    format!("{}-{}-{}", adjective.to_lowercase(), noun.to_lowercase(), suffix)
}
