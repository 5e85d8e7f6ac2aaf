use rand::seq::IndexedRandom;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bogdan", "Carmen", "Dmytro", "Elena", "Farid", "Grace", "Hiro", "Iryna", "James",
    "Kateryna", "Liam", "Maria", "Nikolai", "Olena", "Pablo", "Quinn", "Roman", "Sofia", "Taras",
    "Uma", "Viktor", "Wendy", "Yuliia", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Bondarenko", "Chen", "Davis", "Evans", "Fischer", "Garcia", "Hoffman", "Ivanenko",
    "Johnson", "Kovalenko", "Lopez", "Melnyk", "Nakamura", "Olsen", "Petrenko", "Quintero",
    "Rossi", "Shevchenko", "Tkachenko", "Underwood", "Vasquez", "Walker", "Young", "Zimmerman",
];

/// Random "First Last" display name
pub fn random_display_name() -> String {
    let mut rng = rand::rng();
    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Guest");
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("User");
    format!("{} {}", first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_shape() {
        for _ in 0..50 {
            let name = random_display_name();
            let (first, last) = name.split_once(' ').unwrap();
            assert!(FIRST_NAMES.contains(&first));
            assert!(LAST_NAMES.contains(&last));
        }
    }
}
