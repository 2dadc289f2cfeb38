//! Learning-path classifier: cumulative question count → proficiency tier.

/// Tiers ordered ascending by minimum count. The classifier applies
/// "last satisfied wins", so the table must stay sorted by minimum.
pub const LEARNING_PATH_TIERS: &[(&str, usize)] = &[
    ("Beginner", 0),
    ("Intermediate", 5),
    ("Advanced", 15),
    ("Expert", 30),
];

/// Tier whose minimum is the largest not exceeding `count`.
///
/// The thresholds act as an inclusive staircase: a count of 5 is already
/// Intermediate, 30 or more is Expert, and 0 is Beginner.
pub fn tier_for(count: usize) -> &'static str {
    let mut tier = "Beginner";
    for (name, minimum) in LEARNING_PATH_TIERS {
        if count >= *minimum {
            tier = name;
        }
    }
    tier
}
