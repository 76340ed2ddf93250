//! Experience → level progression.
//!
//! Level `n` is reached at `50 * n * (n + 1)` experience, so the thresholds run
//! 0, 100, 300, 600, 1000, ...

/// Level reached with the given experience:
/// `floor((sqrt(2500 + 200 * experience) - 50) / 100)`.
pub fn level_for_experience(experience: i32) -> i32 {
    let experience = u64::try_from(experience).unwrap_or(0);
    let root = (2_500 + 200 * experience).isqrt();
    // `root >= 50` always holds because the radicand is at least 2500.
    let level = (root - 50) / 100;
    i32::try_from(level).unwrap_or(i32::MAX)
}

/// Experience still missing before the next level:
/// `50 * (level + 1) * (level + 2) - experience`.
pub fn experience_until_next_level(level: i32, experience: i32) -> i32 {
    let level = i64::from(level);
    let remaining = 50 * (level + 1) * (level + 2) - i64::from(experience);
    i32::try_from(remaining).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{experience_until_next_level, level_for_experience};
    use crate::model::player::MAX_EXPERIENCE;

    fn reference_level(experience: i32) -> i32 {
        ((((2_500.0 + 200.0 * f64::from(experience)).sqrt()) - 50.0) / 100.0).floor() as i32
    }

    #[test]
    fn thresholds_land_on_exact_levels() {
        assert_eq!(level_for_experience(0), 0);
        assert_eq!(level_for_experience(99), 0);
        assert_eq!(level_for_experience(100), 1);
        assert_eq!(level_for_experience(299), 1);
        assert_eq!(level_for_experience(300), 2);
        assert_eq!(level_for_experience(600), 3);
        assert_eq!(level_for_experience(1_000), 4);
    }

    #[test]
    fn remaining_experience_examples() {
        assert_eq!(experience_until_next_level(0, 0), 100);
        assert_eq!(experience_until_next_level(1, 100), 200);
        assert_eq!(experience_until_next_level(level_for_experience(500), 500), 100);
    }

    #[test]
    fn matches_float_formula_across_the_range() {
        let mut experience = 0;
        while experience <= MAX_EXPERIENCE {
            let level = level_for_experience(experience);
            assert_eq!(level, reference_level(experience), "experience {experience}");

            let remaining = experience_until_next_level(level, experience);
            assert!(remaining > 0, "experience {experience}");
            assert!(level_for_experience(experience + remaining) == level + 1);

            experience += 997;
        }

        let top = level_for_experience(MAX_EXPERIENCE);
        assert_eq!(top, reference_level(MAX_EXPERIENCE));
        assert!(experience_until_next_level(top, MAX_EXPERIENCE) >= 0);
    }
}
