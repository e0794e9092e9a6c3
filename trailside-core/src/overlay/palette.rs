//! Difficulty colour palette for the trail path layer.

use std::collections::HashSet;

use crate::TechRating;
use crate::feature::DIFFICULTY_PROPERTY;
use crate::map::{Color, ColorMatch};

use super::OverlayError;

/// Colours for the five easiest ratings, easiest first.
pub const DIFFICULTY_COLORS: [Color; 5] = [
    Color::MAGENTA,
    Color::BLUE,
    Color::ORANGE,
    Color::RED,
    Color::BLACK,
];

/// Colour for trails whose difficulty is unknown or beyond the palette.
pub const UNKNOWN_DIFFICULTY_COLOR: Color = Color::DARK_GRAY;

/// Build the `difficulty-level` colour lookup from the service's ratings.
///
/// Ratings are ordered by level (ties keep service order) and the first five
/// distinct codes take [`DIFFICULTY_COLORS`] in turn. A repeated code keeps
/// its lowest-level colour.
///
/// # Errors
/// [`OverlayError::InsufficientTechRatings`] when fewer than five distinct
/// codes are known.
///
/// # Examples
/// ```
/// use trailside_core::TechRating;
/// use trailside_core::map::Color;
/// use trailside_core::overlay::difficulty_palette;
///
/// let ratings = (1..=5)
///     .rev()
///     .map(|level| TechRating::new(level.to_string(), format!("L{level}"), level))
///     .collect();
/// let palette = difficulty_palette(ratings).expect("five ratings");
/// assert_eq!(palette.cases()[0], ("1".to_string(), Color::MAGENTA));
/// ```
pub fn difficulty_palette(mut ratings: Vec<TechRating>) -> Result<ColorMatch, OverlayError> {
    ratings.sort_by_key(|rating| rating.level);
    let mut seen = HashSet::new();
    ratings.retain(|rating| seen.insert(rating.code.clone()));
    if ratings.len() < DIFFICULTY_COLORS.len() {
        return Err(OverlayError::InsufficientTechRatings {
            expected: DIFFICULTY_COLORS.len(),
            found: ratings.len(),
        });
    }
    Ok(ratings.into_iter().zip(DIFFICULTY_COLORS).fold(
        ColorMatch::new(DIFFICULTY_PROPERTY, UNKNOWN_DIFFICULTY_COLOR),
        |palette, (rating, color)| palette.case(rating.code, color),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_tech_ratings;
    use rstest::rstest;

    #[rstest]
    fn ratings_are_coloured_by_level() {
        let palette = difficulty_palette(sample_tech_ratings()).expect("five ratings");

        let codes: Vec<&str> = palette.cases().iter().map(|(code, _)| code.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(palette.cases()[2].1, Color::ORANGE);
        assert_eq!(palette.fallback(), Color::DARK_GRAY);
        assert_eq!(palette.property(), DIFFICULTY_PROPERTY);
    }

    #[rstest]
    fn ratings_beyond_five_fall_back() {
        let mut ratings = sample_tech_ratings();
        ratings.push(TechRating::new("6", "Impassable", 6));

        let palette = difficulty_palette(ratings).expect("six ratings");

        assert_eq!(palette.cases().len(), 5);
        assert!(palette.cases().iter().all(|(code, _)| code != "6"));
    }

    #[rstest]
    fn repeated_code_keeps_its_easiest_colour() {
        let mut ratings = sample_tech_ratings();
        ratings.insert(0, TechRating::new("4", "Duplicate", 0));
        ratings.push(TechRating::new("6", "Impassable", 6));

        let palette = difficulty_palette(ratings).expect("five distinct codes");

        let codes: Vec<&str> = palette.cases().iter().map(|(code, _)| code.as_str()).collect();
        assert_eq!(codes, vec!["4", "1", "2", "3", "5"]);
        assert_eq!(palette.cases()[0].1, Color::MAGENTA);
    }

    #[rstest]
    fn repeated_codes_do_not_count_towards_five() {
        let mut ratings: Vec<TechRating> = sample_tech_ratings().into_iter().take(4).collect();
        ratings.push(TechRating::new("1", "Duplicate", 9));

        let err = difficulty_palette(ratings).expect_err("only four distinct codes");

        assert!(matches!(
            err,
            OverlayError::InsufficientTechRatings {
                expected: 5,
                found: 4
            }
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn too_few_ratings_fail(#[case] count: usize) {
        let ratings = sample_tech_ratings().into_iter().take(count).collect();

        let err = difficulty_palette(ratings).expect_err("palette needs five ratings");

        assert!(matches!(
            err,
            OverlayError::InsufficientTechRatings { expected: 5, found } if found == count
        ));
    }
}
