//! Capital-city question generation.

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::models::{
    country::CountryRecord,
    game::{Question, QuestionKind, OPTION_COUNT},
};

/// Continent labels offered to players.
pub const CONTINENTS: [&str; 6] = [
    "Africa",
    "Asia",
    "Europe",
    "North America",
    "South America",
    "Oceania",
];

/// Maps a player-facing continent label to the catalog's region label.
///
/// The catalog only knows "Americas", so both American continents draw from one pool.
/// Labels outside the known set are used as region names unchanged.
pub fn region_for(continent: &str) -> &str {
    match continent {
        "North America" | "South America" => "Americas",
        other => other,
    }
}

/// Builds a question about a random eligible country, or `None` when the filtered pool
/// cannot supply one target and three distinct distractor capitals.
pub fn generate_question<R>(
    countries: &[CountryRecord],
    continent: Option<&str>,
    rng: &mut R,
) -> Option<Question>
where
    R: Rng + ?Sized,
{
    let region = continent.map(region_for);
    let eligible: Vec<&CountryRecord> = countries
        .iter()
        .filter(|country| country.is_quiz_eligible())
        .filter(|country| region.map_or(true, |region| country.region == region))
        .collect();

    if eligible.len() < OPTION_COUNT {
        return None;
    }

    let target_index = rng.gen_range(0..eligible.len());
    let target = eligible[target_index];
    let correct_answer = target.capital.clone()?;

    let mut seen = HashSet::new();
    seen.insert(correct_answer.as_str());
    let mut distractors: Vec<&str> = eligible
        .iter()
        .enumerate()
        .filter(|(index, country)| {
            *index != target_index && (target.cca3.is_empty() || country.cca3 != target.cca3)
        })
        .filter_map(|(_, country)| country.capital.as_deref())
        .filter(|capital| seen.insert(*capital))
        .collect();

    if distractors.len() < OPTION_COUNT - 1 {
        return None;
    }
    distractors.shuffle(rng);

    let mut options: Vec<String> = distractors
        .into_iter()
        .take(OPTION_COUNT - 1)
        .map(str::to_string)
        .collect();
    options.push(correct_answer.clone());
    options.shuffle(rng);

    Some(Question {
        country: target.clone(),
        options,
        correct_answer,
        kind: QuestionKind::Capital,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::country::fallback_countries;
    use rand::{rngs::StdRng, SeedableRng};

    fn assert_well_formed(question: &Question) {
        assert_eq!(question.options.len(), OPTION_COUNT);
        assert!(question.options.contains(&question.correct_answer));
        let distinct: HashSet<&String> = question.options.iter().collect();
        assert_eq!(distinct.len(), OPTION_COUNT);
        assert_eq!(question.country.capital.as_ref(), Some(&question.correct_answer));
    }

    #[test]
    fn world_questions_are_always_well_formed() {
        let countries = fallback_countries();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let question = generate_question(&countries, None, &mut rng).unwrap();
            assert_well_formed(&question);
        }
    }

    #[test]
    fn continent_filter_limits_the_pool() {
        let mut countries = fallback_countries();
        let mut spain = countries[0].clone();
        spain.name.common = "Spain".to_string();
        spain.capital = Some("Madrid".to_string());
        spain.cca3 = "ESP".to_string();
        countries.push(spain);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let question = generate_question(&countries, Some("Europe"), &mut rng).unwrap();
            assert_eq!(question.country.region, "Europe");
            for option in &question.options {
                let owner = countries
                    .iter()
                    .find(|c| c.capital.as_ref() == Some(option))
                    .unwrap();
                assert_eq!(owner.region, "Europe");
            }
        }
    }

    #[test]
    fn small_pools_yield_nothing() {
        let countries = fallback_countries();
        let mut rng = StdRng::seed_from_u64(3);
        // the fallback set has at most three countries per region
        for continent in CONTINENTS {
            assert!(generate_question(&countries, Some(continent), &mut rng).is_none());
        }
        assert!(generate_question(&countries, Some("Antarctica"), &mut rng).is_none());
        assert!(generate_question(&countries[..3], None, &mut rng).is_none());
    }

    #[test]
    fn both_americas_share_one_pool() {
        assert_eq!(region_for("North America"), "Americas");
        assert_eq!(region_for("South America"), "Americas");
        assert_eq!(region_for("Oceania"), "Oceania");

        let countries = fallback_countries();
        let mut north = StdRng::seed_from_u64(99);
        let mut south = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                generate_question(&countries, Some("North America"), &mut north),
                generate_question(&countries, Some("South America"), &mut south)
            );
        }
    }

    #[test]
    fn duplicate_capitals_are_offered_once() {
        let mut countries = fallback_countries()[..4].to_vec();
        let mut twin = countries[1].clone();
        twin.cca3 = "TWN".to_string();
        twin.name.common = "Twin".to_string();
        countries.push(twin);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let question = generate_question(&countries, None, &mut rng).unwrap();
            assert_well_formed(&question);
        }
    }

    #[test]
    fn pool_without_three_distinct_distractors_yields_nothing() {
        let base = fallback_countries().remove(0);
        let countries: Vec<CountryRecord> = (0..5)
            .map(|i| {
                let mut copy = base.clone();
                copy.cca3 = format!("C{}", i);
                copy
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_question(&countries, None, &mut rng).is_none());
    }

    #[test]
    fn correct_answer_position_is_uniform() {
        let countries = fallback_countries();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut positions = [0usize; OPTION_COUNT];
        let trials = 8000;
        for _ in 0..trials {
            let question = generate_question(&countries, None, &mut rng).unwrap();
            let position = question
                .options
                .iter()
                .position(|option| option == &question.correct_answer)
                .unwrap();
            positions[position] += 1;
        }
        for count in positions {
            assert!((1700..=2300).contains(&count), "positions: {:?}", positions);
        }
    }
}
