//! Seeded synthetic title rows.
//!
//! Used when no input file exists. The same seed and row count always give
//! the same table.

use crate::error::{AnalysisError, Result};
use crate::schema::{self, TitleType};
use crate::utils::{int_series, text_series};
use polars::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use tracing::debug;

const TYPE_WEIGHTS: [f64; 2] = [0.7, 0.3];

const DIRECTORS: [&str; 7] = [
    "John Doe",
    "Jane Smith",
    "Alex Johnson",
    "Unknown",
    "Chris Nolan",
    "Ridley Scott",
    "Unknown Director",
];
const DIRECTOR_WEIGHTS: [f64; 7] = [0.2, 0.2, 0.1, 0.3, 0.1, 0.05, 0.05];

const COUNTRIES: [&str; 10] = [
    "USA",
    "Canada",
    "UK",
    "Nigeria",
    "India",
    "France",
    "Japan",
    "Unknown",
    "Germany",
    "Australia",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const RATINGS: [&str; 11] = [
    "PG", "TV-MA", "R", "PG-13", "TV-14", "TV-PG", "TV-Y", "TV-Y7", "G", "NC-17", "UR",
];
const RATING_WEIGHTS: [f64; 11] = [0.1, 0.2, 0.1, 0.1, 0.15, 0.1, 0.05, 0.05, 0.05, 0.05, 0.05];

const GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "Action",
    "Thriller",
    "Documentaries",
    "International Movies",
    "Kids' TV",
    "Romantic Movies",
];

// Share of optional values left empty so cleaning has something to do
const MISSING_DIRECTOR: f64 = 0.05;
const MISSING_CAST: f64 = 0.04;
const MISSING_COUNTRY: f64 = 0.05;
const MISSING_DATE: f64 = 0.03;
const MISSING_RATING: f64 = 0.02;
const MISSING_DURATION: f64 = 0.02;

/// Generates a deterministic sample of title rows.
pub struct SyntheticGenerator {
    seed: u64,
    rows: usize,
}

impl SyntheticGenerator {
    pub fn new(seed: u64, rows: usize) -> Self {
        Self { seed, rows }
    }

    /// Build the sample as a DataFrame with all source columns.
    pub fn generate(&self) -> Result<DataFrame> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let type_dist = weighted(&TYPE_WEIGHTS)?;
        let director_dist = weighted(&DIRECTOR_WEIGHTS)?;
        let rating_dist = weighted(&RATING_WEIGHTS)?;

        let n = self.rows;
        let mut show_ids = Vec::with_capacity(n);
        let mut types = Vec::with_capacity(n);
        let mut titles = Vec::with_capacity(n);
        let mut directors = Vec::with_capacity(n);
        let mut casts = Vec::with_capacity(n);
        let mut countries = Vec::with_capacity(n);
        let mut dates = Vec::with_capacity(n);
        let mut release_years = Vec::with_capacity(n);
        let mut ratings = Vec::with_capacity(n);
        let mut durations = Vec::with_capacity(n);
        let mut genres = Vec::with_capacity(n);
        let mut descriptions = Vec::with_capacity(n);

        for i in 0..n {
            let title_type = TitleType::ALL[type_dist.sample(&mut rng)];
            let director = DIRECTORS[director_dist.sample(&mut rng)];
            let country = COUNTRIES[rng.gen_range(0..COUNTRIES.len())];
            let date = format!(
                "{} {}, {}",
                MONTHS[rng.gen_range(0..MONTHS.len())],
                rng.gen_range(1..28),
                rng.gen_range(2015..2023)
            );
            let release_year: i32 = rng.gen_range(1990..2023);
            let rating = RATINGS[rating_dist.sample(&mut rng)];
            let duration = match title_type {
                TitleType::Movie => format!("{} min", rng.gen_range(60..180)),
                TitleType::TvShow => match rng.gen_range(1..8) {
                    1 => "1 Season".to_string(),
                    seasons => format!("{} Seasons", seasons),
                },
            };
            let picked: Vec<&str> = GENRES.choose_multiple(&mut rng, 2).copied().collect();
            let listed_in = picked.join(schema::LIST_SEPARATOR);

            let lead = char::from(b'A' + (i % 26) as u8);
            let support = char::from(b'A' + ((i + 1) % 26) as u8);

            show_ids.push(Some(format!("s{}", i + 1)));
            types.push(Some(title_type.as_str().to_string()));
            titles.push(Some(format!("Title {}", i + 1)));
            directors.push(maybe(&mut rng, MISSING_DIRECTOR, director.to_string()));
            casts.push(maybe(
                &mut rng,
                MISSING_CAST,
                format!("Actor {}, Actor {}", lead, support),
            ));
            countries.push(maybe(&mut rng, MISSING_COUNTRY, country.to_string()));
            dates.push(maybe(&mut rng, MISSING_DATE, date));
            release_years.push(Some(release_year));
            // the first row keeps its rating so any sample survives cleaning
            let rating_value = maybe(&mut rng, MISSING_RATING, rating.to_string())
                .or_else(|| (i == 0).then(|| rating.to_string()));
            ratings.push(rating_value);
            durations.push(maybe(&mut rng, MISSING_DURATION, duration));
            descriptions.push(Some(format!(
                "A {} from {} mixing {}.",
                title_type.as_str().to_lowercase(),
                release_year,
                picked.join(" and ").to_lowercase()
            )));
            genres.push(Some(listed_in));
        }

        let df = DataFrame::new(vec![
            text_series(schema::SHOW_ID, show_ids).into(),
            text_series(schema::TYPE, types).into(),
            text_series(schema::TITLE, titles).into(),
            text_series(schema::DIRECTOR, directors).into(),
            text_series(schema::CAST, casts).into(),
            text_series(schema::COUNTRY, countries).into(),
            text_series(schema::DATE_ADDED, dates).into(),
            int_series(schema::RELEASE_YEAR, release_years).into(),
            text_series(schema::RATING, ratings).into(),
            text_series(schema::DURATION, durations).into(),
            text_series(schema::LISTED_IN, genres).into(),
            text_series(schema::DESCRIPTION, descriptions).into(),
        ])?;

        debug!("Generated {} synthetic rows with seed {}", n, self.seed);
        Ok(df)
    }
}

fn weighted(weights: &[f64]) -> Result<WeightedIndex<f64>> {
    WeightedIndex::new(weights)
        .map_err(|e| AnalysisError::Internal(format!("invalid sampling weights: {}", e)))
}

/// Return the value, or `None` with probability `missing_rate`.
fn maybe(rng: &mut StdRng, missing_rate: f64, value: String) -> Option<String> {
    if rng.gen_bool(missing_rate) {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::TitleCleaner;
    use crate::utils::{int_values, text_values};

    #[test]
    fn test_same_seed_same_rows() {
        let first = SyntheticGenerator::new(42, 100).generate().unwrap();
        let second = SyntheticGenerator::new(42, 100).generate().unwrap();
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn test_different_seed_different_rows() {
        let first = SyntheticGenerator::new(42, 100).generate().unwrap();
        let second = SyntheticGenerator::new(7, 100).generate().unwrap();
        assert!(!first.equals_missing(&second));
    }

    #[test]
    fn test_shape_and_identifiers() {
        let df = SyntheticGenerator::new(1, 30).generate().unwrap();
        assert_eq!(df.height(), 30);
        assert_eq!(df.width(), 12);

        let ids = text_values(&df, schema::SHOW_ID).unwrap();
        assert_eq!(ids[0].as_deref(), Some("s1"));
        assert_eq!(ids[29].as_deref(), Some("s30"));
    }

    #[test]
    fn test_values_stay_in_catalogue_ranges() {
        let df = SyntheticGenerator::new(3, 200).generate().unwrap();

        for t in text_values(&df, schema::TYPE).unwrap().into_iter().flatten() {
            assert!(TitleType::parse(&t).is_some());
        }
        for year in int_values(&df, schema::RELEASE_YEAR).unwrap().into_iter().flatten() {
            assert!((1990..2023).contains(&year));
        }
        for genres in text_values(&df, schema::LISTED_IN).unwrap().into_iter().flatten() {
            let parts: Vec<&str> = genres.split(schema::LIST_SEPARATOR).collect();
            assert_eq!(parts.len(), 2);
            assert_ne!(parts[0], parts[1]);
        }
    }

    #[test]
    fn test_single_row_sample_survives_cleaning() {
        for seed in 0..200 {
            let df = SyntheticGenerator::new(seed, 1).generate().unwrap();
            let (cleaned, _) = TitleCleaner.clean(df).unwrap();
            assert_eq!(cleaned.height(), 1, "seed {}", seed);
        }
    }

    #[test]
    fn test_some_optional_values_missing() {
        let df = SyntheticGenerator::new(42, 500).generate().unwrap();
        let director_nulls = df.column(schema::DIRECTOR).unwrap().null_count();
        assert!(director_nulls > 0);
        assert_eq!(df.column(schema::SHOW_ID).unwrap().null_count(), 0);
        assert_eq!(df.column(schema::TITLE).unwrap().null_count(), 0);
    }
}
