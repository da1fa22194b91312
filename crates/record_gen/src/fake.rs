//! Fake data generation helpers.
//!
//! Wraps a caller-supplied RNG and a reference "now" so every value,
//! including timestamps and identifiers, is reproducible under a seed.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Texts shorter than this are built from words instead of sentences
const SENTENCE_MODE_MIN_CHARS: usize = 25;

/// Fake data generator with deterministic RNG
pub struct FakeData<R: Rng> {
    rng: R,
    now: NaiveDateTime,
}

impl<R: Rng> FakeData<R> {
    /// Create a provider anchored at the local wall clock
    pub fn new(rng: R) -> Self {
        Self::with_now(rng, local_now())
    }

    /// Create a provider anchored at a fixed "now"
    pub fn with_now(rng: R, now: NaiveDateTime) -> Self {
        Self { rng, now }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    /// Generate a random integer in a closed range
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Generate a uniform decimal in a closed range, rounded to `places` digits
    pub fn decimal(&mut self, min: f64, max: f64, places: u32) -> f64 {
        let value = self.rng.random_range(min..=max);
        round_to(value, places)
    }

    /// Sample a list length from a normal distribution.
    ///
    /// The sample is rounded to the nearest integer and negative results
    /// collapse to zero. Invalid parameters fall back to the mean.
    pub fn normal_count(&mut self, mean: f64, std_dev: f64) -> usize {
        let value = match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        };
        value.round().max(0.0) as usize
    }

    /// Pick a random element from a slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    /// Generate a version 4 UUID from the RNG
    pub fn uuid(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string()
    }

    /// Generate a timestamp between the start of the current year and now
    pub fn datetime_this_year(&mut self) -> NaiveDateTime {
        let start = year_start(self.now);
        self.datetime_between(start, self.now)
    }

    /// Generate a timestamp between `anchor` and now.
    ///
    /// An anchor in the future yields the anchor itself.
    pub fn datetime_after(&mut self, anchor: NaiveDateTime) -> NaiveDateTime {
        let end = if self.now > anchor { self.now } else { anchor };
        self.datetime_between(anchor, end)
    }

    /// Generate a timestamp uniformly in `[start, end]`
    pub fn datetime_between(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = (end - start).num_seconds().max(0);
        start + Duration::seconds(self.rng.random_range(0..=span))
    }

    /// Shift `anchor` forward by a random number of minutes and seconds
    pub fn offset(
        &mut self,
        anchor: NaiveDateTime,
        minutes: (i64, i64),
        seconds: (i64, i64),
    ) -> NaiveDateTime {
        let m = self.int_range(minutes.0, minutes.1);
        let s = self.int_range(seconds.0, seconds.1);
        offset_by(anchor, m, s)
    }

    /// Generate a single lorem word
    pub fn word(&mut self) -> String {
        Word().fake_with_rng::<String, _>(&mut self.rng)
    }

    /// Generate prose no longer than `max_chars` characters
    pub fn text(&mut self, max_chars: usize) -> String {
        if max_chars < SENTENCE_MODE_MIN_CHARS {
            return self.words_within(max_chars);
        }

        let mut text = String::new();
        loop {
            let sentence: String = Sentence(3..10).fake_with_rng(&mut self.rng);
            let needed = if text.is_empty() {
                sentence.len()
            } else {
                text.len() + 1 + sentence.len()
            };
            if needed > max_chars {
                break;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&sentence);
        }

        if text.is_empty() {
            self.words_within(max_chars)
        } else {
            text
        }
    }

    /// Build a capitalized, period-terminated run of words within `max_chars`
    fn words_within(&mut self, max_chars: usize) -> String {
        let budget = max_chars.saturating_sub(1);
        let mut text = String::new();
        loop {
            let word = self.word();
            let extra = if text.is_empty() {
                word.len()
            } else {
                word.len() + 1
            };
            if text.len() + extra > budget {
                if text.is_empty() {
                    text = word.chars().take(budget.max(1)).collect();
                }
                break;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&word);
        }

        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        if text.len() < max_chars {
            text.push('.');
        }
        text
    }
}

/// Current local time truncated to whole seconds
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Midnight on January 1st of the year containing `at`
pub fn year_start(at: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(at.year(), 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(at)
}

/// `anchor` plus whole minutes and seconds
pub fn offset_by(anchor: NaiveDateTime, minutes: i64, seconds: i64) -> NaiveDateTime {
    anchor + Duration::minutes(minutes) + Duration::seconds(seconds)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
