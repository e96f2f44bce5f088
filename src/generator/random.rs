//! Randomness source for the generator
//!
//! The generator never touches an RNG directly. Everything random goes
//! through [`RandomSource`], so tests can seed it and callers can swap in
//! their own source.

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Letters used for unformatted strings
const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const FIRST_NAMES: &[&str] = &[
    "amy", "ben", "carla", "dev", "elena", "farid", "grace", "hiro", "isla", "jonas", "kavya",
    "liam", "maya", "noah", "olga", "priya", "quinn", "ravi", "sofia", "tom",
];
const LAST_NAMES: &[&str] = &[
    "adams", "brown", "chen", "diaz", "evans", "fischer", "gupta", "hall", "iyer", "jones",
    "khan", "lopez", "miller", "nair", "owens", "patel", "reed", "smith", "tanaka", "walker",
];
const EMAIL_HOSTS: &[&str] = &["example", "mail", "inbox", "post", "webmail"];
const EMAIL_TLDS: &[&str] = &["com", "net", "org", "io", "dev"];

/// 2000-01-01T00:00:00Z
const DATE_RANGE_START_MS: i64 = 946_684_800_000;
/// 2035-12-31T23:59:59.999Z
const DATE_RANGE_END_MS: i64 = 2_082_758_399_999;

/// Source of every random decision the generator makes.
pub trait RandomSource {
    /// Uniform integer in `[lo, hi]`. Callers guarantee `lo <= hi`.
    fn int_in_range(&mut self, lo: i64, hi: i64) -> i64;

    /// Uniform float in `[lo, hi]`. Callers guarantee finite `lo <= hi`.
    fn float_in_range(&mut self, lo: f64, hi: f64) -> f64;

    fn boolean(&mut self) -> bool;

    /// Uniform index in `[0, len)`. Callers guarantee `len > 0`.
    fn index(&mut self, len: usize) -> usize;

    /// ASCII letters, exactly `len` of them.
    fn alpha(&mut self, len: usize) -> String;

    /// A plausible ASCII email address.
    fn email(&mut self) -> String;

    /// `+` followed by 11 to 13 digits.
    fn phone_number(&mut self) -> String;

    fn date_time(&mut self) -> DateTime<Utc>;

    /// A random (version 4) UUID.
    fn uuid(&mut self) -> Uuid;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible source: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RngSource<R> {
    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.rng.gen_range(0..options.len())]
    }

    fn digits(&mut self, count: usize) -> String {
        (0..count)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn int_in_range(&mut self, lo: i64, hi: i64) -> i64 {
        self.rng.gen_range(lo..=hi)
    }

    fn float_in_range(&mut self, lo: f64, hi: f64) -> f64 {
        if lo == hi {
            return lo;
        }
        let unit: f64 = self.rng.gen();
        // `hi - lo` may be infinite; interpolate between the bounds instead.
        (lo * (1.0 - unit) + hi * unit).clamp(lo, hi)
    }

    fn boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn alpha(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(ALPHA[self.rng.gen_range(0..ALPHA.len())]))
            .collect()
    }

    fn email(&mut self) -> String {
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let host = self.pick(EMAIL_HOSTS);
        let tld = self.pick(EMAIL_TLDS);
        let suffix: u16 = self.rng.gen_range(1..1000);
        format!("{}.{}{}@{}.{}", first, last, suffix, host, tld)
    }

    fn phone_number(&mut self) -> String {
        let country = self.rng.gen_range(1..10u8);
        let rest = self.rng.gen_range(10..=12);
        format!("+{}{}", country, self.digits(rest))
    }

    fn date_time(&mut self) -> DateTime<Utc> {
        let millis = self.rng.gen_range(DATE_RANGE_START_MS..=DATE_RANGE_END_MS);
        Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
    }

    fn uuid(&mut self) -> Uuid {
        let bytes: [u8; 16] = self.rng.gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{is_email, is_phone_number, is_uuid};

    #[test]
    fn test_int_in_range_inclusive() {
        let mut source = RngSource::seeded(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..500 {
            let n = source.int_in_range(1, 3);
            assert!((1..=3).contains(&n));
            seen_lo |= n == 1;
            seen_hi |= n == 3;
        }
        assert!(seen_lo && seen_hi);
        assert_eq!(source.int_in_range(5, 5), 5);
    }

    #[test]
    fn test_float_in_range() {
        let mut source = RngSource::seeded(7);
        for _ in 0..100 {
            let f = source.float_in_range(0.25, 0.75);
            assert!((0.25..=0.75).contains(&f));
        }
        assert_eq!(source.float_in_range(2.5, 2.5), 2.5);
    }

    #[test]
    fn test_float_in_range_full_span() {
        let mut source = RngSource::seeded(8);
        for _ in 0..100 {
            let f = source.float_in_range(-f64::MAX, f64::MAX);
            assert!(f.is_finite());
        }
        let f = source.float_in_range(-1e308, 1e308);
        assert!((-1e308..=1e308).contains(&f));
    }

    #[test]
    fn test_alpha_length_and_alphabet() {
        let mut source = RngSource::seeded(1);
        let s = source.alpha(12);
        assert_eq!(s.len(), 12);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
        assert_eq!(source.alpha(0), "");
    }

    #[test]
    fn test_realistic_strings_pass_format_checks() {
        let mut source = RngSource::seeded(99);
        for _ in 0..100 {
            let email = source.email();
            assert!(email.is_ascii());
            assert!(is_email(&email), "bad email {}", email);

            let phone = source.phone_number();
            assert!(is_phone_number(&phone), "bad phone {}", phone);

            let id = source.uuid().to_string();
            assert!(is_uuid(&id), "bad uuid {}", id);
        }
    }

    #[test]
    fn test_date_time_in_range() {
        let mut source = RngSource::seeded(3);
        for _ in 0..100 {
            let ms = source.date_time().timestamp_millis();
            assert!((DATE_RANGE_START_MS..=DATE_RANGE_END_MS).contains(&ms));
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        assert_eq!(a.alpha(20), b.alpha(20));
        assert_eq!(a.email(), b.email());
        assert_eq!(a.uuid(), b.uuid());
    }
}
