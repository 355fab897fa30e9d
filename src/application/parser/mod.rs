//! Text-to-tick extraction for mixed Arabic/English channel posts.
//!
//! [`parse`] is a pure function: no state, no I/O, safe to call from any
//! number of tasks at once. A message without a usable price mention
//! yields `None`, which is a normal outcome rather than an error.
//!
//! The steps are table-driven (see [`tables`]):
//!
//! 1. **Pair**: first keyword of [`tables::PAIR_KEYWORDS`] found in the
//!    lower-cased text wins; a bare dollar reference defaults to USD/LYD.
//! 2. **Price**: first pattern of [`tables::PRICE_PATTERNS`] that matches;
//!    its last capture group is the price. Values outside `(0, 100]` are
//!    rejected.
//! 3. **Side**: `mid` by default, `buy` on a buy keyword, and `sell` on a
//!    sell keyword even when a buy keyword is also present.

pub mod tables;

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::domain::{CurrencyPair, ParsedTick, PriceType};

static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn patterns() -> &'static [Regex] {
    PATTERNS.get_or_init(|| {
        tables::PRICE_PATTERNS
            .iter()
            .filter_map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect()
    })
}

/// Extract a price tick from raw message text.
pub fn parse(text: &str) -> Option<ParsedTick> {
    let lower = text.to_lowercase();
    let pair = identify_pair(&lower)?;
    let price = extract_price(text)?;
    ParsedTick::try_new(pair, price, classify_side(&lower)).ok()
}

/// Resolve the currency pair from lower-cased text.
pub fn identify_pair(lower: &str) -> Option<CurrencyPair> {
    let pair = tables::PAIR_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, pair)| *pair)
        .or_else(|| {
            tables::DOLLAR_REFERENCES
                .iter()
                .any(|reference| lower.contains(reference))
                .then_some(tables::DEFAULT_PAIR)
        })?;
    CurrencyPair::try_new(pair).ok()
}

/// Apply the price patterns in order and return the first numeric capture.
///
/// No range check happens here; a matching pattern with an out-of-range
/// value still stops the search.
pub fn extract_price(text: &str) -> Option<f64> {
    let normalized = normalize_digits(text);
    patterns().iter().find_map(|re| {
        let caps = re.captures(&normalized)?;
        let last = caps.iter().skip(1).flatten().last()?;
        last.as_str().parse::<f64>().ok()
    })
}

/// Classify the quote side. Sell keywords take priority over buy keywords.
pub fn classify_side(lower: &str) -> PriceType {
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if mentions(tables::SELL_KEYWORDS) {
        PriceType::Sell
    } else if mentions(tables::BUY_KEYWORDS) {
        PriceType::Buy
    } else {
        PriceType::Mid
    }
}

/// Code points of the zero digit of each Unicode decimal-digit run in the
/// basic multilingual plane. Each run is ten consecutive digits.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10,
];

/// Map Unicode decimal digits (Arabic-Indic, Persian, fullwidth and the
/// other BMP scripts) and the Arabic decimal separator to ASCII so
/// captured numbers parse.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c == '\u{066B}' {
                return '.';
            }
            let code = c as u32;
            DIGIT_ZEROS
                .iter()
                .find(|zero| (**zero..**zero + 10).contains(&code))
                .and_then(|zero| char::from_digit(code - zero, 10))
                .unwrap_or(c)
        })
        .collect()
}
