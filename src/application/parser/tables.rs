//! Keyword and pattern tables driving the parser and the panic index.

/// Keyword to pair, in priority order. Matched against lower-cased text.
pub const PAIR_KEYWORDS: &[(&str, &str)] = &[
    ("دولار", "USD/LYD"),
    ("يورو", "EUR/LYD"),
    ("usd", "USD/LYD"),
    ("eur", "EUR/LYD"),
];

/// Generic dollar mentions that default the pair to USD/LYD.
pub const DOLLAR_REFERENCES: &[&str] = &["dollar", "دولار"];

/// Pair used when only a generic dollar reference is present.
pub const DEFAULT_PAIR: &str = "USD/LYD";

/// Price patterns in priority order. The last capture group is the price.
///
/// Digits are ASCII only; [`super::normalize_digits`] runs first.
pub const PRICE_PATTERNS: &[&str] = &[
    // سعر الدولار الآن: 5.45
    r"(?:سعر|صرف)\s*(?:الدولار|اليورو|USD|EUR)\s*(?:الآن)?\s*:?\s*([0-9]+\.?[0-9]*)",
    // USD/LYD: 5.45
    r"(USD|EUR)/LYD\s*:?\s*([0-9]+\.?[0-9]*)",
    // الدولار بـ 5.45
    r"(?:الدولار|اليورو)\s*(?:بـ)?\s*([0-9]+\.?[0-9]*)",
    // USD rate: 5.45
    r"USD\s*(?:rate|price)?\s*:?\s*([0-9]+\.?[0-9]*)",
    r"EUR\s*(?:rate|price)?\s*:?\s*([0-9]+\.?[0-9]*)",
    // 5.45 LYD / 5.45 دينار
    r"([0-9]+\.?[0-9]*)\s*(?:LYD|دينار)",
];

/// Words marking a buy-side quote.
pub const BUY_KEYWORDS: &[&str] = &["شراء", "buy", "bid", "buying"];

/// Words marking a sell-side quote. These win over buy keywords.
pub const SELL_KEYWORDS: &[&str] = &["بيع", "sell", "ask", "selling"];

/// Crisis vocabulary counted by the panic index.
pub const PANIC_KEYWORDS: &[&str] = &[
    "أزمة",
    "انهيار",
    "crisis",
    "collapse",
    "panic",
    "shortage",
    "نقص",
    "liquidity",
    "سيولة",
    "black market",
    "السوق السوداء",
    "inflation",
    "تضخم",
];
