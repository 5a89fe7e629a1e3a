//! Token Eligibility Filter
//!
//! Decides whether a coin may enter the TOTAL2 basket. The decision is a pure
//! function of (id, name, symbol): the filter owns only its compiled pattern
//! library and never records what it has seen. Callers that need an audit
//! trail collect decisions with [`audit`].
//!
//! Rules, first match wins:
//! 1. allow-list override (id or symbol) → eligible
//! 2. base currency → excluded
//! 3. stablecoin (explicit ticker set) → excluded
//! 4. wrapped / staked / bridged / BTC derivative (ticker set + regex) → excluded
//!
//! Identifiers are lower-case tickers ("eth", "wbtc"), matching the keys of
//! the price cache.

use crate::error::{AppError, Result};
use crate::models::CoinMetadata;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Tokens that are never filtered out even when a pattern matches them
pub const ALLOWED_TOKENS: &[&str] = &[
    "sui", "sei", "stk", "sand", "wif", "xlm", "stx", "storm", "snt", "storj", "strax",
    "stpt", "strk", "wild", "wifi", "waves", "woo", "wld", "wemix", "waxp", "wax", "win",
    "wbt", "steem", "stmx",
    // Names that trip the ticker-shaped patterns
    "stellar", "stacks", "status", "stratis", "starknet",
];

/// Stablecoins pegged to fiat
pub const EXCLUDED_STABLECOINS: &[&str] = &[
    "usdt", "usdc", "dai", "usds", "usde", "susds", "susde", "pyusd", "usdt0", "usd1",
    "usdf", "usdtb", "bfusd", "rlusd", "usdg", "usyc", "fdusd", "usdy", "usdai", "usd0",
    "usdd", "tusd", "gho", "usdb", "frax", "lusd", "crvusd", "gusd", "busd", "usdp",
    "susd", "nusd", "eurs", "eurt", "ageur", "mim", "dola", "usdx", "usdj", "ustc",
];

/// Known wrapped, staked and bridged tickers
pub const EXCLUDED_DERIVATIVES: &[&str] = &[
    // BTC
    "wbtc", "tbtc", "hbtc", "renbtc", "sbtc", "fbtc", "lbtc", "solvbtc", "clbtc", "enzobtc",
    "cbbtc", "btcb",
    // ETH
    "steth", "wsteth", "weth", "wbeth", "weeth", "eeth", "reth", "cbeth", "sfrxeth", "meth",
    "lseth", "rseth", "ezeth", "oseth", "ethx", "sweth",
    // SOL
    "wsol", "jitosol", "msol", "bnsol",
    // BNB and others
    "wbnb", "syrupusdc", "khype",
];

/// Case-insensitive patterns matched against the id and against "id name"
pub const EXCLUDED_PATTERNS: &[&str] = &[
    // Wrapped
    r"^wrapped-",
    r"^w[a-z]{2,6}$",
    r"-wrapped$",
    r"-wrapped-",
    r"\bwrapped\b",
    // Staked
    r"^staked-",
    r"^st[a-z]{2,6}$",
    r"-staked$",
    r"-staked-",
    r"liquid.?staking",
    r"\bstaked\b",
    // Bridged
    r"^bridged-",
    r"-bridged$",
    r"-bridged-",
    r"bridge[d]?$",
    // Restaked
    r"restaked",
    r"^rs[a-z]{2,6}$",
    // Liquid staking protocols
    r"lido",
    r"rocket.?pool",
    r"coinbase.?wrapped",
    r"marinade",
    r"jito.?staked",
    r"ether\.?fi",
    r"swell",
    r"kelp.?dao",
    r"renzo",
    r"stader",
    r"stakewise",
    r"lombard",
    r"solv.?btc",
    r"threshold.?btc",
];

/// Tickers of BTC wrappers and synthetic BTC
pub const BTC_DERIVATIVE_TICKERS: &[&str] = &[
    "wbtc", "tbtc", "hbtc", "renbtc", "sbtc", "fbtc", "lbtc", "solvbtc", "clbtc", "enzobtc",
    "cbbtc", "btcb",
];

const BTC_PATTERN: &str = r"btc|bitcoin";
const DERIVATIVE_KEYWORD_PATTERN: &str =
    r"wrapped|staked|bridged|liquid|synthetic|pegged|collateral|vault|yield";

/// What the caller intends to do with eligible coins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPurpose {
    /// Basket membership: the base currency is excluded
    Index,
    /// Price download: the base currency is kept (charted on its own)
    Download,
}

/// Why a coin was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExclusionReason {
    BaseCurrency,
    Stablecoin,
    WrappedStakedBridged,
    BtcDerivative,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::BaseCurrency => "base currency",
            ExclusionReason::Stablecoin => "stablecoin",
            ExclusionReason::WrappedStakedBridged => "wrapped/staked/bridged token",
            ExclusionReason::BtcDerivative => "BTC derivative",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityDecision {
    pub eligible: bool,
    pub reason: Option<ExclusionReason>,
}

impl EligibilityDecision {
    fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    fn excluded(reason: ExclusionReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }

    /// Human-readable reason, empty when eligible
    pub fn reason_str(&self) -> &'static str {
        self.reason.map_or("", |r| r.as_str())
    }
}

/// Stateless eligibility predicate with a compiled pattern library
#[derive(Debug, Clone)]
pub struct TokenFilter {
    base_aliases: Vec<String>,
    patterns: Vec<Regex>,
    btc_pattern: Regex,
    derivative_keywords: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::Config(format!("Invalid exclusion pattern '{}': {}", pattern, e)))
}

impl TokenFilter {
    /// Create a filter for an index denominated in `base_currency` (e.g., "BTC")
    pub fn new(base_currency: &str) -> Result<Self> {
        let base = base_currency.trim().to_lowercase();
        let mut base_aliases = vec![base.clone()];
        if base == "btc" {
            base_aliases.push(crate::constants::BASE_CURRENCY_NAME.to_string());
        }

        let patterns = EXCLUDED_PATTERNS
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_aliases,
            patterns,
            btc_pattern: compile(BTC_PATTERN)?,
            derivative_keywords: compile(DERIVATIVE_KEYWORD_PATTERN)?,
        })
    }

    /// Eligibility for the TOTAL2 basket
    pub fn is_eligible(&self, coin_id: &str, name: &str, symbol: &str) -> EligibilityDecision {
        self.check(FilterPurpose::Index, coin_id, name, symbol)
    }

    /// Eligibility for a given purpose
    pub fn check(
        &self,
        purpose: FilterPurpose,
        coin_id: &str,
        name: &str,
        symbol: &str,
    ) -> EligibilityDecision {
        let id = coin_id.trim().to_lowercase();
        let name = name.trim().to_lowercase();
        let symbol = symbol.trim().to_lowercase();

        if is_allowed(&id, &symbol) {
            return EligibilityDecision::eligible();
        }

        if purpose == FilterPurpose::Index && self.is_base_currency(&id, &symbol) {
            return EligibilityDecision::excluded(ExclusionReason::BaseCurrency);
        }

        if is_stablecoin(&id, &symbol) {
            return EligibilityDecision::excluded(ExclusionReason::Stablecoin);
        }

        if self.is_wrapped_or_staked(&id, &name) {
            return EligibilityDecision::excluded(ExclusionReason::WrappedStakedBridged);
        }

        if !self.is_base_currency(&id, &symbol) && self.is_btc_derivative(&id, &name, &symbol) {
            return EligibilityDecision::excluded(ExclusionReason::BtcDerivative);
        }

        EligibilityDecision::eligible()
    }

    fn is_base_currency(&self, id: &str, symbol: &str) -> bool {
        self.base_aliases.iter().any(|b| b == id || b == symbol)
    }

    fn is_wrapped_or_staked(&self, id: &str, name: &str) -> bool {
        if EXCLUDED_DERIVATIVES.contains(&id) {
            return true;
        }
        let combined = format!("{} {}", id, name);
        self.matches_pattern(id) || self.matches_pattern(combined.trim())
    }

    fn is_btc_derivative(&self, id: &str, name: &str, symbol: &str) -> bool {
        if BTC_DERIVATIVE_TICKERS.contains(&id) || BTC_DERIVATIVE_TICKERS.contains(&symbol) {
            return true;
        }
        let combined = format!("{} {} {}", id, name, symbol);
        self.btc_pattern.is_match(&combined) && self.derivative_keywords.is_match(&combined)
    }

    /// Whether any exclusion pattern matches the text
    pub fn matches_pattern(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Keep only coins eligible for `purpose`
    pub fn filter_coins(&self, coins: &[CoinMetadata], purpose: FilterPurpose) -> Vec<CoinMetadata> {
        coins
            .iter()
            .filter(|c| self.check(purpose, &c.id, &c.name, &c.symbol).eligible)
            .cloned()
            .collect()
    }
}

fn is_allowed(id: &str, symbol: &str) -> bool {
    ALLOWED_TOKENS.contains(&id) || (!symbol.is_empty() && ALLOWED_TOKENS.contains(&symbol))
}

fn is_stablecoin(id: &str, symbol: &str) -> bool {
    EXCLUDED_STABLECOINS.contains(&id) || (!symbol.is_empty() && EXCLUDED_STABLECOINS.contains(&symbol))
}

/// A coin excluded by the filter, with its reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCoin {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub reason: ExclusionReason,
}

/// Accepted and skipped coins from one filtering pass
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub accepted: Vec<CoinMetadata>,
    pub skipped: Vec<SkippedCoin>,
}

impl FilterReport {
    /// Skipped counts by reason
    pub fn summary(&self) -> BTreeMap<ExclusionReason, usize> {
        let mut summary = BTreeMap::new();
        for coin in &self.skipped {
            *summary.entry(coin.reason).or_insert(0) += 1;
        }
        summary
    }
}

/// Run the filter over a coin list and collect every decision
pub fn audit(filter: &TokenFilter, coins: &[CoinMetadata], purpose: FilterPurpose) -> FilterReport {
    let mut report = FilterReport::default();
    for coin in coins {
        let decision = filter.check(purpose, &coin.id, &coin.name, &coin.symbol);
        match decision.reason {
            None => report.accepted.push(coin.clone()),
            Some(reason) => {
                debug!(coin = %coin.id, reason = %reason, "Coin excluded");
                report.skipped.push(SkippedCoin {
                    coin_id: coin.id.clone(),
                    name: coin.name.clone(),
                    symbol: coin.symbol.clone(),
                    reason,
                });
            }
        }
    }
    report
}

/// Write skipped coins as a `;`-separated CSV, sorted by id
pub fn export_skipped_csv(skipped: &[SkippedCoin], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut sorted: Vec<&SkippedCoin> = skipped.iter().collect();
    sorted.sort_by(|a, b| a.coin_id.cmp(&b.coin_id));

    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    writer.write_record(["Coin ID", "Name", "Symbol", "Reason"])?;
    for coin in sorted {
        writer.write_record([
            coin.coin_id.as_str(),
            coin.name.as_str(),
            coin.symbol.as_str(),
            coin.reason.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> TokenFilter {
        TokenFilter::new("BTC").unwrap()
    }

    #[test]
    fn test_base_currency_excluded() {
        let f = filter();
        let decision = f.is_eligible("btc", "Bitcoin", "BTC");
        assert!(!decision.eligible);
        assert_eq!(decision.reason_str(), "base currency");

        // No hidden state: repeated and interleaved calls agree
        f.is_eligible("eth", "Ethereum", "ETH");
        assert_eq!(f.is_eligible("btc", "Bitcoin", "BTC"), decision);
        assert_eq!(filter().is_eligible("btc", "Bitcoin", "BTC"), decision);
    }

    #[test]
    fn test_base_currency_kept_for_download() {
        let decision = filter().check(FilterPurpose::Download, "btc", "Bitcoin", "BTC");
        assert!(decision.eligible);
        assert_eq!(decision.reason_str(), "");
    }

    #[test]
    fn test_wrapped_staked_tokens_are_filtered() {
        let f = filter();
        let cases = [
            ("steth", "Lido Staked Ether", "STETH"),
            ("wsteth", "Wrapped stETH", "WSTETH"),
            ("wbtc", "Wrapped Bitcoin", "WBTC"),
            ("weth", "Wrapped Ether", "WETH"),
            ("wbeth", "Wrapped Beacon ETH", "WBETH"),
            ("weeth", "Wrapped eETH", "WEETH"),
            ("jitosol", "Jito Staked SOL", "JITOSOL"),
            ("reth", "Rocket Pool ETH", "RETH"),
            ("wbnb", "Wrapped BNB", "WBNB"),
            ("bnsol", "Binance Staked SOL", "BNSOL"),
            ("rseth", "Kelp DAO Restaked ETH", "RSETH"),
            ("fbtc", "Ignition FBTC", "FBTC"),
            ("lbtc", "Lombard Staked BTC", "LBTC"),
            ("solvbtc", "Solv BTC", "SOLVBTC"),
            ("lseth", "Liquid Staked ETH", "LSETH"),
            ("ezeth", "Renzo Restaked ETH", "EZETH"),
            ("meth", "Mantle Staked Ether", "METH"),
            ("oseth", "StakeWise Staked ETH", "OSETH"),
            ("tbtc", "tBTC", "TBTC"),
            ("msol", "Marinade Staked SOL", "MSOL"),
            ("ethx", "Stader ETHx", "ETHX"),
            ("eeth", "Ether.fi Staked ETH", "EETH"),
            ("sweth", "Swell Staked ETH", "SWETH"),
            ("cbeth", "Coinbase Wrapped Staked ETH", "CBETH"),
        ];
        for (id, name, symbol) in cases {
            let decision = f.is_eligible(id, name, symbol);
            assert!(!decision.eligible, "{} ({}) should be excluded", id, name);
            assert_eq!(decision.reason, Some(ExclusionReason::WrappedStakedBridged), "{}", id);
        }
    }

    #[test]
    fn test_legitimate_tokens_are_accepted() {
        let f = filter();
        let cases = [
            ("sui", "Sui", "SUI"),
            ("sei", "Sei", "SEI"),
            ("stk", "STK", "STK"),
            ("sand", "The Sandbox", "SAND"),
            ("wif", "dogwifhat", "WIF"),
            ("xlm", "Stellar", "XLM"),
            ("stx", "Stacks", "STX"),
            ("strk", "Starknet", "STRK"),
            ("storj", "Storj", "STORJ"),
            ("eth", "Ethereum", "ETH"),
            ("sol", "Solana", "SOL"),
            ("ada", "Cardano", "ADA"),
            ("dot", "Polkadot", "DOT"),
            ("avax", "Avalanche", "AVAX"),
            ("link", "Chainlink", "LINK"),
            ("bch", "Bitcoin Cash", "BCH"),
        ];
        for (id, name, symbol) in cases {
            let decision = f.is_eligible(id, name, symbol);
            assert!(decision.eligible, "{} ({}) should be eligible: {}", id, name, decision.reason_str());
        }
    }

    #[test]
    fn test_stablecoins_are_detected() {
        let f = filter();
        for (id, symbol) in [
            ("usdt", "USDT"),
            ("usdc", "USDC"),
            ("dai", "DAI"),
            ("usde", "USDE"),
            ("pyusd", "PYUSD"),
            ("fdusd", "FDUSD"),
            ("tusd", "TUSD"),
            ("frax", "FRAX"),
            ("gho", "GHO"),
            ("usdd", "USDD"),
        ] {
            let decision = f.is_eligible(id, "", symbol);
            assert_eq!(decision.reason, Some(ExclusionReason::Stablecoin), "{}", id);
        }
    }

    #[test]
    fn test_allow_list_takes_precedence_over_patterns() {
        let f = filter();
        assert!(f.matches_pattern("stacks"));
        assert!(f.is_eligible("stacks", "", "").eligible);
        assert!(f.matches_pattern("waves"));
        assert!(f.is_eligible("waves", "Waves", "WAVES").eligible);
    }

    #[test]
    fn test_btc_derivative_heuristic() {
        let f = filter();
        let decision = f.is_eligible("xbtc", "Yield Bearing Bitcoin", "XBTC");
        assert_eq!(decision.reason, Some(ExclusionReason::BtcDerivative));
    }

    #[test]
    fn test_short_display_name_is_not_a_ticker() {
        let f = filter();
        // Single-word names must not trip the anchored ticker patterns
        assert!(f.is_eligible("ip", "Story", "IP").eligible);
        assert!(f.is_eligible("ton", "Toncoin", "TON").eligible);
        assert!(!f.matches_pattern("ip story"));
        assert!(f.matches_pattern("story"));
    }

    #[test]
    fn test_bare_ticker_pattern() {
        let f = filter();
        // Unknown w-prefixed ticker with no name is treated as wrapped
        assert_eq!(
            f.is_eligible("wxyz", "", "WXYZ").reason,
            Some(ExclusionReason::WrappedStakedBridged)
        );
    }

    #[test]
    fn test_audit_collects_decisions() {
        let f = filter();
        let coins = vec![
            CoinMetadata::new("eth", "Ethereum", "ETH"),
            CoinMetadata::new("wbtc", "Wrapped Bitcoin", "WBTC"),
            CoinMetadata::new("usdt", "Tether", "USDT"),
            CoinMetadata::new("btc", "Bitcoin", "BTC"),
            CoinMetadata::new("sui", "Sui", "SUI"),
        ];

        let report = audit(&f, &coins, FilterPurpose::Index);
        let accepted: Vec<&str> = report.accepted.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(accepted, vec!["eth", "sui"]);
        assert_eq!(report.skipped.len(), 3);

        let summary = report.summary();
        assert_eq!(summary.get(&ExclusionReason::BaseCurrency), Some(&1));
        assert_eq!(summary.get(&ExclusionReason::Stablecoin), Some(&1));

        let download = audit(&f, &coins, FilterPurpose::Download);
        assert!(download.accepted.iter().any(|c| c.id == "btc"));
    }

    #[test]
    fn test_export_skipped_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("skipped.csv");
        let skipped = vec![
            SkippedCoin {
                coin_id: "wbtc".to_string(),
                name: "Wrapped Bitcoin".to_string(),
                symbol: "WBTC".to_string(),
                reason: ExclusionReason::WrappedStakedBridged,
            },
            SkippedCoin {
                coin_id: "usdt".to_string(),
                name: "Tether".to_string(),
                symbol: "USDT".to_string(),
                reason: ExclusionReason::Stablecoin,
            },
        ];

        export_skipped_csv(&skipped, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Coin ID;Name;Symbol;Reason");
        assert_eq!(lines[1], "usdt;Tether;USDT;stablecoin");
        assert!(lines[2].starts_with("wbtc;"));
    }
}
