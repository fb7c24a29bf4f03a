use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 12;

/// Exchange contract symbol, e.g. `XBTUSD` or the index `.BXBT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Perpetual bitcoin contract shown on the chart by default.
    pub const DEFAULT_CHART: &'static str = "XBTUSD";

    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let Some(first) = normalized.chars().next() else {
            return Err(ValidationError::EmptySymbol);
        };

        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        // Index symbols carry a leading dot.
        if !(first.is_ascii_alphabetic() || first == '.') {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }

        for (index, ch) in normalized.chars().enumerate().skip(1) {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn xbtusd() -> Self {
        Self(String::from(Self::DEFAULT_CHART))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::xbtusd()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Whether a contract symbol is bitcoin-denominated (`XBT` family).
pub fn is_bitcoin_symbol(symbol: &str) -> bool {
    symbol.contains("XBT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" xbtusd ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "XBTUSD");
    }

    #[test]
    fn accepts_index_symbols() {
        let parsed = Symbol::parse(".bxbt").expect("index symbol should parse");
        assert_eq!(parsed.as_str(), ".BXBT");
    }

    #[test]
    fn rejects_digit_start() {
        let err = Symbol::parse("1XBT").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidStart { ch: '1' }));
        assert_eq!(err.to_string(), "symbol must start with an ASCII letter or '.': '1'");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Symbol::parse("XBT/USD").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: '/', index: 3 }));
    }

    #[test]
    fn bitcoin_family_detection() {
        assert!(is_bitcoin_symbol("XBTUSD"));
        assert!(is_bitcoin_symbol("XBTZ20"));
        assert!(!is_bitcoin_symbol("ETHUSD"));
    }
}
