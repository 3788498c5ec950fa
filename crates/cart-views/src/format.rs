//! Display formatting for money amounts.

use common::Money;

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1.00`, `R$ 1,00`
    Before,
    /// `1,00 €`
    After,
}

/// Locale rules for rendering a [`Money`] amount.
///
/// Always renders exactly two fraction digits. The integer part is grouped
/// in threes when a grouping separator is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: Option<&'static str>,
    position: SymbolPosition,
    spaced: bool,
    decimal: char,
    grouping: Option<char>,
}

impl CurrencyFormat {
    /// `1234.56`: no symbol, no grouping.
    pub fn plain() -> Self {
        Self {
            symbol: None,
            position: SymbolPosition::Before,
            spaced: false,
            decimal: '.',
            grouping: None,
        }
    }

    /// `$1,234.56`
    pub fn en_us() -> Self {
        Self {
            symbol: Some("$"),
            position: SymbolPosition::Before,
            spaced: false,
            decimal: '.',
            grouping: Some(','),
        }
    }

    /// `R$ 1.234,56`
    pub fn pt_br() -> Self {
        Self {
            symbol: Some("R$"),
            position: SymbolPosition::Before,
            spaced: true,
            decimal: ',',
            grouping: Some('.'),
        }
    }

    /// `1.234,56 €`
    pub fn de_de() -> Self {
        Self {
            symbol: Some("€"),
            position: SymbolPosition::After,
            spaced: true,
            decimal: ',',
            grouping: Some('.'),
        }
    }

    /// Resolves a preset from a locale tag such as `en-US` or `pt_BR`.
    ///
    /// Matching ignores case and accepts `_` in place of `-`.
    pub fn for_locale(tag: &str) -> Option<Self> {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "plain" | "" => Some(Self::plain()),
            "en-us" | "en" => Some(Self::en_us()),
            "pt-br" | "pt" => Some(Self::pt_br()),
            "de-de" | "de" => Some(Self::de_de()),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<&'static str> {
        self.symbol
    }

    /// Formats an amount with this locale's rules.
    pub fn format(&self, amount: Money) -> String {
        let number = format!(
            "{}{}{:02}",
            self.group(amount.units().unsigned_abs()),
            self.decimal,
            amount.cents_part()
        );
        let sign = if amount.is_negative() { "-" } else { "" };
        let space = if self.spaced { " " } else { "" };

        match (self.symbol, self.position) {
            (None, _) => format!("{sign}{number}"),
            (Some(symbol), SymbolPosition::Before) => format!("{sign}{symbol}{space}{number}"),
            (Some(symbol), SymbolPosition::After) => format!("{sign}{number}{space}{symbol}"),
        }
    }

    fn group(&self, units: u64) -> String {
        let digits = units.to_string();
        let Some(separator) = self.grouping else {
            return digits;
        };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(separator);
            }
            grouped.push(digit);
        }
        grouped
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::en_us()
    }
}
