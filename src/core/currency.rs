use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies with their decimal precision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "CHAR(3)", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar (2 decimal places)
    USD,
    /// Canadian Dollar (2 decimal places)
    CAD,
    /// Euro (2 decimal places)
    EUR,
    /// Pound Sterling (2 decimal places)
    GBP,
    /// Japanese Yen (no decimal places)
    JPY,
}

impl Currency {
    /// Returns the decimal scale for this currency
    /// - JPY: 0 (the minor unit is the whole yen)
    /// - All others: 2
    pub fn scale(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Minor units per major unit (100 for cent-based currencies, 1 for JPY)
    pub fn minor_units_per_major(&self) -> i64 {
        10i64.pow(self.scale())
    }

    /// Formats a minor-unit amount for display, e.g. `USD 12.50`
    pub fn format_amount(&self, amount: i64) -> String {
        let scale = self.scale();
        if scale == 0 {
            format!("{} {}", self, amount)
        } else {
            let divisor = self.minor_units_per_major();
            let major = amount / divisor;
            let minor = (amount % divisor).abs();
            format!("{} {}.{:0width$}", self, major, minor, width = scale as usize)
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::USD => write!(f, "USD"),
            Currency::CAD => write!(f, "CAD"),
            Currency::EUR => write!(f, "EUR"),
            Currency::GBP => write!(f, "GBP"),
            Currency::JPY => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "CAD" => Ok(Currency::CAD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_scale() {
        assert_eq!(Currency::USD.scale(), 2);
        assert_eq!(Currency::JPY.scale(), 0);
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(Currency::USD.format_amount(1250), "USD 12.50");
        assert_eq!(Currency::USD.format_amount(5), "USD 0.05");
        assert_eq!(Currency::JPY.format_amount(1250), "JPY 1250");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("GBP".parse::<Currency>().unwrap(), Currency::GBP);
        assert!("XXX".parse::<Currency>().is_err());
    }
}
