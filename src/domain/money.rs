use std::fmt;

/// Amounts are plain decimals. Comparisons against zero go through
/// [`TOLERANCE`] to absorb floating-point rounding from uneven splits.
pub type Amount = f64;

/// Smallest amount treated as non-zero by balances and settlements.
pub const TOLERANCE: Amount = 0.01;

/// Returns true if the amount is too small to be worth paying.
pub fn is_negligible(amount: Amount) -> bool {
    amount.abs() < TOLERANCE
}

/// Format an amount with two decimals.
/// Example: 50.0 -> "50.00", -12.5 -> "-12.50"
pub fn format_amount(amount: Amount) -> String {
    // Avoid printing "-0.00" for values that round to zero
    if amount.abs() < 0.005 {
        return "0.00".to_string();
    }
    format!("{:.2}", amount)
}

/// Parse a decimal string into an amount.
/// Example: "50.00" -> 50.0, "12.5" -> 12.5, ".50" -> 0.5
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    // Only plain decimal notation, no "inf", "NaN" or exponents
    let digits = input.strip_prefix('-').unwrap_or(input);
    let valid = digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|c| *c == '.').count() <= 1
        && digits.chars().any(|c| c.is_ascii_digit());
    if !valid {
        return Err(ParseAmountError::InvalidFormat);
    }

    let amount: Amount = input
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;
    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat,
    NotFinite,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "empty amount"),
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::NotFinite => write!(f, "amount is not a finite number"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
