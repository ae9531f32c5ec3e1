//! Conversion between decimal amount strings and the protocol's 7-decimal
//! fixed-point `i64` representation.

use crate::{
    constants::{STELLAR_AMOUNT_DECIMALS, STELLAR_AMOUNT_SCALE},
    models::{xdr::Price, FormatError},
};

/// Largest decimal precision accepted by [`price_from_decimal`].
const MAX_PRICE_DECIMALS: usize = 18;

/// Splits an optional sign off a decimal string and checks the remaining
/// `digits[.digits]` shape.
fn split_decimal(value: &str) -> Result<(bool, &str, &str), FormatError> {
    let malformed = || FormatError::MalformedDecimal(value.to_string());

    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        Some(_) => (false, value),
        None => return Err(malformed()),
    };

    let (whole, frac) = match unsigned.split_once('.') {
        Some((whole, frac)) => {
            if frac.is_empty() {
                return Err(malformed());
            }
            (whole, frac)
        }
        None => (unsigned, ""),
    };

    if whole.is_empty() {
        return Err(malformed());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    Ok((negative, whole, frac))
}

/// Parses a decimal amount ("12.5", "-0.0000001") into stroops.
///
/// More than seven fractional digits is a precision loss and is rejected
/// rather than rounded. Scientific notation is not accepted.
pub fn to_fixed_point(value: &str) -> Result<i64, FormatError> {
    let (negative, whole, frac) = split_decimal(value)?;

    if frac.len() > STELLAR_AMOUNT_DECIMALS {
        return Err(FormatError::PrecisionLoss {
            value: value.to_string(),
            max_digits: STELLAR_AMOUNT_DECIMALS,
        });
    }

    let overflow = || FormatError::Overflow(value.to_string());

    // i128 holds any whole part that could still fit after scaling
    let whole = whole.trim_start_matches('0');
    if whole.len() > 20 {
        return Err(overflow());
    }
    let whole: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };

    let mut frac_padded = frac.to_string();
    while frac_padded.len() < STELLAR_AMOUNT_DECIMALS {
        frac_padded.push('0');
    }
    let frac: i128 = frac_padded.parse().map_err(|_| overflow())?;

    let magnitude = whole
        .checked_mul(STELLAR_AMOUNT_SCALE as i128)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(overflow)?;
    let signed = if negative { -magnitude } else { magnitude };

    i64::try_from(signed).map_err(|_| overflow())
}

/// Formats stroops as a decimal string with trailing zeros trimmed.
pub fn from_fixed_point(value: i64) -> String {
    let scale = STELLAR_AMOUNT_SCALE as u64;
    let magnitude = value.unsigned_abs();
    let whole = magnitude / scale;
    let frac = magnitude % scale;
    let sign = if value < 0 { "-" } else { "" };

    if frac == 0 {
        return format!("{sign}{whole}");
    }

    let frac = format!("{frac:0width$}", width = STELLAR_AMOUNT_DECIMALS);
    format!("{sign}{whole}.{}", frac.trim_end_matches('0'))
}

/// Approximates a non-negative decimal with the closest `n/d` fraction whose
/// terms fit in an `i32`, using continued fractions.
pub fn price_from_decimal(value: &str) -> Result<Price, FormatError> {
    let invalid = || FormatError::InvalidPrice(value.to_string());
    let (negative, whole, frac) = split_decimal(value)?;
    if negative || frac.len() > MAX_PRICE_DECIMALS {
        return Err(invalid());
    }

    let denominator = 10i128.pow(frac.len() as u32);
    let digits = format!("{whole}{frac}");
    let digits = digits.trim_start_matches('0');
    if digits.len() > 36 {
        return Err(invalid());
    }
    let numerator: i128 = if digits.is_empty() {
        0
    } else {
        digits.parse().map_err(|_| invalid())?
    };

    let max = i32::MAX as i128;
    // convergents h/k, seeded with 0/1 and 1/0
    let (mut h_prev, mut k_prev) = (0i128, 1i128);
    let (mut h, mut k) = (1i128, 0i128);
    let (mut p, mut q) = (numerator, denominator);

    loop {
        let a = p / q;
        let rem = p % q;
        let h_next = a
            .checked_mul(h)
            .and_then(|v| v.checked_add(h_prev))
            .ok_or_else(invalid)?;
        let k_next = a
            .checked_mul(k)
            .and_then(|v| v.checked_add(k_prev))
            .ok_or_else(invalid)?;
        if h_next > max || k_next > max {
            break;
        }
        (h_prev, k_prev, h, k) = (h, k, h_next, k_next);
        if rem == 0 {
            break;
        }
        (p, q) = (q, rem);
    }

    if h == 0 || k == 0 {
        return Err(invalid());
    }

    Ok(Price {
        n: h as i32,
        d: k as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_fixtures() {
        for s in [
            "0",
            "1",
            "1.1234567",
            "72991284.3007381",
            "922337203685.4775807",
        ] {
            assert_eq!(from_fixed_point(to_fixed_point(s).unwrap()), s, "{s}");
        }
    }

    #[test]
    fn test_to_fixed_point_scaling() {
        assert_eq!(to_fixed_point("1").unwrap(), 10_000_000);
        assert_eq!(to_fixed_point("0.0000001").unwrap(), 1);
        assert_eq!(to_fixed_point("12.5").unwrap(), 125_000_000);
        assert_eq!(to_fixed_point("+3").unwrap(), 30_000_000);
        assert_eq!(to_fixed_point("-2.5").unwrap(), -25_000_000);
        assert_eq!(to_fixed_point("000.10").unwrap(), 1_000_000);
        assert_eq!(to_fixed_point("922337203685.4775807").unwrap(), i64::MAX);
        assert_eq!(to_fixed_point("-922337203685.4775808").unwrap(), i64::MIN);
    }

    #[test]
    fn test_precision_loss_is_rejected() {
        assert_eq!(
            to_fixed_point("0.00000001"),
            Err(FormatError::PrecisionLoss {
                value: "0.00000001".to_string(),
                max_digits: 7
            })
        );
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(
            to_fixed_point("922337203685.4775808"),
            Err(FormatError::Overflow("922337203685.4775808".to_string()))
        );
        assert!(matches!(
            to_fixed_point("99999999999999999999999999"),
            Err(FormatError::Overflow(_))
        ));
    }

    #[test]
    fn test_malformed_input() {
        for bad in ["", "-", ".5", "1.", "1e7", "1,5", " 1", "0x10", "1.2.3", "--1"] {
            assert!(
                matches!(to_fixed_point(bad), Err(FormatError::MalformedDecimal(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_from_fixed_point_formatting() {
        assert_eq!(from_fixed_point(0), "0");
        assert_eq!(from_fixed_point(1), "0.0000001");
        assert_eq!(from_fixed_point(10_000_000), "1");
        assert_eq!(from_fixed_point(15_000_000), "1.5");
        assert_eq!(from_fixed_point(-15_000_000), "-1.5");
        assert_eq!(from_fixed_point(i64::MIN), "-922337203685.4775808");
    }

    #[test]
    fn test_price_from_decimal() {
        assert_eq!(price_from_decimal("1").unwrap(), Price { n: 1, d: 1 });
        assert_eq!(price_from_decimal("0.5").unwrap(), Price { n: 1, d: 2 });
        assert_eq!(price_from_decimal("1.25").unwrap(), Price { n: 5, d: 4 });
        assert_eq!(price_from_decimal("2.93850088").unwrap(), Price { n: 36731261, d: 12500000 });
        assert!(matches!(
            price_from_decimal("0"),
            Err(FormatError::InvalidPrice(_))
        ));
        assert!(matches!(
            price_from_decimal("-1"),
            Err(FormatError::InvalidPrice(_))
        ));
    }
}
