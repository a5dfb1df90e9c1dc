//! Human-friendly rounding of wager amounts.
//!
//! Raw amounts are in a token's base units (e.g. lamports). Rounding happens
//! in display units so the number a player sees has a sensible precision,
//! then converts back. Larger display values get fewer decimals.

/// Round a base-unit amount to display precision.
///
/// With a `base_wager` scale the amount is converted to display units, rounded
/// at a magnitude-based tier and converted back. Without one, the raw amount
/// is rounded directly with a coarser fallback tier.
///
/// Idempotent: rounding an already-rounded amount is a no-op.
pub fn round_wager(raw: f64, base_wager: Option<f64>) -> f64 {
    if raw == 0.0 {
        return 0.0;
    }
    if !raw.is_finite() {
        return raw;
    }
    if raw < 0.0 {
        return -round_wager(-raw, base_wager);
    }

    match base_wager {
        Some(scale) if scale > 0.0 && scale.is_finite() => {
            let display = raw / scale;
            let decimals = display_decimals(display);
            round_to_decimals(display, decimals) * scale
        }
        _ => {
            let decimals = raw_decimals(raw);
            round_to_decimals(raw, decimals)
        }
    }
}

// Precision tier for display-unit values.
fn display_decimals(display: f64) -> u32 {
    if display >= 10.0 {
        2
    } else if display >= 1.0 {
        3
    } else if display >= 0.1 {
        4
    } else if display >= 0.01 {
        5
    } else {
        6
    }
}

// Fallback tier when no base-unit scale is known.
fn raw_decimals(raw: f64) -> u32 {
    if raw < 0.0001 {
        6
    } else if raw < 1.0 {
        4
    } else {
        2
    }
}

fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
