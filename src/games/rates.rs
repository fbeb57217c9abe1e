use crate::games::game::Mode;
use num::Integer;

/// The creation form takes the amount in thousands of so'm.
pub const AMOUNT_INPUT_MULTIPLIER: i64 = 1000;

pub const DAY_HOURLY_PRICE: i64 = 40_000;
pub const NIGHT_HOURLY_PRICE: i64 = 100_000;

pub fn hourly_price(mode: Mode) -> i64 {
    match mode {
        Mode::Day => DAY_HOURLY_PRICE,
        Mode::Night => NIGHT_HOURLY_PRICE,
    }
}

/// Money consumed per second of play.
pub fn rate_per_second(mode: Mode) -> f64 {
    hourly_price(mode) as f64 / 3600.0
}

/// Stored amount for a form input. `None` when it does not fit.
pub fn amount_from_input(amount_input: i64) -> Option<i64> {
    amount_input.checked_mul(AMOUNT_INPUT_MULTIPLIER)
}

/// `floor(amount / rate_per_second(mode))`, computed without floating point.
/// `None` on overflow.
pub fn seconds_for_amount(mode: Mode, amount: i64) -> Option<i64> {
    if amount <= 0 {
        return Some(0);
    }

    let scaled = amount.checked_mul(3600)?;
    Some(Integer::div_floor(&scaled, &hourly_price(mode)))
}

/// Price of `minutes` extra minutes, rounded to the nearest whole unit.
/// `None` on overflow.
pub fn extension_cost(mode: Mode, minutes: i64) -> Option<i64> {
    if minutes <= 0 {
        return Some(0);
    }

    let scaled = minutes.checked_mul(hourly_price(mode))?.checked_add(30)?;
    Some(Integer::div_floor(&scaled, &60))
}
