// Platform amounts are decimal major units, processor amounts are integer minor units.

pub fn to_minor(amount_major: f64) -> i64 {
    (amount_major * 100.0).round() as i64
}

pub fn to_major(amount_minor: i64) -> f64 {
    amount_minor as f64 / 100.0
}
