//! Shareable result links for a computed WAM.

/// `<base>?wam=<wam>` with the WAM fixed to two decimal places.
pub fn share_url(base: &str, wam: f64) -> String {
    let base = base.split(['?', '#']).next().unwrap_or(base);
    format!("{base}?wam={wam:.2}")
}

pub fn share_caption(wam: f64) -> String {
    format!("Check out my WAM calculation result! My WAM is {wam:.2}%")
}
