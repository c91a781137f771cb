use healthlog_core::text::fold_width;
use healthlog_core::{Domain, ExtractHint};

use crate::fallback::exercise::find_activities;
use crate::fallback::weight::looks_like_weight;

/// Pick the one domain a single remote call should ask about.
///
/// The caller's hint wins. Otherwise activities beat weight units, and
/// everything else is treated as food. A weight unit next to an eating verb
/// (`牛肉1キロ食べた`) is food.
pub fn route_domain(text: &str, hint: &ExtractHint) -> Domain {
    if let Some(domain) = hint.domain {
        return domain;
    }
    let folded = fold_width(text);
    if !find_activities(&folded).is_empty() {
        Domain::Exercise
    } else if looks_like_weight(&folded) {
        Domain::Weight
    } else {
        Domain::Food
    }
}
