use crate::models::itinerary::OrderedLocation;
use crate::models::place::Place;

/// Recover the visit order from itinerary text by case-insensitive substring
/// search on each place's display name.
///
/// Heuristic by nature: a place whose name is contained in another's (say
/// "Joe's" inside "Joe's Diner") can match at the longer name's position.
/// The matched subset is sorted by first occurrence, ties resolved by input
/// order, and numbered 1..k. Pure function of its inputs.
pub fn extract_locations(itinerary_text: &str, places: &[Place]) -> Vec<OrderedLocation> {
    let haystack = itinerary_text.to_lowercase();

    let mut matches: Vec<(usize, &Place)> = Vec::new();
    for place in places {
        let needle = place.display_name.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if let Some(index) = haystack.find(&needle) {
            matches.push((index, place));
        }
    }

    // Stable sort keeps input order for equal indexes.
    matches.sort_by_key(|(index, _)| *index);

    matches
        .into_iter()
        .enumerate()
        .map(|(position, (_, place))| OrderedLocation {
            place: place.clone(),
            order: position as u32 + 1,
        })
        .collect()
}
