use std::collections::BTreeMap;

use time::Date;

use crate::Menu;

/// PreK entree per serving date.
pub type PrekMatches = BTreeMap<Date, String>;

/// Finds the main line entree that is also served to preschoolers.
///
/// Returns the first primary entree, in menu order, whose description appears
/// anywhere in the PreK entrees. Matching is exact and case-sensitive.
pub fn prek_entree(primary: Option<&Menu>, prek: Option<&Menu>) -> Option<String> {
    let (primary, prek) = (primary?, prek?);

    if primary.is_empty() || prek.is_empty() {
        return None;
    }

    let prek_entrees = prek.entree_descriptions();
    let matched = primary
        .entree_descriptions()
        .into_iter()
        .find(|entree| prek_entrees.contains(entree))
        .map(str::to_owned);

    match &matched {
        Some(entree) => tracing::info!(entree = %entree, "matched PreK entree"),
        None => tracing::info!("no entree shared between main line and PreK"),
    }

    matched
}
