use crate::catalog::{Catalog, TargetObject};

/// Find the first not-yet-found target whose synonym set overlaps any
/// detected label. Targets are scanned in list order and the first match
/// wins; there is no scoring by confidence or overlap strength.
///
/// A label matches a synonym when either contains the other. The loose
/// bidirectional containment tolerates partial and compound classifier
/// labels ("red apple fruit" still hits "apple").
pub fn find_match<'a>(
    catalog: &Catalog,
    labels: &[String],
    targets: &'a [TargetObject],
) -> Option<&'a TargetObject> {
    targets.iter().filter(|obj| !obj.found).find(|obj| {
        let synonyms = catalog.synonyms(&obj.name);
        labels.iter().any(|label| {
            synonyms
                .iter()
                .any(|syn| label.contains(syn.as_str()) || syn.contains(label.as_str()))
        })
    })
}
