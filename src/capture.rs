use crate::catalog::{Catalog, TargetObject};
use crate::classify::{Classifier, ClassifyError};
use crate::matcher;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("could not read image {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Result of one capture round. `Found` carries the updated object list and
/// score as a hand-off payload for the session's bulk-update transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Found {
        id: u32,
        name: String,
        points: u32,
        objects: Vec<TargetObject>,
        score: u32,
    },
    NoMatch,
}

/// Run one photo through the classifier and match the detected labels
/// against the remaining targets.
///
/// A `NoMatch` is not a failure; the player just tries again. Errors leave
/// the session untouched so the capture flow can reset and retake.
pub fn capture_round(
    catalog: &Catalog,
    classifier: &Classifier,
    objects: &[TargetObject],
    score: u32,
    image_path: &Path,
) -> Result<CaptureOutcome, CaptureError> {
    let bytes = fs::read(image_path).map_err(|source| CaptureError::Read {
        path: image_path.display().to_string(),
        source,
    })?;
    let encoded = BASE64.encode(&bytes);
    let labels = classifier.analyze(&encoded)?;

    match matcher::find_match(catalog, &labels, objects) {
        Some(obj) => {
            let (id, name, points) = (obj.id, obj.name.clone(), obj.points);
            let updated: Vec<TargetObject> = objects
                .iter()
                .cloned()
                .map(|mut o| {
                    if o.id == id {
                        o.found = true;
                    }
                    o
                })
                .collect();
            Ok(CaptureOutcome::Found {
                id,
                name,
                points,
                objects: updated,
                score: score + points,
            })
        }
        None => Ok(CaptureOutcome::NoMatch),
    }
}
