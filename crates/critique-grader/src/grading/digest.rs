use sha2::{Digest, Sha256};

use super::domain::{Annotation, RubricItem};

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn update_usize(hasher: &mut Sha256, value: usize) {
    hasher.update((value as u64).to_le_bytes());
}

/// Hex SHA-256 over every input field that can influence a score.
///
/// Strings are length-prefixed so field boundaries cannot be forged. Record order is
/// hashed as given; callers that want order-insensitive keys should sort first.
pub fn snapshot_digest(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
    text_length: usize,
) -> String {
    let mut hasher = Sha256::new();
    update_usize(&mut hasher, text_length);

    update_usize(&mut hasher, annotations.len());
    for annotation in annotations {
        update_str(&mut hasher, &annotation.id);
        update_str(&mut hasher, annotation.kind.label());
        update_usize(&mut hasher, annotation.location_start);
        update_usize(&mut hasher, annotation.location_end);
        update_str(&mut hasher, &annotation.selected_text);
        update_str(&mut hasher, &annotation.note);
        update_usize(&mut hasher, annotation.evidence.len());
        for evidence in &annotation.evidence {
            update_str(&mut hasher, &evidence.id);
            update_str(&mut hasher, &evidence.kind);
            update_str(&mut hasher, &evidence.content);
        }
    }

    update_usize(&mut hasher, rubric_items.len());
    for item in rubric_items {
        update_str(&mut hasher, &item.id);
        update_str(&mut hasher, &item.pass_source);
        update_str(&mut hasher, &format!("{:?}", item.severity));
        update_str(&mut hasher, &item.category);
        update_usize(&mut hasher, item.location_start);
        update_usize(&mut hasher, item.location_end);
        update_str(&mut hasher, &item.description);
        hasher.update([u8::from(item.confirmed)]);
    }

    hex::encode(hasher.finalize())
}
