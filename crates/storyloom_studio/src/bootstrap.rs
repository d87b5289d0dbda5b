//! Style-bootstrap traversal for "generate all".

use storyloom_core::Scene;
use storyloom_error::{StoryloomResult, StudioError, StudioErrorKind};

/// Order in which "generate all" renders the scenes.
///
/// Let X be the first scene with at least one selected character. The order
/// is X, then the scenes before X in forward order, then the scenes after X in
/// forward order. X renders first so its image becomes the style anchor.
///
/// # Errors
///
/// `NoStyleAnchor` when no scene has characters.
///
/// # Examples
///
/// ```
/// use storyloom_core::Scene;
/// use storyloom_studio::traversal_order;
///
/// let mut scenes: Vec<Scene> = (1..=4).map(Scene::new).collect();
/// scenes[2].selected_character_ids.push("hero".into());
///
/// let order = traversal_order(&scenes).unwrap();
/// let indices: Vec<usize> = order
///     .iter()
///     .filter_map(|id| scenes.iter().find(|s| &s.id == id))
///     .map(|s| s.index)
///     .collect();
/// assert_eq!(indices, vec![3, 1, 2, 4]);
/// ```
pub fn traversal_order(scenes: &[Scene]) -> StoryloomResult<Vec<String>> {
    let x = scenes
        .iter()
        .position(Scene::has_characters)
        .ok_or_else(|| StudioError::new(StudioErrorKind::NoStyleAnchor))?;

    let order = std::iter::once(&scenes[x])
        .chain(&scenes[..x])
        .chain(&scenes[x + 1..])
        .map(|s| s.id.clone())
        .collect();
    Ok(order)
}
