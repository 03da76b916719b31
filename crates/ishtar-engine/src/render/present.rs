use crate::device::DrawableTarget;

/// Shows the surface matching `post_processing` and hides the other.
///
/// The incoming surface is shown before the outgoing one is hidden, so the
/// host never displays neither.
pub(crate) fn apply_visibility<T: DrawableTarget>(primary: &T, post: &T, post_processing: bool) {
    let (shown, hidden) = if post_processing {
        (post, primary)
    } else {
        (primary, post)
    };
    shown.set_visible(true);
    hidden.set_visible(false);
}
