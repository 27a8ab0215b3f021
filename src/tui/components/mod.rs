// Components - reusable pieces of the screen shell
//
// The navbar and footer frame every view; the toast floats over everything.

mod footer;
mod navbar;
mod toast;

pub use footer::render as render_footer;
pub use navbar::render as render_navbar;
pub use toast::render as render_toast;
