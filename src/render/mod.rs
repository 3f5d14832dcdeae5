//! Result presentation: variant selection, section titles and the HTML
//! fragments the page swaps into its result area.

pub mod html;
pub mod view;

pub use html::{escape_html, render_error_html, render_error_message, render_result_html};
pub use view::{BadgeTone, Disclosure, ResultView, RowTint, SectionTitles};
