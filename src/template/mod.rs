//! HTML rendering of the editor.
//!
//! All markup comes from minijinja templates compiled into the binary. The
//! renderer holds no state of its own: the same store always yields the
//! same markup.

mod editor_view;
mod results_view;
pub mod template_renderer;

pub use editor_view::{CapabilityOption, ContentCard, DescriptorCard, EditorView, RuleCard};
pub use results_view::ResultView;
pub use template_renderer::{render_page, render_results, render_rules, PageContext, RenderError};
