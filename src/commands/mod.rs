//! Command handlers. Each takes its arguments plus only the state and
//! capabilities it needs, and always returns display text.

pub mod info;
pub mod nav;
pub mod systemctl;
pub mod viewer;

pub type Callback = Box<dyn FnMut(&str)>;

/// Host-provided hooks. A missing hook is reported to the user, never a panic.
#[derive(Default)]
pub struct Capabilities {
    pub on_open_blog_post: Option<Callback>,
    pub on_open_project: Option<Callback>,
    pub open_url: Option<Callback>,
}
