use super::Capabilities;
use crate::content::SiteContent;
use crate::vfs::{ContentTag, Node, Vfs};
use log::info;

pub fn read(
    vfs: &Vfs,
    content: &SiteContent,
    cwd: &[String],
    args: &[&str],
    caps: &mut Capabilities,
) -> String {
    let Some(name) = args.first().copied() else {
        return "read: missing file operand\nUsage: read <filename>".into();
    };
    let node = vfs
        .node_at(cwd)
        .and_then(|dir| dir.children())
        .and_then(|children| children.get(name));

    match node {
        None => format!("read: {}: No such file or directory", name),
        Some(Node::Directory { .. }) => format!("read: {}: Is a directory", name),
        Some(Node::File { tag: None, .. }) => format!("read: {}: Unsupported file type", name),
        Some(Node::File {
            id,
            tag: Some(ContentTag::Blog),
        }) => match caps.on_open_blog_post.as_mut() {
            None => "Error: Blog viewer not available".into(),
            Some(open) => {
                open(id.as_str());
                let title = content
                    .blog_post(id)
                    .map(|p| p.title.as_str())
                    .unwrap_or(id.as_str());
                format!("Opening blog post: {}", title)
            }
        },
        Some(Node::File {
            id,
            tag: Some(ContentTag::Project),
        }) => match caps.on_open_project.as_mut() {
            None => "Error: Project viewer not available".into(),
            Some(open) => {
                open(id.as_str());
                let title = content
                    .project(id)
                    .map(|p| p.title.as_str())
                    .unwrap_or(id.as_str());
                format!("Opening project: {}", title)
            }
        },
    }
}

/// `./<name>`: opens a project's demo. Only valid while inside `projects`.
pub fn launch(name: &str, content: &SiteContent, cwd: &[String], caps: &mut Capabilities) -> String {
    if cwd.len() != 1 || cwd[0] != "projects" {
        return format!("./{}: execution only supported in /projects", name);
    }
    let Some(project) = content.project(name) else {
        return format!("./{}: No such file or directory", name);
    };
    let Some(url) = project.demo_url.as_deref() else {
        return format!("{}: no demo available", name);
    };
    match caps.open_url.as_mut() {
        Some(open) => {
            info!("viewer: launching demo for {}", project.id);
            open(url);
            format!("Launching {} demo...", project.title)
        }
        None => format!("{} demo: {}", project.title, url),
    }
}
