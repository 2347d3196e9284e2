use crate::content::SiteContent;
use crate::error::FsError;
use std::collections::BTreeMap;

pub const HOME: &str = "/home/guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTag {
    Blog,
    Project,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    File {
        id: String,
        tag: Option<ContentTag>,
    },
    Directory {
        children: BTreeMap<String, Node>,
    },
}

impl Node {
    pub fn dir() -> Self {
        Node::Directory {
            children: BTreeMap::new(),
        }
    }
    pub fn file(id: &str, tag: Option<ContentTag>) -> Self {
        Node::File {
            id: id.into(),
            tag,
        }
    }
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }
    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Directory { children } => Some(children),
            Node::File { .. } => None,
        }
    }
    fn insert(&mut self, name: &str, node: Node) {
        if let Node::Directory { children } = self {
            children.insert(name.into(), node);
        }
    }
}

/// Read-only tree built from the site content. `cwd` lives in the session, not here.
pub struct Vfs {
    root: Node,
}

impl Vfs {
    pub fn new(content: &SiteContent) -> Self {
        let mut root = Node::dir();

        let mut blog = Node::dir();
        for post in &content.blog_posts {
            blog.insert(&post.id, Node::file(&post.id, Some(ContentTag::Blog)));
        }
        let mut projects = Node::dir();
        for project in &content.projects {
            projects.insert(&project.id, Node::file(&project.id, Some(ContentTag::Project)));
        }

        root.insert("blog", blog);
        root.insert("projects", projects);
        root.insert("about.txt", Node::file("about", None));
        root.insert("contact.txt", Node::file("contact", None));
        Vfs { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node_at(&self, path: &[String]) -> Option<&Node> {
        let mut node = &self.root;
        for seg in path {
            node = node.children()?.get(seg)?;
        }
        Some(node)
    }

    /// Resolves `target` against `cwd`. Handles `~`, `/`, `.`, `..` and multi-segment paths;
    /// `..` at the root stays at the root.
    pub fn resolve(&self, cwd: &[String], target: &str) -> Result<(Vec<String>, &Node), FsError> {
        let (mut path, rest) = if target.is_empty() || target == "~" || target == "/" {
            (Vec::new(), "")
        } else if let Some(rest) = target.strip_prefix("~/") {
            (Vec::new(), rest)
        } else if let Some(rest) = target
            .strip_prefix(HOME)
            .filter(|r| r.is_empty() || r.starts_with('/'))
        {
            (Vec::new(), rest)
        } else if let Some(rest) = target.strip_prefix('/') {
            (Vec::new(), rest)
        } else {
            (cwd.to_vec(), target)
        };

        for seg in rest.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    path.pop();
                }
                name => {
                    let node = self.node_at(&path).ok_or(FsError::NotFound)?;
                    let children = node.children().ok_or(FsError::NotADirectory)?;
                    if !children.contains_key(name) {
                        return Err(FsError::NotFound);
                    }
                    path.push(name.into());
                }
            }
        }

        let node = self.node_at(&path).ok_or(FsError::NotFound)?;
        Ok((path, node))
    }

    pub fn cd(&self, cwd: &[String], target: &str) -> Result<Vec<String>, FsError> {
        let (path, node) = self.resolve(cwd, target)?;
        if !node.is_dir() {
            return Err(FsError::NotADirectory);
        }
        Ok(path)
    }

    /// Immediate children of a directory: directories first as `name/`, then files.
    pub fn list(node: &Node) -> Vec<String> {
        let Some(children) = node.children() else {
            return Vec::new();
        };
        let dirs = children
            .iter()
            .filter(|(_, n)| n.is_dir())
            .map(|(name, _)| format!("\x1b[COLOR:blue]{}/\x1b[COLOR:reset]", name));
        let files = children
            .iter()
            .filter(|(_, n)| !n.is_dir())
            .map(|(name, _)| name.clone());
        dirs.chain(files).collect()
    }
}

pub fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "~".into()
    } else {
        format!("~/{}", path.join("/"))
    }
}

pub fn absolute_path(path: &[String]) -> String {
    if path.is_empty() {
        HOME.into()
    } else {
        format!("{}/{}", HOME, path.join("/"))
    }
}
