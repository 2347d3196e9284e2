use log::warn;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub demo_url: Option<String>,
}

/// Blog posts and projects as published by the site. Only ids, titles and demo links matter here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteContent {
    pub blog_posts: Vec<BlogPost>,
    pub projects: Vec<Project>,
}

impl SiteContent {
    pub fn from_json(json: &str) -> Self {
        if json.trim().is_empty() {
            return Self::sample();
        }
        match serde_json::from_str(json) {
            Ok(content) => content,
            Err(e) => {
                warn!("content: invalid site content, using built-in sample: {}", e);
                Self::sample()
            }
        }
    }

    pub fn blog_post(&self, id: &str) -> Option<&BlogPost> {
        self.blog_posts.iter().find(|p| p.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn sample() -> Self {
        SiteContent {
            blog_posts: vec![
                BlogPost {
                    id: "hello-world".into(),
                    title: "Hello, World".into(),
                },
                BlogPost {
                    id: "wasm-terminals".into(),
                    title: "Terminals in the Browser".into(),
                },
            ],
            projects: vec![
                Project {
                    id: "demo-project".into(),
                    title: "Demo Project".into(),
                    demo_url: Some("https://example.com/demo".into()),
                },
                Project {
                    id: "ice-breaker".into(),
                    title: "ICE Breaker".into(),
                    demo_url: None,
                },
            ],
        }
    }
}
