//! Loads the [`Config`] shared by the proxy and the generator from a
//! `feedpages.yaml` project file, falling back to built-in defaults.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "feedpages.yaml";

#[derive(Deserialize)]
#[serde(default)]
struct Project {
    site_url: String,
    blog_home: String,
    feed_endpoint: String,
    brand: String,
    keywords: Vec<String>,
    proxy: ProxyProject,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            site_url: String::from("https://seoul-wedding.site"),
            blog_home: String::from("https://blog.naver.com/dic-wannabe"),
            feed_endpoint: String::from(
                "https://dic-wannabe-rss.qkrqudwn12-b9d.workers.dev/feed",
            ),
            brand: String::from("쭈령이 커플 웨딩준비"),
            keywords: ["웨딩준비", "서울 웨딩홀", "스드메", "신혼여행", "쭈령이 커플"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            proxy: ProxyProject::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ProxyProject {
    listen: String,
    path: String,
    upstream: String,
}

impl Default for ProxyProject {
    fn default() -> Self {
        ProxyProject {
            listen: String::from("0.0.0.0:8787"),
            path: String::from("/feed"),
            upstream: String::from("https://rss.blog.naver.com/dic-wannabe.xml"),
        }
    }
}

/// Settings for the feed proxy.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyConfig {
    /// The socket address the proxy binds, e.g. `0.0.0.0:8787`.
    pub listen: String,

    /// The only path that relays the feed. Every other path gets a short
    /// plain-text hint.
    pub path: String,

    /// The upstream RSS document hidden behind the proxy.
    pub upstream: String,
}

/// Process-wide settings passed explicitly into the proxy and the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The public site root without a trailing slash. Post pages live at
    /// `{site_url}/posts/{slug}.html`.
    pub site_url: String,

    /// Fallback link for feed items that don't carry one.
    pub blog_home: String,

    /// The proxy endpoint the generator fetches the feed envelope from.
    pub feed_endpoint: String,

    /// Appended to every page title as `{title} | {brand}`.
    pub brand: String,

    /// Fixed meta keywords following the post's category.
    pub keywords: Vec<String>,

    pub proxy: ProxyConfig,
}

impl Default for Config {
    fn default() -> Self {
        let project = Project::default();
        let site_url = project.site_url.clone();
        Config::assemble(project, site_url)
    }
}

impl Config {
    /// Looks for `feedpages.yaml` in `dir` and then in each of its ancestors.
    /// Returns the default configuration if none of them has one.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        match find_project_file(dir) {
            Some(path) => match Config::from_project_file(&path) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.display());
                    Ok(config)
                }
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            },
            None => {
                log::info!("No `{}` found, using defaults", PROJECT_FILE);
                Ok(Config::default())
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)?;
        Config::from_project(project)
    }

    fn from_project(project: Project) -> Result<Config> {
        let site_url = Url::parse(&project.site_url)
            .map_err(|e| anyhow!("Invalid `site_url` '{}': {}", project.site_url, e))?;
        if site_url.cannot_be_a_base() {
            return Err(anyhow!("`site_url` must be an absolute http(s) URL"));
        }

        let site_url = site_url.as_str().trim_end_matches('/').to_owned();
        Ok(Config::assemble(project, site_url))
    }

    fn assemble(project: Project, site_url: String) -> Config {
        Config {
            site_url,
            blog_home: project.blog_home,
            feed_endpoint: project.feed_endpoint,
            brand: project.brand,
            keywords: project.keywords,
            proxy: ProxyConfig {
                listen: project.proxy.listen,
                path: project.proxy.path,
                upstream: project.proxy.upstream,
            },
        }
    }
}

fn find_project_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(PROJECT_FILE))
        .find(|path| path.is_file())
}
