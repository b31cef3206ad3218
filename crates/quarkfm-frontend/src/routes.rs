#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageUi {
    Overview,
    Config,
    Results,
}

impl PageUi {
    pub const ALL: [PageUi; 3] = [PageUi::Overview, PageUi::Config, PageUi::Results];

    pub fn path(self) -> &'static str {
        match self {
            PageUi::Overview => "/",
            PageUi::Config => "/config",
            PageUi::Results => "/classify/results",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageUi::Overview => "Overview",
            PageUi::Config => "Configuration",
            PageUi::Results => "Results",
        }
    }

    /// Maps a redirect target to a page. Origins of absolute URLs, query
    /// strings and fragments are ignored.
    pub fn from_target(target: &str) -> Option<PageUi> {
        let target = target.trim();
        let target = match target.find("://") {
            Some(scheme_end) => {
                let rest = &target[scheme_end + 3..];
                rest.find('/').map_or("/", |path_start| &rest[path_start..])
            }
            None => target,
        };
        let path = target
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        PageUi::ALL.into_iter().find(|page| page.path() == path)
    }
}

/// Where a redirect target leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Page(PageUi),
    /// A server page the client has no view for, opened in the browser.
    External(String),
}

impl Redirect {
    /// Resolves `target` the way a browser on `server_url` would. Absolute
    /// URLs are kept, `/path` replaces the path of the server address and
    /// anything else is appended to it.
    pub fn resolve(target: &str, server_url: &str) -> Self {
        if let Some(page) = PageUi::from_target(target) {
            return Redirect::Page(page);
        }

        let target = target.trim();
        if target.contains("://") {
            return Redirect::External(target.to_owned());
        }

        let server_url = server_url.trim().trim_end_matches('/');
        let url = if target.starts_with('/') {
            let origin_end = server_url
                .find("://")
                .and_then(|scheme_end| {
                    let host_start = scheme_end + 3;
                    server_url[host_start..]
                        .find('/')
                        .map(|path_start| host_start + path_start)
                })
                .unwrap_or(server_url.len());
            format!("{}{target}", &server_url[..origin_end])
        } else {
            format!("{server_url}/{target}")
        };
        Redirect::External(url)
    }
}
