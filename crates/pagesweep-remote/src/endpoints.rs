//! URL construction for the projects API.
//!
//! Path segments are appended through the URL builder, so project names and
//! deployment ids are percent-escaped rather than spliced into a string.

use reqwest::Url;

use crate::error::{ApiError, ApiResult};

/// Builds every URL the sweeper requests for one account.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    account_id: String,
    resource: String,
    page_size: u32,
}

impl Endpoints {
    /// `base_url` is the API root, e.g. `https://api.cloudflare.com/client/v4`.
    pub fn new(
        base_url: &str,
        account_id: &str,
        resource: &str,
        page_size: u32,
    ) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url}: not a hierarchical URL")));
        }
        Ok(Self {
            base,
            account_id: account_id.to_string(),
            resource: resource.to_string(),
            page_size,
        })
    }

    /// `GET …/accounts/{account}/{resource}/projects?page={n}&per_page={k}`
    pub fn projects_page(&self, page: u32) -> ApiResult<Url> {
        let url = self.projects_url(&[])?;
        Ok(self.paged(url, page))
    }

    /// `GET …/projects/{name}/deployments?page={n}&per_page={k}`
    pub fn deployments_page(&self, project_name: &str, page: u32) -> ApiResult<Url> {
        let url = self.projects_url(&[project_name, "deployments"])?;
        Ok(self.paged(url, page))
    }

    /// `DELETE …/projects/{name}/deployments/{id}`
    pub fn deployment(&self, project_name: &str, deployment_id: &str) -> ApiResult<Url> {
        self.projects_url(&[project_name, "deployments", deployment_id])
    }

    fn projects_url(&self, tail: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::Url(format!("{}: not a hierarchical URL", self.base)))?;
            segments
                .pop_if_empty()
                .extend(["accounts", self.account_id.as_str(), self.resource.as_str(), "projects"])
                .extend(tail);
        }
        Ok(url)
    }

    fn paged(&self, mut url: Url, page: u32) -> Url {
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.page_size.to_string());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new("https://api.cloudflare.com/client/v4", "acc-1", "pages", 5).unwrap()
    }

    #[test]
    fn projects_page_url() {
        let url = endpoints().projects_page(3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acc-1/pages/projects?page=3&per_page=5"
        );
    }

    #[test]
    fn deployments_page_url() {
        let url = endpoints().deployments_page("my-site", 1).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acc-1/pages/projects/my-site/deployments?page=1&per_page=5"
        );
    }

    #[test]
    fn delete_url_has_no_query() {
        let url = endpoints().deployment("my-site", "dep-42").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acc-1/pages/projects/my-site/deployments/dep-42"
        );
    }

    #[test]
    fn project_names_are_escaped() {
        let url = endpoints().deployments_page("odd/name ?", 1).unwrap();
        assert!(url.path().ends_with("/projects/odd%2Fname%20%3F/deployments"));
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let e = Endpoints::new("http://127.0.0.1:8080/v4/", "a", "pages", 10).unwrap();
        assert_eq!(
            e.projects_page(1).unwrap().as_str(),
            "http://127.0.0.1:8080/v4/accounts/a/pages/projects?page=1&per_page=10"
        );
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        assert!(matches!(
            Endpoints::new("mailto:ops@example.com", "a", "pages", 5),
            Err(ApiError::Url(_))
        ));
        assert!(Endpoints::new("not a url", "a", "pages", 5).is_err());
    }
}
