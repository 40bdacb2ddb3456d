//! Paginated fetcher.
//!
//! A [`Pager`] walks one collection page by page, starting at page 1.
//! It yields a page only when the envelope reported success, continues
//! while `page < total_pages`, and ends for good at the first transport,
//! parse, or remote failure. Each pager owns its cursor; creating a new
//! one restarts from page 1.

use std::marker::PhantomData;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::endpoints::Endpoints;
use crate::envelope::{ListBody, parse_list};
use crate::error::{ApiError, ApiResult};
use crate::throttle::Throttle;
use crate::transport::{Method, Transport};

/// One successfully fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<I> {
    /// 1-based page number.
    pub number: u32,
    pub total_pages: u32,
    pub items: Vec<I>,
}

/// Why a pager stopped yielding pages.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The last page was reached.
    Exhausted,
    /// Page `page` failed; it and every later page were not yielded.
    Failed { page: u32, error: ApiError },
}

#[derive(Debug, Clone)]
pub(crate) enum Collection {
    Projects,
    Deployments { project_name: String },
}

impl Collection {
    fn page_url(&self, endpoints: &Endpoints, page: u32) -> ApiResult<Url> {
        match self {
            Collection::Projects => endpoints.projects_page(page),
            Collection::Deployments { project_name } => {
                endpoints.deployments_page(project_name, page)
            }
        }
    }

    fn label(&self) -> &str {
        match self {
            Collection::Projects => "projects",
            Collection::Deployments { project_name } => project_name.as_str(),
        }
    }
}

/// Lazy page-by-page reader over one remote collection.
pub struct Pager<'a, T, L, I> {
    client: &'a ApiClient<T, L>,
    collection: Collection,
    next: u32,
    stop: Option<StopReason>,
    _item: PhantomData<fn() -> I>,
}

impl<'a, T, L, I> Pager<'a, T, L, I>
where
    T: Transport,
    L: Throttle,
    I: DeserializeOwned,
{
    pub(crate) fn new(client: &'a ApiClient<T, L>, collection: Collection) -> Self {
        Self {
            client,
            collection,
            next: 1,
            stop: None,
            _item: PhantomData,
        }
    }

    /// Fetch the next page, or `None` once the stream has ended.
    pub async fn next_page(&mut self) -> Option<Page<I>> {
        if self.stop.is_some() {
            return None;
        }
        let number = self.next;
        match self.fetch(number).await {
            Ok(body) => {
                let total_pages = body.total_pages.unwrap_or(number);
                if number >= total_pages {
                    self.stop = Some(StopReason::Exhausted);
                } else {
                    self.next = number + 1;
                }
                debug!(
                    collection = self.collection.label(),
                    page = number,
                    total_pages,
                    items = body.items.len(),
                    "page fetched"
                );
                Some(Page {
                    number,
                    total_pages,
                    items: body.items,
                })
            }
            Err(error) => {
                warn!(
                    collection = self.collection.label(),
                    page = number,
                    %error,
                    "listing stopped early"
                );
                self.stop = Some(StopReason::Failed {
                    page: number,
                    error,
                });
                None
            }
        }
    }

    /// Drain every remaining page into one list of items.
    pub async fn collect_items(&mut self) -> Vec<I> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await {
            items.extend(page.items);
        }
        items
    }

    /// Set once the stream has ended.
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    async fn fetch(&self, number: u32) -> ApiResult<ListBody<I>> {
        let url = self.collection.page_url(self.client.endpoints(), number)?;
        let body = self.client.call(Method::Get, &url).await?;
        parse_list(&body)
    }
}
